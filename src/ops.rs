use std::fmt;

use tracing::debug;

use crate::forth::{Forth, ForthError};

pub type Effect = fn(&mut Forth) -> Result<(), ForthError>;

/// A word bound by exact name to an effect on the interpreter.
#[derive(Clone, Copy)]
pub struct Keyword {
    name: &'static str,
    effect: Effect,
}

impl Keyword {
    pub const fn new(name: &'static str, effect: Effect) -> Self {
        Keyword { name, effect }
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Keyword({:?})", self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MathOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl MathOperator {
    /// `a` is the deeper operand, `b` the one on top.
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
            Self::Modulo => a % b,
        }
    }
}

impl TryFrom<&str> for MathOperator {
    type Error = ForthError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Subtract),
            "*" => Ok(Self::Multiply),
            "/" => Ok(Self::Divide),
            "mod" => Ok(Self::Modulo),
            v => Err(ForthError::UnknownWord(v.to_string())),
        }
    }
}

/// One entry of the interpreter's registry. Entries are tried in order and
/// the first match runs, so `PushToStack` has to come last.
#[derive(Clone, Copy, Debug)]
pub enum Operation {
    Keyword(Keyword),
    SimpleMath,
    PushToStack,
}

impl Operation {
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Self::Keyword(keyword) => keyword.name == token,
            Self::SimpleMath => MathOperator::try_from(token).is_ok(),
            Self::PushToStack => true,
        }
    }

    pub fn run(&self, forth: &mut Forth, token: &str) -> Result<(), ForthError> {
        match self {
            Self::Keyword(keyword) => (keyword.effect)(forth),
            Self::SimpleMath => {
                let operator = MathOperator::try_from(token)?;
                let nums = forth.stack_mut().pop_numbers(2)?;
                let result = operator.apply(nums[0], nums[1]);
                debug!(?operator, a = nums[0], b = nums[1], result, "math");
                forth.stack_mut().push([format_number(result)]);
                Ok(())
            }
            Self::PushToStack => {
                forth.stack_mut().push([token]);
                Ok(())
            }
        }
    }

    /// Completion candidates for a partially typed line. Only keywords offer
    /// any.
    pub fn complete(&self, line: &str) -> Vec<String> {
        match self {
            Self::Keyword(keyword) if keyword.name.starts_with(line) => {
                vec![keyword.name.to_string()]
            }
            _ => Vec::new(),
        }
    }

    pub fn keyword_name(&self) -> Option<&'static str> {
        match self {
            Self::Keyword(keyword) => Some(keyword.name),
            _ => None,
        }
    }
}

/// Shortest text that reads back as the same number. Very large and very
/// small magnitudes switch to exponent form.
pub fn format_number(num: f64) -> String {
    let magnitude = num.abs();
    if magnitude != 0.0 && magnitude.is_finite() && !(1e-4..1e21).contains(&magnitude) {
        format!("{:e}", num)
    } else {
        num.to_string()
    }
}
