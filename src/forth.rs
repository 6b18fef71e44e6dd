use std::num::ParseFloatError;

use tracing::debug;

use crate::ops::{Keyword, Operation};
use crate::stack::Stack;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ForthError {
    #[error("Not enough entries on stack (need {needed}, have {available})")]
    InsufficientOperands { needed: usize, available: usize },
    #[error("Arg {arg} ({literal:?}) can't be parsed as a number: {source}")]
    NotANumber {
        arg: usize,
        literal: String,
        source: ParseFloatError,
    },
    #[error("Unknown word: {0}")]
    UnknownWord(String),
    #[error("Bye")]
    UserQuit,
}

impl ForthError {
    /// True for the request to end the session, which is not a failure.
    pub fn is_quit(&self) -> bool {
        matches!(self, Self::UserQuit)
    }
}

/// A token that failed while running a line.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Cannot run op {index} ({token:?}): {error}")]
pub struct LineError {
    pub index: usize,
    pub token: String,
    #[source]
    pub error: ForthError,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

const PROMPT: &str = "» ";

fn bye(_: &mut Forth) -> Result<(), ForthError> {
    Err(ForthError::UserQuit)
}

fn help(forth: &mut Forth) -> Result<(), ForthError> {
    forth.print_help();
    Ok(())
}

fn show_stack(forth: &mut Forth) -> Result<(), ForthError> {
    forth.show_stack = true;
    Ok(())
}

fn no_show_stack(forth: &mut Forth) -> Result<(), ForthError> {
    forth.show_stack = false;
    Ok(())
}

fn take(forth: &mut Forth) -> Result<(), ForthError> {
    forth.print_top();
    Ok(())
}

fn show(forth: &mut Forth) -> Result<(), ForthError> {
    forth.print_stack();
    Ok(())
}

// The stack words lean on the lenient pop: missing values come back as "".
fn dup(forth: &mut Forth) -> Result<(), ForthError> {
    let a = forth.stack.pop();
    forth.stack.push([a.clone(), a]);
    Ok(())
}

fn drop_top(forth: &mut Forth) -> Result<(), ForthError> {
    forth.stack.pop();
    Ok(())
}

fn swap(forth: &mut Forth) -> Result<(), ForthError> {
    let b = forth.stack.pop();
    let a = forth.stack.pop();
    forth.stack.push([b, a]);
    Ok(())
}

fn over(forth: &mut Forth) -> Result<(), ForthError> {
    let b = forth.stack.pop();
    let a = forth.stack.pop();
    forth.stack.push([a.clone(), b, a]);
    Ok(())
}

#[derive(Debug)]
pub struct Forth {
    show_stack: bool,
    stack: Stack,
    ops: Vec<Operation>,
}

impl Forth {
    pub fn new() -> Self {
        Self {
            show_stack: false,
            stack: Stack::new(),
            ops: vec![
                Operation::Keyword(Keyword::new("bye", bye)),
                Operation::Keyword(Keyword::new("help", help)),
                // Prompt display
                Operation::Keyword(Keyword::new("showstack", show_stack)),
                Operation::Keyword(Keyword::new("noshowstack", no_show_stack)),
                // Show top or all of stack
                Operation::Keyword(Keyword::new(".", take)),
                Operation::Keyword(Keyword::new(".s", show)),
                Operation::Keyword(Keyword::new("dup", dup)),
                Operation::Keyword(Keyword::new("drop", drop_top)),
                Operation::Keyword(Keyword::new("swap", swap)),
                Operation::Keyword(Keyword::new("over", over)),
                Operation::SimpleMath,
                // Anything unrecognised is pushed as is.
                Operation::PushToStack,
            ],
        }
    }

    pub fn with_show_stack(mut self, show_stack: bool) -> Self {
        self.show_stack = show_stack;
        self
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub(crate) fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Runs the first operation that matches `token`.
    pub fn process(&mut self, token: &str) -> Result<(), ForthError> {
        let op = self
            .ops
            .iter()
            .copied()
            .find(|op| op.matches(token))
            .ok_or_else(|| ForthError::UnknownWord(token.to_string()))?;
        debug!(token, ?op, depth = self.stack.len(), "dispatch");
        op.run(self, token)
    }

    /// Runs every token on the line in order, stopping at the first one that
    /// fails. Tokens that already ran keep their effect.
    pub fn eval_line(&mut self, line: &str) -> Result<Flow, LineError> {
        for (i, token) in line.split_whitespace().enumerate() {
            match self.process(token) {
                Ok(()) => {}
                Err(error) if error.is_quit() => return Ok(Flow::Quit),
                Err(error) => {
                    return Err(LineError {
                        index: i + 1,
                        token: token.to_string(),
                        error,
                    })
                }
            }
        }
        Ok(Flow::Continue)
    }

    pub fn prompt(&self) -> String {
        if self.show_stack {
            format!("{} {}", self.stack.join(" "), PROMPT)
        } else {
            PROMPT.to_string()
        }
    }

    /// Candidates from every operation that offers completion, in registry
    /// order.
    pub fn complete(&self, line: &str) -> Vec<String> {
        self.ops.iter().flat_map(|op| op.complete(line)).collect()
    }

    pub fn keywords(&self) -> Vec<&'static str> {
        self.ops.iter().filter_map(Operation::keyword_name).collect()
    }

    pub fn help_text(&self) -> String {
        format!(
            "Known commands: \n  {}\n  + - * / mod \n(anything is pushed onto the stack)",
            self.keywords().join(" ")
        )
    }

    pub fn print_help(&self) {
        println!("{}", self.help_text());
    }

    /// What `.` prints: the top value on its own line.
    pub fn top_text(&self) -> String {
        format!("{}\n", self.stack.peek())
    }

    /// What `.s` prints: one line per value, bottom to top.
    pub fn stack_text(&self) -> String {
        self.stack.iter().map(|value| format!("{}\n", value)).collect()
    }

    pub fn print_top(&self) {
        print!("{}", self.top_text());
    }

    pub fn print_stack(&self) {
        print!("{}", self.stack_text());
    }
}

impl Default for Forth {
    fn default() -> Self {
        Self::new()
    }
}
