use tracing::trace;

use crate::forth::ForthError;

/// A stack of raw tokens. Values stay as text until an operation asks for
/// them as numbers.
#[derive(Clone, Debug, PartialEq)]
pub struct Stack {
    values: Vec<String>,
}

impl Stack {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            let value = value.into();
            trace!(%value, "push");
            self.values.push(value);
        }
    }

    /// Removes the top value. An empty stack yields an empty string rather
    /// than an error.
    pub fn pop(&mut self) -> String {
        let value = self.values.pop().unwrap_or_default();
        trace!(%value, "pop");
        value
    }

    pub fn peek(&self) -> String {
        self.values.last().cloned().unwrap_or_default()
    }

    /// Takes the top `n` values as numbers, deepest first, so that for `a b`
    /// the result is `[a, b]`. The stack is only touched once every value
    /// has parsed.
    pub fn pop_numbers(&mut self, n: usize) -> Result<Vec<f64>, ForthError> {
        let available = self.values.len();
        if available < n {
            return Err(ForthError::InsufficientOperands {
                needed: n,
                available,
            });
        }

        let start = available - n;
        let mut nums = Vec::with_capacity(n);
        for (i, literal) in self.values[start..].iter().enumerate() {
            let num = literal
                .parse::<f64>()
                .map_err(|source| ForthError::NotANumber {
                    arg: i + 1,
                    literal: literal.clone(),
                    source,
                })?;
            nums.push(num);
        }

        self.values.truncate(start);
        trace!(?nums, "pop_numbers");
        Ok(nums)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn join(&self, sep: &str) -> String {
        self.values.join(sep)
    }
}

impl<S: Into<String>> FromIterator<S> for Stack {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut stack = Stack::new();
        stack.push(iter);
        stack
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn push_then_pop_returns_value() {
        let mut stack = Stack::new();
        stack.push(["x"]);
        assert_eq!("x", stack.pop());
        assert!(stack.is_empty());
    }

    #[test_log::test]
    fn push_keeps_argument_order() {
        let mut stack = Stack::new();
        stack.push(["a", "b", "c"]);
        assert_eq!(vec!["a", "b", "c"], stack.iter().collect::<Vec<_>>());
        assert_eq!("c", stack.peek());
    }

    #[test_log::test]
    fn empty_stack_yields_empty_strings() {
        let mut stack = Stack::new();
        assert_eq!("", stack.pop());
        assert_eq!("", stack.peek());
        assert_eq!(0, stack.len());
    }

    #[test_log::test]
    fn pop_numbers_returns_deepest_first() {
        let mut stack: Stack = ["keep", "3", "4"].iter().copied().collect();
        assert_eq!(Ok(vec![3.0, 4.0]), stack.pop_numbers(2));
        assert_eq!(vec!["keep"], stack.iter().collect::<Vec<_>>());
    }

    #[test_log::test]
    fn pop_numbers_reports_bad_argument_and_leaves_stack() {
        let mut stack: Stack = ["x", "5"].iter().copied().collect();
        match stack.pop_numbers(2) {
            Err(ForthError::NotANumber { arg, literal, .. }) => {
                assert_eq!(1, arg);
                assert_eq!("x", literal);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(vec!["x", "5"], stack.iter().collect::<Vec<_>>());
    }

    #[test_log::test]
    fn pop_numbers_needs_enough_values() {
        let mut stack: Stack = ["1", "2"].iter().copied().collect();
        assert_eq!(
            Err(ForthError::InsufficientOperands {
                needed: 3,
                available: 2
            }),
            stack.pop_numbers(3)
        );
        assert_eq!(2, stack.len());
    }

    #[test_log::test]
    fn join_renders_bottom_to_top() {
        let stack: Stack = ["1", "2", "three"].iter().copied().collect();
        assert_eq!("1 2 three", stack.join(" "));
    }
}
