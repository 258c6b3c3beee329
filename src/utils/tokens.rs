use std::str::{FromStr, SplitWhitespace};

use super::errors::SimulationError;

/// Whitespace-separated token reader for the plain-text input formats.
/// Errors name the input and the 1-based token position that failed.
#[derive(Debug)]
pub struct Tokens<'a> {
    input: &'static str,
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'static str, text: &'a str) -> Self {
        Self {
            input,
            inner: text.split_whitespace(),
            position: 0,
        }
    }

    pub fn next_str(&mut self, expected: &'static str) -> Result<&'a str, SimulationError> {
        self.position += 1;
        self.inner.next().ok_or(SimulationError::ParseError {
            input: self.input,
            position: self.position,
            expected,
        })
    }

    pub fn next_value<T: FromStr>(&mut self, expected: &'static str) -> Result<T, SimulationError> {
        let token = self.next_str(expected)?;
        token.parse().map_err(|_| SimulationError::ParseError {
            input: self.input,
            position: self.position,
            expected,
        })
    }

    /// Parses every remaining token as a value.
    pub fn remaining<T: FromStr>(&mut self, expected: &'static str) -> Result<Vec<T>, SimulationError> {
        let mut values = Vec::new();
        while self.has_next() {
            values.push(self.next_value(expected)?);
        }
        Ok(values)
    }

    pub fn has_next(&self) -> bool {
        self.inner.clone().next().is_some()
    }
}
