//! Variable rules: named template placeholders matched by a pattern.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::CompareError;

/// Something that can recognize the text of a variable.
///
/// The matching engine decides where the variable's text ends; the pattern
/// only has to say how much of the offered text, starting at its first
/// char, it accepts.
pub trait TextPattern: fmt::Debug + Send + Sync {
    /// Byte length of a match beginning at offset 0 of `text`, or `None`
    /// if no match begins there.
    fn match_prefix(&self, text: &str) -> Option<usize>;
}

/// A case-insensitive regular expression.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    regex: Regex,
}

impl RegexPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }
}

impl TextPattern for RegexPattern {
    fn match_prefix(&self, text: &str) -> Option<usize> {
        // The leftmost match is the only one that could start at 0.
        self.regex
            .find(text)
            .filter(|m| m.start() == 0)
            .map(|m| m.end())
    }
}

/// A variable placeholder in a license template.
#[derive(Debug)]
pub struct VariableRule {
    name: String,
    example: String,
    pattern: Box<dyn TextPattern>,
}

impl VariableRule {
    /// Create a rule whose text must match the regular expression
    /// `match_pattern`, compared case-insensitively.
    pub fn new(name: &str, match_pattern: &str, example: &str) -> Result<Self, CompareError> {
        let pattern = RegexPattern::new(match_pattern).map_err(|source| {
            CompareError::InvalidPattern {
                name: name.to_string(),
                source,
            }
        })?;
        Ok(Self::with_pattern(name, example, pattern))
    }

    /// Create a rule with a caller-supplied pattern implementation.
    pub fn with_pattern(name: &str, example: &str, pattern: impl TextPattern + 'static) -> Self {
        Self {
            name: name.to_string(),
            example: example.to_string(),
            pattern: Box::new(pattern),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample text from the template, for display only.
    pub fn example(&self) -> &str {
        &self.example
    }

    pub fn match_prefix(&self, text: &str) -> Option<usize> {
        self.pattern.match_prefix(text)
    }
}
