//! The outcome of a comparison: either no difference, or the first one.

use crate::position::LineColumn;

const NO_DIFFERENCE: &str = "No difference found";

/// The first place where text and template disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    pub message: String,
    /// Where the difference starts; `None` when it has no position at all.
    pub location: Option<LineColumn>,
    /// The compare token found there, if the text had not run out.
    pub token: Option<String>,
}

impl Divergence {
    /// A difference at a token of the compare text.
    pub fn at(message: impl Into<String>, location: LineColumn, token: &str) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
            token: Some(token.to_string()),
        }
    }

    /// A difference found after the compare text ran out.
    pub fn at_end(message: impl Into<String>, location: LineColumn) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
            token: None,
        }
    }

    pub fn unlocated(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            token: None,
        }
    }

    /// The message as shown to users, including the position.
    pub fn describe(&self) -> String {
        match (&self.location, &self.token) {
            (Some(loc), Some(token)) => format!(
                "{} starting at line #{} column #{} \"{}\".",
                self.message, loc.line, loc.column, token
            ),
            (Some(_), None) => format!("{} at end of text", self.message),
            (None, _) => self.message.clone(),
        }
    }
}

/// The verdict of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferenceDescription {
    pub difference_found: bool,
    pub message: String,
    /// Location of the first difference. Holds at most one entry.
    pub differences: Vec<LineColumn>,
}

impl DifferenceDescription {
    pub fn no_difference() -> Self {
        Self {
            difference_found: false,
            message: NO_DIFFERENCE.to_string(),
            differences: Vec::new(),
        }
    }

    pub fn matched(&self) -> bool {
        !self.difference_found
    }
}

impl From<Divergence> for DifferenceDescription {
    fn from(d: Divergence) -> Self {
        Self {
            difference_found: true,
            message: d.describe(),
            differences: d.location.into_iter().collect(),
        }
    }
}
