//! Error types for template comparison.
//!
//! A text that does not match its template is not an error; that outcome is
//! reported through [`DifferenceDescription`](crate::DifferenceDescription).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    /// The verdict was requested before the template was fully walked.
    #[error(
        "matches() was called prior to completing the parsing; complete_parsing() must be called first"
    )]
    ParsingIncomplete,

    /// A variable rule carries a pattern that does not compile.
    #[error("Invalid match pattern for variable rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}
