//! Check license text against a structured license template.
//!
//! A template is literal text with variable placeholders and optional
//! regions. A template parser reports these through [`TemplateHandler`];
//! [`TemplateComparer`] collects them and, once parsing is complete, decides
//! whether its text is an instance of the template. If it is not, the first
//! difference is reported with its line and column.
//!
//! # Example
//!
//! ```rust
//! use licmatch::{TemplateComparer, TemplateHandler, VariableRule};
//!
//! let mut comparer = TemplateComparer::new("Copyright 2024 ACME Inc.");
//! comparer.text("Copyright ");
//! comparer.variable_rule(VariableRule::new("YEAR", "[0-9]{4}", "2024").unwrap());
//! comparer.text(" ACME");
//! comparer.begin_optional();
//! comparer.text(" Inc");
//! comparer.end_optional();
//! comparer.text(".");
//! comparer.complete_parsing();
//!
//! assert!(comparer.matches().unwrap());
//! ```
//!
//! The two phases are also available separately: a [`TreeBuilder`] produces
//! an [`InstructionTree`], which a [`Matcher`] walks against its text.

mod difference;
mod error;
mod handler;
pub mod instruction;
pub mod matcher;
mod options;
mod position;
mod rule;
pub mod token;

pub use difference::{DifferenceDescription, Divergence};
pub use error::CompareError;
pub use handler::{TemplateComparer, TemplateHandler};
pub use instruction::{InstructionTree, TreeBuilder};
pub use matcher::Matcher;
pub use options::CompareOptions;
pub use position::LineColumn;
pub use rule::{RegexPattern, TextPattern, VariableRule};
