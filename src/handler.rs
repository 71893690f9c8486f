//! Event-driven comparison of text to a license template.
//!
//! A template parser reports what it finds through [`TemplateHandler`].
//! [`TemplateComparer`] builds an instruction tree from those events and,
//! once parsing is complete, matches its text against the tree.

use tracing::warn;

use crate::difference::DifferenceDescription;
use crate::error::CompareError;
use crate::instruction::TreeBuilder;
use crate::matcher::Matcher;
use crate::options::CompareOptions;
use crate::rule::VariableRule;

/// Receiver of structural events from a license template parser.
pub trait TemplateHandler {
    /// Literal template text.
    fn text(&mut self, text: &str);

    /// A variable placeholder.
    fn variable_rule(&mut self, rule: VariableRule);

    /// Start of an optional region.
    fn begin_optional(&mut self);

    /// End of the innermost optional region.
    fn end_optional(&mut self);

    /// No more events will arrive.
    fn complete_parsing(&mut self);
}

#[derive(Debug)]
enum Phase {
    Building(TreeBuilder),
    Complete(DifferenceDescription),
}

/// Compares one text to the template described by incoming events.
#[derive(Debug)]
pub struct TemplateComparer {
    matcher: Matcher,
    phase: Phase,
}

impl TemplateComparer {
    pub fn new(compare_text: &str) -> Self {
        Self::with_options(compare_text, CompareOptions::default())
    }

    pub fn with_options(compare_text: &str, options: CompareOptions) -> Self {
        Self {
            matcher: Matcher::new(compare_text, options),
            phase: Phase::Building(TreeBuilder::new()),
        }
    }

    /// True if the text is a valid instance of the template.
    ///
    /// Fails if [`complete_parsing`](TemplateHandler::complete_parsing) has
    /// not been called.
    pub fn matches(&self) -> Result<bool, CompareError> {
        Ok(self.differences()?.matched())
    }

    /// Details of the first difference, if any.
    pub fn differences(&self) -> Result<&DifferenceDescription, CompareError> {
        match &self.phase {
            Phase::Complete(result) => Ok(result),
            Phase::Building(_) => Err(CompareError::ParsingIncomplete),
        }
    }

    fn builder(&mut self) -> Option<&mut TreeBuilder> {
        match &mut self.phase {
            Phase::Building(builder) => Some(builder),
            Phase::Complete(_) => {
                warn!("template event received after parsing was completed");
                None
            }
        }
    }
}

impl TemplateHandler for TemplateComparer {
    fn text(&mut self, text: &str) {
        if let Some(b) = self.builder() {
            b.literal(text);
        }
    }

    fn variable_rule(&mut self, rule: VariableRule) {
        if let Some(b) = self.builder() {
            b.variable(rule);
        }
    }

    fn begin_optional(&mut self) {
        if let Some(b) = self.builder() {
            b.begin_optional();
        }
    }

    fn end_optional(&mut self) {
        if let Some(b) = self.builder() {
            b.end_optional();
        }
    }

    fn complete_parsing(&mut self) {
        let Phase::Building(builder) = &mut self.phase else {
            return;
        };
        let tree = std::mem::take(builder).finish();
        self.phase = Phase::Complete(self.matcher.run(&tree));
    }
}
