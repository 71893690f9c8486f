//! Alignment of an [`InstructionTree`] against a comparison text.
//!
//! The matcher walks the top-level instructions once, in order, keeping a
//! cursor into the compare token stream. Literals must line up with the
//! tokens at the cursor, variables take the text up to where the next literal
//! lines up again, and optional blocks are tried and silently dropped if
//! they do not fit. The first instruction that cannot be satisfied ends the
//! walk; nothing is re-aligned after that.
//!
//! Speculative attempts never mutate the walk. [`Matcher::text_equivalent`]
//! takes a cursor and hands back a new one, so rolling back is just a matter
//! of not storing the result.

mod repair;

use tracing::{debug, trace};

use crate::difference::{DifferenceDescription, Divergence};
use crate::instruction::{Instruction, InstructionId, InstructionKind, InstructionTree};
use crate::options::CompareOptions;
use crate::rule::VariableRule;
use crate::token::{Token, TokenStream, count_tokens, normalize, tokenize, tokens_equivalent};

use repair::Repair;

const UNSUPPORTED_NESTING: &str =
    "Unsupported nested optional and var rules within an optional block";

/// Compares one text against instruction trees.
#[derive(Debug, Clone)]
pub struct Matcher {
    stream: TokenStream,
    options: CompareOptions,
}

/// Progress through the top-level instructions of one tree.
struct Walk<'t> {
    tree: &'t InstructionTree,
    /// Index into `tree.roots()` of the next instruction to process.
    next: usize,
    /// Index of the pending compare token.
    cursor: usize,
    /// Literal whose leading token was already consumed by a repair.
    rewritten: Option<(InstructionId, String)>,
}

impl<'t> Walk<'t> {
    fn new(tree: &'t InstructionTree) -> Self {
        Self {
            tree,
            next: 0,
            cursor: 0,
            rewritten: None,
        }
    }

    /// The top-level instruction `offset` places after the current one.
    fn sibling(&self, offset: usize) -> Option<(InstructionId, &'t Instruction)> {
        let id = *self.tree.roots().get(self.next + offset)?;
        Some((id, self.tree.get(id)))
    }

    fn literal_text(&self, id: InstructionId) -> Option<&str> {
        match &self.rewritten {
            Some((rid, text)) if *rid == id => Some(text),
            _ => self.tree.get(id).literal_text(),
        }
    }

    /// Text of the first literal among the remaining top-level instructions.
    fn following_literal(&self) -> Option<&str> {
        self.tree.roots()[self.next..]
            .iter()
            .find_map(|&id| self.literal_text(id))
    }
}

impl Matcher {
    /// Prepare `compare_text` for matching.
    pub fn new(compare_text: &str, options: CompareOptions) -> Self {
        Self {
            stream: TokenStream::new(&normalize(compare_text)),
            options,
        }
    }

    /// Walk `tree` against the compare text and report the first difference.
    pub fn run(&self, tree: &InstructionTree) -> DifferenceDescription {
        debug!(
            instructions = tree.len(),
            tokens = self.stream.len(),
            "comparing text to template"
        );
        if let Some(divergence) = unsupported_nesting(tree) {
            debug!(message = %divergence.message, "template cannot be matched");
            return divergence.into();
        }
        let mut walk = Walk::new(tree);
        match self.walk(&mut walk) {
            Ok(()) => {
                debug!("text matches template");
                DifferenceDescription::no_difference()
            }
            Err(divergence) => {
                debug!(
                    instruction = walk.next,
                    cursor = walk.cursor,
                    message = %divergence.message,
                    "text differs from template"
                );
                divergence.into()
            }
        }
    }

    fn walk(&self, walk: &mut Walk<'_>) -> Result<(), Divergence> {
        let tree = walk.tree;
        while let Some(&id) = tree.roots().get(walk.next) {
            walk.next += 1;
            match &tree.get(id).kind {
                InstructionKind::Literal(_) => {
                    let text = walk.literal_text(id).unwrap_or_default().to_string();
                    self.process_literal(walk, &text)?;
                }
                InstructionKind::Variable(rule) => self.process_variable(walk, rule)?,
                InstructionKind::Optional => self.process_optional(walk, id)?,
            }
        }
        self.check_trailing(walk.cursor)
    }

    /// Match `text` token by token starting at `cursor`.
    ///
    /// On a mismatch, skippable tokens are dropped from the compare side and
    /// then from the text side before comparing again. Returns the cursor
    /// after the matched text, or the cursor at which matching failed.
    pub fn text_equivalent(&self, mut cursor: usize, text: &[Token]) -> Result<usize, usize> {
        let fold = self.options.fold_equivalent_words;
        let mut t = 0;
        while t < text.len() {
            let Some(compare) = self.stream.get(cursor) else {
                // Compare text ran out; only skippable template tokens may remain.
                return if text[t..].iter().all(Token::is_skippable) {
                    Ok(cursor)
                } else {
                    Err(cursor)
                };
            };
            if tokens_equivalent(&text[t], compare, fold) {
                t += 1;
                cursor += 1;
                continue;
            }
            while self.stream.get(cursor).is_some_and(Token::is_skippable) {
                cursor += 1;
            }
            while text.get(t).is_some_and(Token::is_skippable) {
                t += 1;
            }
            match (text.get(t), self.stream.get(cursor)) {
                (None, _) => return Ok(cursor),
                (Some(a), Some(b)) if tokens_equivalent(a, b, fold) => {
                    t += 1;
                    cursor += 1;
                }
                _ => return Err(cursor),
            }
        }
        Ok(cursor)
    }

    fn process_literal(&self, walk: &mut Walk<'_>, text: &str) -> Result<(), Divergence> {
        let text_tokens = tokenize(&normalize(text));
        trace!(cursor = walk.cursor, tokens = text_tokens.len(), "literal");

        let at = match self.text_equivalent(walk.cursor, &text_tokens) {
            Ok(cursor) => {
                walk.cursor = cursor;
                return Ok(());
            }
            Err(at) => at,
        };

        let pending = self.stream.get(at);
        let repairable = pending.filter(|_| self.fails_on_last_token(walk.cursor, &text_tokens, at));
        if let Some(token) = repairable {
            if let Some(repair) = repair::fused_optional(walk, &text_tokens, token) {
                debug!(location = %token.location, ?repair, "optional text fused into compare token");
                if let Repair::MergeFollowing { id, remainder } = repair {
                    walk.rewritten = Some((id, remainder));
                }
                walk.next += 1;
                walk.cursor = at + 1;
                return Ok(());
            }
        }

        walk.cursor = at;
        Err(match pending {
            Some(token) => Divergence::at(
                "Difference found in normal text",
                token.location,
                &token.text,
            ),
            None => Divergence::at_end(
                "End of compare text encountered before the end of the license template",
                self.stream.end_location(),
            ),
        })
    }

    /// True if all but the last token of `text` line up from `cursor` and
    /// stop at `at`, ignoring skippable compare tokens in between.
    fn fails_on_last_token(&self, cursor: usize, text: &[Token], at: usize) -> bool {
        let Some((_, head)) = text.split_last() else {
            return false;
        };
        match self.text_equivalent(cursor, head) {
            Ok(end) => {
                end <= at && (end..at).all(|i| self.stream.get(i).is_some_and(Token::is_skippable))
            }
            Err(_) => false,
        }
    }

    fn process_variable(&self, walk: &mut Walk<'_>, rule: &VariableRule) -> Result<(), Divergence> {
        let boundary = self.find_next_matching_start(walk)?;
        let span = self.stream.locate_original_text(walk.cursor..boundary);
        trace!(rule = rule.name(), %span, "variable");

        let Some(end) = rule.match_prefix(&span) else {
            return Err(self.divergence_at(
                walk.cursor,
                format!(
                    "Variable text rule {} did not match the compare text",
                    rule.name()
                ),
            ));
        };
        walk.cursor = (walk.cursor + count_tokens(&span, end)).min(self.stream.len());
        Ok(())
    }

    /// Index of the first compare token at which the next literal lines up.
    ///
    /// Every start from the cursor up to the end of the stream is tried, so
    /// the search always terminates. With no literal left in the template the
    /// boundary is the end of the stream.
    fn find_next_matching_start(&self, walk: &Walk<'_>) -> Result<usize, Divergence> {
        let Some(text) = walk.following_literal() else {
            return Ok(self.stream.len());
        };
        let text_tokens = tokenize(&normalize(text));
        (walk.cursor..=self.stream.len())
            .find(|&start| {
                let found = self.text_equivalent(start, &text_tokens).is_ok();
                trace!(start, found, "realigning after variable");
                found
            })
            .ok_or_else(|| {
                self.divergence_at(
                    walk.cursor,
                    format!("Unable to find the text following a variable template rule '{text}'"),
                )
            })
    }

    /// Literal-only by the time the walk starts; see [`unsupported_nesting`].
    fn process_optional(&self, walk: &mut Walk<'_>, id: InstructionId) -> Result<(), Divergence> {
        let tree = walk.tree;
        let text_tokens = tokenize(&normalize(&tree.joined_text(id)));
        match self.text_equivalent(walk.cursor, &text_tokens) {
            Ok(cursor) => {
                trace!(from = walk.cursor, to = cursor, "optional text present");
                walk.cursor = cursor;
            }
            Err(_) => trace!(cursor = walk.cursor, "optional text absent"),
        }
        Ok(())
    }

    fn check_trailing(&self, cursor: usize) -> Result<(), Divergence> {
        if self.options.allow_trailing_text {
            return Ok(());
        }
        let extra = self
            .stream
            .tokens()
            .iter()
            .enumerate()
            .skip(cursor)
            .find(|(_, t)| !t.is_skippable());
        match extra {
            Some((idx, _)) => Err(self.divergence_at(
                idx,
                "Additional text found after the end of the license template",
            )),
            None => Ok(()),
        }
    }

    fn divergence_at(&self, cursor: usize, message: impl Into<String>) -> Divergence {
        match self.stream.get(cursor) {
            Some(token) => Divergence::at(message, token.location, &token.text),
            None => Divergence::at_end(message, self.stream.end_location()),
        }
    }
}

/// Optional blocks may only hold literal text. Anything else makes the whole
/// template unusable, whatever the compare text says.
fn unsupported_nesting(tree: &InstructionTree) -> Option<Divergence> {
    tree.roots()
        .iter()
        .any(|&id| tree.get(id).is_optional() && !tree.is_literal_only(id))
        .then(|| Divergence::unlocated(UNSUPPORTED_NESTING))
}

#[cfg(test)]
mod tests;
