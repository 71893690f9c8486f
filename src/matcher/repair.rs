//! Recovery from optional text that the tokenizer fused into a word.
//!
//! A template such as `Contributor<<optional s>> hereby` renders as the
//! single compare token `Contributors`, which a token-by-token walk cannot
//! line up with `Contributor` followed by an optional `s`. These checks
//! handle exactly that shape and nothing else: a literal of several tokens,
//! followed by an optional block holding a single literal, possibly
//! followed by another literal.

use crate::instruction::InstructionId;
use crate::token::{Token, normalize, tokenize};

use super::Walk;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Repair {
    /// The pending token is the literal's last token plus the optional text.
    SkipOptional,
    /// The pending token also swallowed the first token of the literal
    /// `id`, which continues with `remainder`.
    MergeFollowing {
        id: InstructionId,
        remainder: String,
    },
}

/// Check whether the failed literal `text_tokens` ran into a fused token.
///
/// `pending` is the compare token the literal failed on. Comparisons here
/// are on case-folded keys of the normalized text.
pub(super) fn fused_optional(
    walk: &Walk<'_>,
    text_tokens: &[Token],
    pending: &Token,
) -> Option<Repair> {
    if text_tokens.len() < 2 {
        return None;
    }
    let last = text_tokens.last()?.key();

    let (_, optional) = walk.sibling(0)?;
    if !optional.is_optional() || optional.children().len() != 1 {
        return None;
    }
    let optional_text = normalize(walk.tree.get(optional.children()[0]).literal_text()?)
        .trim()
        .to_lowercase();

    let with_option = format!("{last}{optional_text}");
    if pending.key() == with_option {
        return Some(Repair::SkipOptional);
    }

    let (following_id, _) = walk.sibling(1)?;
    let following = normalize(walk.literal_text(following_id)?);
    let following_tokens = tokenize(&following);
    let first = following_tokens.first().map_or("", Token::key);

    if pending.key() == format!("{last}{first}") || pending.key() == format!("{with_option}{first}") {
        // Keep the following literal from its second token on.
        let remainder = following_tokens
            .get(1)
            .map(|second| following.chars().skip(second.start).collect::<String>())
            .unwrap_or_default();
        return Some(Repair::MergeFollowing {
            id: following_id,
            remainder,
        });
    }
    None
}
