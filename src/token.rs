//! Normalization and tokenization of license text.
//!
//! Text is compared as a stream of tokens: words and single punctuation
//! characters. Whitespace only separates tokens, so any run of it is
//! equivalent to any other. Tokens keep their original casing for
//! reconstructing variable text; comparison uses a case-folded key.

use std::ops::Range;

use phf::{Map, Set, phf_map, phf_set};
use ropey::Rope;

use crate::position::LineColumn;

/// Characters that always form a token of their own.
const PUNCTUATION: &str = ".,?'\"();:/[]";

/// Tokens that may be dropped on either side before declaring a mismatch.
/// Mostly comment decoration and list bullets that vary between copies.
static SKIPPABLE_TOKENS: Set<&'static str> = phf_set! {
    ",", "/", "*", "**", "#", "##", "=", "-", "--", "\"", "•",
};

/// Alternate spellings mapped to a single canonical form.
/// Keys and values are case-folded.
static EQUIVALENT_WORDS: Map<&'static str, &'static str> = phf_map! {
    "acknowledgement" => "acknowledgment",
    "acknowledgements" => "acknowledgments",
    "analogue" => "analog",
    "authorised" => "authorized",
    "licence" => "license",
    "licenced" => "licensed",
    "licences" => "licenses",
    "licencing" => "licensing",
    "non-commercial" => "noncommercial",
    "organisation" => "organization",
    "sub-license" => "sublicense",
    "sub-licenses" => "sublicenses",
};

/// A token with its position in the text it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Normalized text with original casing.
    pub text: String,
    /// Case-folded comparison key.
    key: String,
    /// Char offset of the first char of the token.
    pub start: usize,
    pub location: LineColumn,
}

impl Token {
    fn new(text: String, start: usize, rope: &Rope) -> Self {
        let len = text.chars().count();
        Self {
            key: text.to_lowercase(),
            location: LineColumn::in_rope(rope, start, len),
            text,
            start,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Char offset just past the last char of the token.
    pub fn end(&self) -> usize {
        self.start + self.location.len
    }

    pub fn is_skippable(&self) -> bool {
        can_skip(&self.text)
    }
}

/// A tokenized text together with the rope used to locate its tokens.
#[derive(Debug, Clone)]
pub struct TokenStream {
    rope: Rope,
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Tokenize `text` as-is. Callers normalize first where that matters.
    pub fn new(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let mut tokens = Vec::new();
        let mut word: Option<(usize, String)> = None;

        for (idx, ch) in text.chars().enumerate() {
            let punct = PUNCTUATION.contains(ch);
            if ch.is_whitespace() || punct {
                if let Some((start, w)) = word.take() {
                    tokens.push(Token::new(w, start, &rope));
                }
                if punct {
                    tokens.push(Token::new(ch.to_string(), idx, &rope));
                }
            } else {
                word.get_or_insert_with(|| (idx, String::new())).1.push(ch);
            }
        }
        if let Some((start, w)) = word {
            tokens.push(Token::new(w, start, &rope));
        }

        Self { rope, tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    /// Reconstruct the source text covered by the token index `range`,
    /// including any whitespace between the tokens.
    ///
    /// An empty range, or one starting past the last token, yields an empty
    /// string. The end of the range is clamped to the stream.
    pub fn locate_original_text(&self, range: Range<usize>) -> String {
        if range.start >= range.end || range.start >= self.tokens.len() {
            return String::new();
        }
        let last = range.end.min(self.tokens.len()) - 1;
        let from = self.tokens[range.start].start;
        let to = self.tokens[last].end();
        self.rope.slice(from..to).to_string()
    }

    /// A zero-length location just past the final token.
    pub fn end_location(&self) -> LineColumn {
        self.tokens
            .last()
            .map(|t| t.location.just_after())
            .unwrap_or(LineColumn::new(1, 0, 0))
    }
}

/// Canonicalize line endings, whitespace, quotes and dashes.
///
/// Every substitution is one char for one char, so line and column positions
/// in the result are the same as in `text`.
pub fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .map(|ch| match ch {
            '\r' => '\n',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '`' | '\u{00B4}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            c if c.is_whitespace() && c != '\n' => ' ',
            c => c,
        })
        .collect()
}

/// Tokenize `text` without keeping the location map.
pub fn tokenize(text: &str) -> Vec<Token> {
    TokenStream::new(text).tokens
}

/// Whether a token may be ignored when the two texts disagree.
pub fn can_skip(token: &str) -> bool {
    let token = token.trim();
    token.is_empty() || SKIPPABLE_TOKENS.contains(token)
}

/// Case-insensitive token equality, optionally treating alternate spellings
/// as the same word.
pub fn tokens_equivalent(a: &Token, b: &Token, fold_words: bool) -> bool {
    a.key == b.key || (fold_words && canonical(&a.key) == canonical(&b.key))
}

fn canonical(key: &str) -> &str {
    EQUIVALENT_WORDS.get(key).copied().unwrap_or(key)
}

/// Number of tokens in `text[..end]`.
pub fn count_tokens(text: &str, end: usize) -> usize {
    if end == 0 || text.trim().is_empty() {
        return 0;
    }
    text.get(..end).map_or(0, |prefix| tokenize(prefix).len())
}
