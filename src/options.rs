//! Comparison settings.

/// Knobs that change how strictly text must follow its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Accept text that carries on past the end of the template.
    pub allow_trailing_text: bool,
    /// Treat alternate spellings ("licence"/"license") as the same word.
    pub fold_equivalent_words: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            allow_trailing_text: false,
            fold_equivalent_words: true,
        }
    }
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trailing_text(mut self, allow: bool) -> Self {
        self.allow_trailing_text = allow;
        self
    }

    pub fn with_equivalent_words(mut self, fold: bool) -> Self {
        self.fold_equivalent_words = fold;
        self
    }
}
