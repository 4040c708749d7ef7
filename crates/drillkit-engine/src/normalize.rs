//! Text comparison for typed answers.
//!
//! Two answers are equal iff their normalized forms are identical. There is
//! no fuzzy or edit-distance matching.

use unicode_normalization::UnicodeNormalization;

/// Punctuation removed before comparing answers.
pub const STRIPPED_PUNCTUATION: [char; 6] = ['¿', '¡', '!', '?', '.', ','];

/// Normalize an answer for comparison.
///
/// Lower-cases, removes [`STRIPPED_PUNCTUATION`], then trims surrounding
/// whitespace. Trimming last keeps the function idempotent for inputs such as
/// `"¡ hola"`.
///
/// ```
/// use drillkit_engine::normalize::normalize;
///
/// assert_eq!(normalize("¡Hola!"), "hola");
/// assert_eq!(normalize("  ¿Dónde está? "), "dónde está");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Remove diacritics (`"está"` becomes `"esta"`).
pub fn fold_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Decides whether a typed response matches the expected answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerMatcher {
    /// Also treat answers differing only in accents as equal.
    pub ignore_accents: bool,
}

impl AnswerMatcher {
    /// Exact comparison after [`normalize`].
    pub fn strict() -> Self {
        Self::default()
    }

    /// Comparison after [`normalize`] and [`fold_accents`].
    pub fn accent_insensitive() -> Self {
        Self {
            ignore_accents: true,
        }
    }

    /// Whether `response` is an acceptable rendering of `expected`.
    pub fn matches(&self, response: &str, expected: &str) -> bool {
        self.key(response) == self.key(expected)
    }

    fn key(&self, text: &str) -> String {
        let normalized = normalize(text);
        if self.ignore_accents {
            fold_accents(&normalized)
        } else {
            normalized
        }
    }
}
