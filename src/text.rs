//! Query text normalization and tokenization.
//!
//! All lexical scoring operates on normalized text: lowercased, with every
//! character outside `[a-z0-9 ]` mapped to a space and whitespace runs
//! collapsed. [`normalize`] is pure, total, and idempotent.

use std::collections::HashSet;
use std::sync::LazyLock;

/// English function words excluded from token-set comparison.
///
/// The set is part of the scoring calibration: the match threshold and
/// blend weights in [`crate::score`] were tuned against tokens filtered
/// by exactly this list.
static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "is", "am", "are", "a", "an", "of", "to", "and", "or", "on", "in", "at", "for",
        "from", "by", "with", "as", "be", "been", "this", "that", "those", "these", "it", "its",
        "was", "were", "will", "shall", "do", "does", "did", "how", "what", "when", "where",
        "which", "who", "whom", "why",
    ]
    .into_iter()
    .collect()
});

/// Normalize text for matching: lowercase, strip non-alphanumerics,
/// collapse whitespace, trim.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.to_lowercase().chars() {
        let keep = match c {
            'a'..='z' | '0'..='9' => Some(c),
            _ => None, // whitespace and punctuation both become separators
        };
        match keep {
            Some(c) => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
            None => pending_space = true,
        }
    }

    out
}

/// Split normalized text into tokens, dropping stopwords.
///
/// Tokens come back in input order; downstream set-based scoring ignores
/// the order but keeping it makes test output stable.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("What are the Library Hours?"), "what are the library hours");
    }

    #[test]
    fn test_normalize_punctuation_becomes_space() {
        assert_eq!(normalize("wi-fi/network"), "wi fi network");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  a \t b\n\nc  "), "a b c");
    }

    #[test]
    fn test_normalize_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ??? ..."), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "Hello, World!",
            "  spaced   out  ",
            "UPPER lower 123",
            "¿Dónde está la biblioteca?",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_normalize_non_latin_stripped() {
        // Non-ASCII letters are outside [a-z0-9] and become separators.
        assert_eq!(normalize("café"), "caf");
    }

    #[test]
    fn test_tokenize_drops_stopwords() {
        assert_eq!(
            tokenize("What are the library hours?"),
            vec!["library", "hours"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("the is of to").is_empty());
    }

    #[test]
    fn test_tokenize_preserves_order() {
        assert_eq!(tokenize("hostel fee meal plan"), vec!["hostel", "fee", "meal", "plan"]);
    }
}
