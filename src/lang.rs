//! Heuristic language detection and the supported-language table.
//!
//! Detection is pattern-based, not statistical: Unicode script ranges are
//! checked first (a single CJK or Devanagari character is decisive), then a
//! small set of common-word patterns for Latin-script languages. Anything
//! that matches neither defaults to English — short or ambiguous Latin
//! text is routinely misread as `"en"`, which is acceptable because the
//! baseline pipeline treats English as the no-translation case anyway.

use regex::Regex;
use std::sync::LazyLock;

/// Baseline language: queries are translated into it for matching and
/// answers are translated out of it for the user.
pub const BASELINE_LANG: &str = "en";

/// Script ranges checked in order; the first hit wins.
///
/// Order matters for overlapping heuristics (e.g. Japanese kana before a
/// kanji-only text falls through to the CJK range listed first).
const SCRIPT_RANGES: &[(&str, &[(char, char)])] = &[
    ("zh", &[('\u{4e00}', '\u{9fff}')]),
    ("ja", &[('\u{3040}', '\u{309f}'), ('\u{30a0}', '\u{30ff}')]),
    ("ko", &[('\u{ac00}', '\u{d7af}')]),
    ("ar", &[('\u{0600}', '\u{06ff}')]),
    ("hi", &[('\u{0900}', '\u{097f}')]),
    ("bn", &[('\u{0980}', '\u{09ff}')]),
    ("ta", &[('\u{0b80}', '\u{0bff}')]),
    ("te", &[('\u{0c00}', '\u{0c7f}')]),
    ("ml", &[('\u{0d00}', '\u{0d7f}')]),
    ("kn", &[('\u{0c80}', '\u{0cff}')]),
    ("gu", &[('\u{0a80}', '\u{0aff}')]),
    ("pa", &[('\u{0a00}', '\u{0a7f}')]),
    ("th", &[('\u{0e00}', '\u{0e7f}')]),
    ("ru", &[('\u{0400}', '\u{04ff}')]),
    ("el", &[('\u{0370}', '\u{03ff}')]),
    ("he", &[('\u{0590}', '\u{05ff}')]),
];

/// Common greeting/particle words per Latin-script language, tried after
/// the script ranges in this order.
static COMMON_WORDS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("es", r"(?i)\b(hola|gracias|por favor|sí|buenos|días|noche|mañana|tarde)\b"),
        ("fr", r"(?i)\b(bonjour|merci|s'il vous plaît|oui|bon|jour|nuit|matin|après-midi)\b"),
        ("de", r"(?i)\b(hallo|danke|bitte|ja|nein|guten|tag|nacht|morgen|nachmittag)\b"),
        ("it", r"(?i)\b(ciao|grazie|per favore|sì|buon|giorno|notte|mattina|pomeriggio)\b"),
        ("pt", r"(?i)\b(olá|obrigado|por favor|sim|não|bom|dia|noite|manhã)\b"),
        ("hi", r"(?i)(नमस्ते|धन्यवाद|कृपया|हाँ|नहीं|अच्छा|दिन|रात|सुबह|शाम)"),
        ("ar", r"(?i)(مرحبا|شكرا|من فضلك|نعم|جيد|يوم|ليل|صباح|مساء)"),
    ]
    .into_iter()
    .map(|(lang, pattern)| (lang, Regex::new(pattern).expect("static pattern")))
    .collect()
});

/// Language codes and display names the bridge accepts as hints and
/// translation targets.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("bn", "Bengali"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("ml", "Malayalam"),
    ("kn", "Kannada"),
    ("gu", "Gujarati"),
    ("mr", "Marathi"),
    ("pa", "Punjabi"),
    ("or", "Odia"),
    ("as", "Assamese"),
    ("ne", "Nepali"),
    ("si", "Sinhala"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("id", "Indonesian"),
    ("ms", "Malay"),
    ("tl", "Filipino"),
    ("tr", "Turkish"),
    ("pl", "Polish"),
    ("nl", "Dutch"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("no", "Norwegian"),
    ("fi", "Finnish"),
    ("cs", "Czech"),
    ("sk", "Slovak"),
    ("hu", "Hungarian"),
    ("ro", "Romanian"),
    ("bg", "Bulgarian"),
    ("hr", "Croatian"),
    ("sl", "Slovenian"),
    ("et", "Estonian"),
    ("lv", "Latvian"),
    ("lt", "Lithuanian"),
    ("uk", "Ukrainian"),
    ("be", "Belarusian"),
    ("mk", "Macedonian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("bs", "Bosnian"),
    ("mt", "Maltese"),
    ("is", "Icelandic"),
    ("ga", "Irish"),
    ("cy", "Welsh"),
    ("eu", "Basque"),
    ("ca", "Catalan"),
    ("gl", "Galician"),
];

/// Best-effort language detection from character patterns.
///
/// Never fails and never touches the network. Empty or unrecognized input
/// returns the baseline language.
pub fn detect_language(text: &str) -> &'static str {
    if text.trim().is_empty() {
        return BASELINE_LANG;
    }

    for &(lang, ranges) in SCRIPT_RANGES {
        if text
            .chars()
            .any(|c| ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c)))
        {
            return lang;
        }
    }

    for &(lang, ref pattern) in COMMON_WORDS.iter() {
        if pattern.is_match(text) {
            return lang;
        }
    }

    BASELINE_LANG
}

/// True if the code appears in [`SUPPORTED_LANGUAGES`].
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// Display name for a code, or the code itself when unknown.
pub fn language_name(code: &str) -> &str {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}
