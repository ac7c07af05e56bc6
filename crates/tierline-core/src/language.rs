//! Language detection via Unicode script counting.
//!
//! Counts characters in the Indic script blocks and picks the dominant
//! one; Latin-only text falls back to English. Code-mixed text (native
//! script plus Latin, e.g. Hinglish) is flagged with lower confidence.

/// Script blocks checked, in priority order on ties.
const SCRIPT_RANGES: &[(char, char, &str)] = &[
    ('\u{0900}', '\u{097F}', "hi"), // Devanagari
    ('\u{0B80}', '\u{0BFF}', "ta"), // Tamil
    ('\u{0C00}', '\u{0C7F}', "te"), // Telugu
    ('\u{0980}', '\u{09FF}', "bn"), // Bengali
    ('\u{0C80}', '\u{0CFF}', "kn"), // Kannada
    ('\u{0D00}', '\u{0D7F}', "ml"), // Malayalam
    ('\u{0A80}', '\u{0AFF}', "gu"), // Gujarati
    ('\u{0B00}', '\u{0B7F}', "or"), // Odia
];

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("bn", "Bengali"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("gu", "Gujarati"),
    ("or", "Odia"),
];

/// Result of language detection.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageResult {
    /// ISO 639-1 code (e.g. "hi", "en", "ta").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// 0.0 to 1.0.
    pub confidence: f64,
    /// Code-mixed text, e.g. Hinglish.
    pub is_mixed: bool,
}

impl LanguageResult {
    fn new(code: &str, confidence: f64, is_mixed: bool) -> Self {
        let name = LANGUAGE_NAMES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, n)| *n)
            .unwrap_or(code);
        Self {
            code: code.to_string(),
            name: name.to_string(),
            confidence,
            is_mixed,
        }
    }
}

/// Detect the dominant language of `text`.
pub fn detect_language(text: &str) -> LanguageResult {
    let total_chars = text.chars().filter(|c| *c != ' ').count();
    if total_chars == 0 {
        return LanguageResult::new("en", 0.5, false);
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for &(lo, hi, code) in SCRIPT_RANGES {
        let count = text.chars().filter(|c| (lo..=hi).contains(c)).count();
        if count > 0 {
            counts.push((code, count));
        }
    }

    if counts.is_empty() {
        return LanguageResult::new("en", 0.8, false);
    }

    // Highest count wins; the range table order breaks ties.
    let mut dominant = counts[0].0;
    let mut dominant_count = counts[0].1;
    for &(code, count) in &counts[1..] {
        if count > dominant_count {
            dominant = code;
            dominant_count = count;
        }
    }

    let ratio = dominant_count as f64 / total_chars as f64;
    let is_mixed = ratio > 0.1 && ratio < 0.7;
    let confidence = if is_mixed {
        0.6
    } else {
        (ratio + 0.3).min(0.95)
    };

    LanguageResult::new(dominant, confidence, is_mixed)
}
