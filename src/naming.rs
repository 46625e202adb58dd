// this_file: fontman/src/naming.rs
//
// Family name normalization

use once_cell::sync::Lazy;
use regex::Regex;

/// Weight words recognised at the end of a family name
pub const WEIGHT_SUFFIXES: &[(&str, u16)] = &[
    ("thin", 100),
    ("hairline", 100),
    ("extralight", 200),
    ("ultralight", 200),
    ("light", 300),
    ("regular", 400),
    ("normal", 400),
    ("medium", 500),
    ("semibold", 600),
    ("demibold", 600),
    ("bold", 700),
    ("extrabold", 800),
    ("ultrabold", 800),
    ("black", 900),
    ("heavy", 900),
];

/// Suffix patterns, longest word first so "ExtraBold" wins over "Bold"
static SUFFIX_PATTERNS: Lazy<Vec<(Regex, u16)>> = Lazy::new(|| {
    let mut suffixes = WEIGHT_SUFFIXES.to_vec();
    suffixes.sort_by_key(|(word, _)| std::cmp::Reverse(word.len()));
    suffixes
        .into_iter()
        .map(|(word, weight)| {
            let pattern = format!(r"(?i)\s+{}$", regex::escape(word));
            (Regex::new(&pattern).expect("weight suffix pattern"), weight)
        })
        .collect()
});

/// Strip a trailing weight word from a family name.
///
/// Returns the normalized name and the weight the suffix implies, if any.
/// `"Matech ExtraBold"` becomes `("Matech", Some(800))`, `"Inter"` stays
/// `("Inter", None)`.
pub fn normalize_family_name(family: &str) -> (String, Option<u16>) {
    for (pattern, weight) in SUFFIX_PATTERNS.iter() {
        if pattern.is_match(family) {
            let normalized = pattern.replace(family, "").trim().to_string();
            return (normalized, Some(*weight));
        }
    }
    (family.to_string(), None)
}

/// Pick the effective weight of a file.
///
/// Fonts often leave usWeightClass at 400 even when the name says otherwise,
/// so a suffix weight only overrides that default.
pub fn resolve_weight(font_weight: u16, suffix_weight: Option<u16>) -> u16 {
    match suffix_weight {
        Some(weight) if font_weight == 400 => weight,
        _ => font_weight,
    }
}
