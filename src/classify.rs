// this_file: fontman/src/classify.rs
//
// Heuristic tags, category, usage hints and design tokens

use crate::manifest::Category;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

/// Tag → keywords looked for in family names and file names
pub const TAG_PATTERNS: &[(&str, &[&str])] = &[
    ("pixel", &["pixel", "bitmap", "8bit", "retro"]),
    ("mono", &["mono", "monospace", "fixed", "code"]),
    ("display", &["display", "headline", "poster", "decorative"]),
    ("handwritten", &["hand", "script", "brush", "signature"]),
    ("serif", &["serif", "roman", "classical"]),
    ("sans", &["sans", "gothic", "grotesk"]),
    ("blackletter", &["blackletter", "fraktur", "gothic", "old english"]),
    ("rounded", &["rounded", "soft"]),
    ("condensed", &["condensed", "narrow", "compressed"]),
    ("extended", &["extended", "wide", "expanded"]),
    ("stencil", &["stencil"]),
    ("outline", &["outline", "hollow"]),
    ("slab", &["slab"]),
    ("geometric", &["geometric", "futura"]),
    ("humanist", &["humanist"]),
    ("techno", &["tech", "futuristic", "cyber", "digital"]),
    ("vintage", &["vintage", "retro", "classic", "antique"]),
    ("modern", &["modern", "contemporary"]),
    ("clock", &["clock", "time", "watch", "timer", "stopwatch"]),
];

/// Well-known serif families that don't say "serif" in their name
const SERIF_NAMES: &[&str] = &["lora", "georgia", "times", "garamond"];

/// Extract style tags from a family name and auxiliary text such as file names
pub fn extract_tags(family: &str, aux: &str) -> BTreeSet<String> {
    let search_text = format!("{} {}", family, aux).to_lowercase();

    TAG_PATTERNS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| search_text.contains(kw)))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

/// Categorize a family by its tags first, then its name
pub fn categorize(family: &str, tags: &BTreeSet<String>) -> Category {
    let has = |tag: &str| tags.contains(tag);
    let name = family.to_lowercase();

    if has("mono") {
        Category::Monospace
    } else if has("display") || has("pixel") || has("clock") {
        Category::Display
    } else if name.contains("mono") {
        Category::Monospace
    } else if SERIF_NAMES.iter().any(|serif| name.contains(serif))
        || (name.contains("serif") && !name.contains("sans"))
    {
        Category::Serif
    } else {
        Category::SansSerif
    }
}

/// Infer usage hints from the category and tags
pub fn infer_usage(category: Category, tags: &BTreeSet<String>) -> BTreeSet<String> {
    let base: &[&str] = match category {
        Category::Monospace => &["code", "data"],
        Category::Display => &["heading"],
        Category::Serif => &["body", "heading"],
        Category::SansSerif => &["body", "ui"],
    };

    let mut usage: BTreeSet<String> = base.iter().map(|s| s.to_string()).collect();
    if tags.contains("pixel") || tags.contains("clock") {
        usage.insert("decorative".to_string());
    }
    if tags.contains("handwritten") {
        usage.insert("accent".to_string());
    }
    usage
}

/// Default design tokens for a category
pub fn default_tokens(category: Category) -> Map<String, Value> {
    let (body_lh, heading_lh, heading_ls) = match category {
        Category::SansSerif => (1.5, 1.2, "-0.02em"),
        Category::Serif => (1.6, 1.25, "-0.01em"),
        Category::Monospace => (1.5, 1.3, "0"),
        Category::Display => (1.4, 1.1, "-0.03em"),
    };

    let mut tokens = Map::new();
    tokens.insert(
        "lineHeight".to_string(),
        json!({ "body": body_lh, "heading": heading_lh }),
    );
    tokens.insert(
        "letterSpacing".to_string(),
        json!({ "body": "0", "heading": heading_ls }),
    );
    tokens
}
