// this_file: fontman/src/merge.rs
//
// Preserving merge of regenerated family records with a prior manifest

use crate::manifest::{Family, Provenance};
use serde_json::Value;
use std::{collections::BTreeMap, path::Path};

/// Maps a font file name (always with a `.ttf` extension) to its provenance
pub type ProvenanceMap = BTreeMap<String, Provenance>;

/// Overlay preserved fields of `old` onto a freshly computed record.
///
/// Optional fields are copied only when the new record lacks them. Tags are
/// unioned, token groups missing from the new record are filled from the old
/// one, and pairings always come from the old record when it has any.
/// Everything else keeps its newly computed value.
pub fn merge_preserved(mut new: Family, old: &Family) -> Family {
    fill(&mut new.description, &old.description);
    fill(&mut new.designer, &old.designer);
    fill(&mut new.source, &old.source);
    fill(&mut new.license, &old.license);
    fill(&mut new.license_info, &old.license_info);
    fill(&mut new.license_url, &old.license_url);
    fill(&mut new.google_fonts, &old.google_fonts);
    fill(&mut new.subsets, &old.subsets);
    fill(&mut new.provenance, &old.provenance);

    if new.usage.is_empty() {
        new.usage = old.usage.clone();
    }

    new.tags.extend(old.tags.iter().cloned());

    if !is_blank(&old.pairings) {
        new.pairings = old.pairings.clone();
    }

    match (&mut new.tokens, &old.tokens) {
        (Value::Object(tokens), Value::Object(old_tokens)) => {
            for (key, value) in old_tokens {
                tokens.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        (tokens, old_tokens) => {
            if is_blank(tokens) {
                *tokens = old_tokens.clone();
            }
        }
    }

    new
}

/// Null, or an empty string, list or object
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn fill<T: Clone>(new: &mut Option<T>, old: &Option<T>) {
    if new.is_none() {
        new.clone_from(old);
    }
}

/// Build a file name → provenance lookup from prior family records.
///
/// Every variant file of a family with a `_source` record maps to it under
/// its `<stem>.ttf` name, so provenance follows a font through renames as
/// long as its stem is unchanged.
pub fn provenance_map<'a>(families: impl IntoIterator<Item = &'a Family>) -> ProvenanceMap {
    let mut map = ProvenanceMap::new();
    for family in families {
        let Some(provenance) = &family.provenance else {
            continue;
        };
        for variant in &family.variants {
            for file_path in variant.files.values() {
                if let Some(name) = ttf_file_name(file_path) {
                    map.insert(name, provenance.clone());
                }
            }
        }
    }
    map
}

fn ttf_file_name(file_path: &str) -> Option<String> {
    let stem = Path::new(file_path).file_stem()?.to_string_lossy();
    Some(format!("{}.ttf", stem))
}
