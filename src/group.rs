// this_file: fontman/src/group.rs
//
// Grouping of font files into families and variants

use crate::{
    classify::{categorize, default_tokens, extract_tags, infer_usage},
    font::FontFile,
    manifest::{Family, Style, Variant},
    merge::{merge_preserved, ProvenanceMap},
    naming::{normalize_family_name, resolve_weight},
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// License assumed when neither the fonts nor a human recorded one
pub const DEFAULT_LICENSE: &str = "OFL";

/// Family under construction
#[derive(Default)]
struct FamilyBuilder {
    family: Family,
    variants: HashMap<(u16, Style), Variant>,
    /// Raw family names and file stems seen, for tag detection
    aliases: Vec<String>,
}

impl FamilyBuilder {
    fn add(&mut self, font: &FontFile, weight: u16, provenance: &ProvenanceMap) {
        for alias in [&font.family, &font.file_stem] {
            if !alias.is_empty() && !self.aliases.contains(alias) {
                self.aliases.push(alias.clone());
            }
        }

        let style = if font.is_italic {
            Style::Italic
        } else {
            Style::Normal
        };
        let variant = self
            .variants
            .entry((weight, style))
            .or_insert_with(|| Variant::new(weight, style));
        for (format, path) in &font.assets {
            variant
                .files
                .entry(*format)
                .or_insert_with(|| path.clone());
        }

        let family = &mut self.family;
        if family.designer.is_none() {
            family.designer.clone_from(&font.designer);
        }
        if family.license_info.is_none() {
            family.license_info.clone_from(&font.license_info);
        }
        if family.license_url.is_none() {
            family.license_url.clone_from(&font.license_url);
        }

        if let Some(source) = provenance.get(&format!("{}.ttf", font.file_stem)) {
            family.provenance = Some(source.clone());
        }
    }

    fn finish(self) -> Family {
        let FamilyBuilder {
            mut family,
            variants,
            aliases,
        } = self;

        let mut variants: Vec<Variant> = variants.into_values().collect();
        variants.sort_by(|a, b| (a.weight, a.style.as_str()).cmp(&(b.weight, b.style.as_str())));
        family.variants = variants;

        family.tags = extract_tags(&family.family, &aliases.join(" "));
        family.category = categorize(&family.family, &family.tags);
        family.usage = infer_usage(family.category, &family.tags);
        family.tokens = Value::Object(default_tokens(family.category));
        family.pairings = Value::Array(Vec::new());
        family
    }
}

/// Group extracted font files into family records.
///
/// Files are processed in order; the first file to supply a format path for
/// a variant, or designer and license metadata for a family, wins. Each
/// finished family is merged with its record in `existing`, if any.
pub fn group_families(
    fonts: &[FontFile],
    existing: &BTreeMap<String, Family>,
    provenance: &ProvenanceMap,
) -> BTreeMap<String, Family> {
    let mut builders: BTreeMap<String, FamilyBuilder> = BTreeMap::new();

    for font in fonts {
        let (name, suffix_weight) = normalize_family_name(&font.family);
        let weight = resolve_weight(font.weight, suffix_weight);

        let builder = builders.entry(name.clone()).or_insert_with(|| FamilyBuilder {
            family: Family::new(name.clone()),
            ..Default::default()
        });
        builder.add(font, weight, provenance);
    }

    builders
        .into_iter()
        .map(|(name, builder)| {
            let mut family = builder.finish();
            if let Some(old) = existing.get(&name) {
                family = merge_preserved(family, old);
            }
            if family.license.is_none() {
                family.license = Some(DEFAULT_LICENSE.to_string());
            }
            (name, family)
        })
        .collect()
}
