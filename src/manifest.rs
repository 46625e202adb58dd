// this_file: fontman/src/manifest.rs
//
// Manifest data model, loading and writing

use crate::{font::FontFormat, FontmanError, Result};
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, fs,
    path::Path,
};

/// Manifest format version written by this tool
pub const MANIFEST_VERSION: &str = "3.0.0";

const MANIFEST_COMMENT: &str = "Edit this file directly to add descriptions, pairings, etc. \
Human-added fields are preserved on regeneration.";

/// Broad typeface classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Category {
    #[default]
    SansSerif,
    Serif,
    Monospace,
    Display,
}

impl Category {
    /// The manifest spelling of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SansSerif => "sans-serif",
            Category::Serif => "serif",
            Category::Monospace => "monospace",
            Category::Display => "display",
        }
    }

    /// Parse a category name, accepting the spellings used by the remote
    /// catalog as well as our own.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace(' ', "-").as_str() {
            "sans-serif" | "sans" => Some(Category::SansSerif),
            "serif" => Some(Category::Serif),
            "monospace" | "mono" => Some(Category::Monospace),
            "display" | "handwriting" => Some(Category::Display),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Categories are recomputed on every run, so an unrecognised value in a
// hand-edited manifest must not invalidate the whole file.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Category::parse(&name).unwrap_or_default())
    }
}

/// Font style of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Normal,
    Italic,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Normal => "normal",
            Style::Italic => "italic",
        }
    }
}

/// Where a font file was originally downloaded from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    #[serde(default)]
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envato_url: Option<String>,

    /// Any other keys a human recorded
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One (weight, style) combination of a family
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    pub weight: u16,
    pub style: Style,
    #[serde(deserialize_with = "known_formats")]
    pub files: BTreeMap<FontFormat, String>,
}

impl Variant {
    pub fn new(weight: u16, style: Style) -> Self {
        Self {
            weight,
            style,
            files: BTreeMap::new(),
        }
    }
}

/// A font family record as stored in the manifest.
///
/// Free-form fields that humans edit (`description`, `pairings`, `tokens`,
/// `subsets`) are kept as raw JSON so any shape survives regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Family {
    pub family: String,

    pub variants: Vec<Variant>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub designer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_info: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,

    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,

    #[serde(deserialize_with = "string_set")]
    pub tags: BTreeSet<String>,

    pub category: Category,

    #[serde(deserialize_with = "string_set")]
    pub usage: BTreeSet<String>,

    pub tokens: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    pub pairings: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_fonts: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsets: Option<Value>,
}

impl Default for Family {
    fn default() -> Self {
        Self {
            family: String::new(),
            variants: Vec::new(),
            designer: None,
            license_info: None,
            license_url: None,
            provenance: None,
            tags: BTreeSet::new(),
            category: Category::default(),
            usage: BTreeSet::new(),
            tokens: Value::Object(Map::new()),
            license: None,
            pairings: Value::Array(Vec::new()),
            description: None,
            google_fonts: None,
            source: None,
            subsets: None,
        }
    }
}

impl Family {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            family: name.into(),
            ..Default::default()
        }
    }
}

/// Tag-like sets: a list of strings, a lone string, or nothing at all
fn string_set<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeSet<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(item) => BTreeSet::from([item]),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(item) => Some(item),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    })
}

// Variant files are rebuilt from disk on every run; formats we do not
// produce are dropped.
fn known_formats<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<FontFormat, String>, D::Error> {
    let Value::Object(raw) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(raw
        .into_iter()
        .filter_map(|(key, path)| match path {
            Value::String(path) => Some((FontFormat::from_extension(&key)?, path)),
            _ => None,
        })
        .collect())
}

/// The top-level manifest document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub generated: bool,

    #[serde(rename = "_comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default)]
    pub fonts: Vec<Family>,
}

impl Manifest {
    /// Build a manifest from family records, sorted by family name
    pub fn from_families(families: impl IntoIterator<Item = Family>) -> Self {
        let mut fonts: Vec<Family> = families.into_iter().collect();
        fonts.sort_by(|a, b| a.family.cmp(&b.family));
        Self {
            version: MANIFEST_VERSION.to_string(),
            generated: true,
            comment: Some(MANIFEST_COMMENT.to_string()),
            fonts,
        }
    }

    /// Serialize as pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the manifest to disk
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Load the families of a previous manifest, keyed by family name.
///
/// A missing file yields an empty map. An unreadable or invalid file is
/// reported and also treated as empty. Each family is read on its own, so a
/// malformed entry is skipped without losing the others.
pub fn load_existing(path: &Path) -> BTreeMap<String, Family> {
    let mut families = BTreeMap::new();
    if !path.exists() {
        return families;
    }

    let entries = match read_entries(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not parse existing {}: {}", path.display(), e);
            return families;
        }
    };

    for (index, entry) in entries.into_iter().enumerate() {
        let label = match entry.get("family").and_then(Value::as_str) {
            Some(name) => format!("'{}'", name),
            None => format!("#{}", index + 1),
        };
        match serde_json::from_value::<Family>(entry) {
            Ok(family) if !family.family.is_empty() => {
                families.insert(family.family.clone(), family);
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping family {} in {}: {}", label, path.display(), e),
        }
    }

    if !families.is_empty() {
        info!("  Found {} existing font families", families.len());
    }
    families
}

/// Raw `fonts` entries of a manifest file
fn read_entries(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)?;
    let mut document: Value = serde_json::from_str(&text)?;
    match document.get_mut("fonts").map(Value::take) {
        Some(Value::Array(entries)) => Ok(entries),
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(_) => Err(FontmanError::Parse("'fonts' is not a list".to_string())),
    }
}
