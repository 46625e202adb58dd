// this_file: fontman/src/font.rs
//
// Font metadata extraction

use crate::{utils::file_stem, FontmanError, Result};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use skrifa::prelude::*;
use skrifa::raw::TableProvider;
use skrifa::string::StringId;
use skrifa::FontRef;
use std::{collections::BTreeMap, fs::File, path::Path};

/// Weight reported when a font has no OS/2 table
pub const DEFAULT_WEIGHT: u16 = 400;

/// Italic bit of the OS/2 fsSelection field
const FS_SELECTION_ITALIC: u16 = 1;

/// Font asset formats tracked in the manifest.
///
/// The declaration order is the order sources are listed in, both in JSON
/// and in the generated stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Woff2,
    Ttf,
    Otf,
}

impl FontFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            FontFormat::Woff2 => "woff2",
            FontFormat::Ttf => "ttf",
            FontFormat::Otf => "otf",
        }
    }

    /// Value of the CSS `format()` hint
    pub fn css_format(&self) -> &'static str {
        match self {
            FontFormat::Woff2 => "woff2",
            FontFormat::Ttf => "truetype",
            FontFormat::Otf => "opentype",
        }
    }

    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(&path.extension()?.to_string_lossy())
    }

    /// Parse an extension or manifest key, ignoring case
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "woff2" => Some(FontFormat::Woff2),
            "ttf" => Some(FontFormat::Ttf),
            "otf" => Some(FontFormat::Otf),
            _ => None,
        }
    }
}

/// Metadata of one physical font file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontFile {
    /// Family name from the name table (ID 1)
    pub family: String,

    /// Subfamily name from the name table (ID 2)
    pub style: String,

    /// OS/2 usWeightClass
    pub weight: u16,

    pub is_italic: bool,

    pub designer: Option<String>,

    pub license_info: Option<String>,

    pub license_url: Option<String>,

    /// File name without extension
    pub file_stem: String,

    /// Asset paths relative to the font root, by format
    pub assets: BTreeMap<FontFormat, String>,
}

impl FontFile {
    /// Load font metadata from a file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let data = unsafe { Mmap::map(&file)? };
        let font = FontRef::new(&data).map_err(|e| FontmanError::Font(e.to_string()))?;

        let mut info = Self::from_font(&font);
        info.file_stem = file_stem(path);
        Ok(info)
    }

    /// Extract font metadata from a font reference
    pub fn from_font(font: &FontRef) -> Self {
        let family = name_string(font, StringId::FAMILY_NAME).unwrap_or_else(|| "Unknown".to_string());
        let style = name_string(font, StringId::SUBFAMILY_NAME).unwrap_or_else(|| "Regular".to_string());

        let (weight, fs_selection) = match font.os2() {
            Ok(os2) => (os2.us_weight_class(), Some(os2.fs_selection().bits())),
            Err(_) => (DEFAULT_WEIGHT, None),
        };

        let is_italic = style.to_lowercase().contains("italic")
            || fs_selection.is_some_and(|bits| bits & FS_SELECTION_ITALIC != 0);

        FontFile {
            family,
            style,
            weight,
            is_italic,
            designer: name_string(font, StringId::DESIGNER),
            license_info: name_string(font, StringId::LICENSE_DESCRIPTION),
            license_url: name_string(font, StringId::LICENSE_URL),
            file_stem: String::new(),
            assets: BTreeMap::new(),
        }
    }
}

/// Read a name table entry, preferring English records
fn name_string(font: &FontRef, id: StringId) -> Option<String> {
    font.localized_strings(id)
        .english_or_first()
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty())
}

/// Check if a file is a font we can read metadata from
pub fn is_font_file(path: &Path) -> bool {
    matches!(
        FontFormat::from_path(path),
        Some(FontFormat::Ttf) | Some(FontFormat::Otf)
    )
}
