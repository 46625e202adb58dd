// this_file: fontman/src/utils.rs
//
// Directory layout and platform paths

use crate::{
    font::{is_font_file, FontFormat},
    FontmanError, Result,
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Layout of a font package directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDirs {
    pub root: PathBuf,
    pub ttf: PathBuf,
    pub woff2: PathBuf,
    pub css: PathBuf,
    pub manifest: PathBuf,
    pub stylesheet: PathBuf,
}

impl FontDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            ttf: root.join("ttf"),
            woff2: root.join("woff2"),
            css: root.join("css"),
            manifest: root.join("fonts.json"),
            stylesheet: root.join("css").join("fonts.css"),
            root,
        }
    }

    /// Create the asset directories if they are missing
    pub fn ensure(&self) -> Result<()> {
        if self.root.exists() && !self.root.is_dir() {
            return Err(FontmanError::Config(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        for dir in [&self.ttf, &self.woff2, &self.css] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Font files at the top level of `ttf/`, in path order
    pub fn source_fonts(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.ttf)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && is_font_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Path of the WOFF2 counterpart of a source font
    pub fn woff2_for(&self, stem: &str) -> PathBuf {
        self.woff2.join(format!("{}.woff2", stem))
    }

    /// Asset paths (relative to the root) of a source font in `ttf/` and
    /// of its WOFF2 counterpart, if one exists
    pub fn assets_for(&self, source: &Path) -> BTreeMap<FontFormat, String> {
        let mut assets = BTreeMap::new();

        let woff2 = self.woff2_for(&file_stem(source));
        if woff2.is_file() {
            assets.insert(FontFormat::Woff2, format!("woff2/{}", display_name(&woff2)));
        }
        if let Some(format) = FontFormat::from_path(source) {
            assets.insert(format, format!("ttf/{}", display_name(source)));
        }
        assets
    }
}

/// Get the per-user font directory of this platform
pub fn system_font_dir() -> Result<PathBuf> {
    if let Some(dir) = dirs::font_dir() {
        return Ok(dir);
    }

    if cfg!(target_os = "windows") {
        if let Some(local) = dirs::data_local_dir() {
            return Ok(local.join("Microsoft").join("Windows").join("Fonts"));
        }
    }

    Err(FontmanError::Config(
        "Could not determine the user font directory".to_string(),
    ))
}

/// File name of a path for log output
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// File stem of a path as a string
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
