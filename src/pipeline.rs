// this_file: fontman/src/pipeline.rs
//
// Manifest generation run

use crate::{
    archive::import_archives,
    catalog::Catalog,
    css::generate_css,
    font::FontFile,
    group::group_families,
    install::install_fonts,
    manifest::{self, Family, Manifest},
    merge::provenance_map,
    utils::{display_name, file_stem, FontDirs},
    woff2::convert_file,
    Result,
};
use log::{debug, info, warn};
use std::{collections::BTreeMap, fs, path::PathBuf};

/// Settings for one generation run
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Font package root holding `ttf/`, `woff2/`, `css/` and `fonts.json`
    pub root: PathBuf,

    /// Write missing WOFF2 files
    pub convert_woff2: bool,

    /// ZIP files or directories of ZIP files to import first
    pub import_zip: Vec<PathBuf>,

    /// Copy fonts into the user's font directory
    pub install_local: bool,

    /// Enrich families from the Google Fonts catalog
    pub lookup_metadata: bool,

    /// Google Fonts API key
    pub api_key: Option<String>,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub imported: usize,
    pub installed: usize,
    pub converted: usize,
    pub fonts_read: usize,
    pub families: usize,
    pub variants: usize,
    pub enriched: usize,
    /// Manifest path, when one was written
    pub manifest: Option<PathBuf>,
}

/// Run the whole pipeline: import, install, convert, extract, group, merge,
/// enrich and write the manifest and stylesheet.
pub fn run(options: &GenerateOptions) -> Result<Summary> {
    let dirs = FontDirs::new(&options.root);
    dirs.ensure()?;
    let mut summary = Summary::default();

    info!("Loading existing manifest...");
    let existing = manifest::load_existing(&dirs.manifest);
    let mut provenance = provenance_map(existing.values());

    if !options.import_zip.is_empty() {
        info!("Importing fonts from ZIP archives...");
        summary.imported = import_archives(&options.import_zip, &dirs.ttf, &mut provenance)?;
        info!("✓ Imported {} font files", summary.imported);
        let envato = provenance
            .values()
            .filter(|source| source.envato_url.is_some())
            .count();
        if envato > 0 {
            info!("  ({} from Envato Elements)", envato);
        }
    }

    let sources = dirs.source_fonts();
    if sources.is_empty() {
        info!("No font files found in {}", dirs.ttf.display());
        info!("Copy .ttf/.otf files there, or use --import-zip to extract them from ZIP archives");
        return Ok(summary);
    }
    info!("Processing {} font files...", sources.len());

    if options.install_local {
        summary.installed = install_fonts(&sources)?;
        info!("✓ Installed {} fonts", summary.installed);
    }

    if options.convert_woff2 {
        info!("Converting to WOFF2...");
        summary.converted = convert_missing(&dirs, &sources);
    }

    info!("Extracting metadata...");
    let fonts = extract_all(&dirs, &sources);
    summary.fonts_read = fonts.len();
    if fonts.is_empty() {
        info!("No valid font files found.");
        return Ok(summary);
    }

    let mut families = group_families(&fonts, &existing, &provenance);

    if options.lookup_metadata {
        info!("Looking up Google Fonts metadata...");
        match Catalog::fetch(options.api_key.as_deref()) {
            Ok(catalog) => {
                summary.enriched = catalog.enrich(&mut families);
                info!("✓ Enriched {} families with Google Fonts metadata", summary.enriched);
            }
            Err(e) => warn!("Google Fonts lookup failed: {}", e),
        }
    }

    write_outputs(&dirs, &families)?;
    summary.families = families.len();
    summary.variants = families.values().map(|f| f.variants.len()).sum();
    summary.manifest = Some(dirs.manifest.clone());

    info!("✓ {} font families", summary.families);
    info!("✓ {} total variants", summary.variants);
    for family in families.values().filter(|f| !f.tags.is_empty()) {
        let tags: Vec<&str> = family.tags.iter().map(String::as_str).collect();
        info!("  {} ({}): {}", family.family, family.category, tags.join(", "));
    }

    Ok(summary)
}

/// Write WOFF2 files for sources lacking one. Returns how many were written.
fn convert_missing(dirs: &FontDirs, sources: &[PathBuf]) -> usize {
    let mut converted = 0;
    for source in sources {
        let dest = dirs.woff2_for(&file_stem(source));
        let dest_name = display_name(&dest);
        if dest.exists() {
            debug!("  Skipped (exists): {}", dest_name);
            continue;
        }
        match convert_file(source, &dest) {
            Ok(()) => {
                info!("  Converted: {} -> {}", display_name(source), dest_name);
                converted += 1;
            }
            Err(e) => warn!("Error converting {}: {}", display_name(source), e),
        }
    }
    converted
}

/// Read metadata of every source font, skipping unreadable files
fn extract_all(dirs: &FontDirs, sources: &[PathBuf]) -> Vec<FontFile> {
    let mut fonts = Vec::new();
    for source in sources {
        match FontFile::load(source) {
            Ok(mut font) => {
                font.assets = dirs.assets_for(source);
                info!(
                    "  {}: {} {} {}",
                    display_name(source),
                    font.family,
                    font.weight,
                    font.style
                );
                fonts.push(font);
            }
            Err(e) => warn!("Error reading {}: {}", display_name(source), e),
        }
    }
    fonts
}

fn write_outputs(dirs: &FontDirs, families: &BTreeMap<String, Family>) -> Result<()> {
    Manifest::from_families(families.values().cloned()).write(&dirs.manifest)?;
    info!("Generated: {}", dirs.manifest.display());

    fs::write(&dirs.stylesheet, generate_css(families))?;
    info!("Generated: {}", dirs.stylesheet.display());
    Ok(())
}
