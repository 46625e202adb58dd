// this_file: fontman/src/archive.rs
//
// Font import from ZIP archives

use crate::{
    font::is_font_file,
    manifest::Provenance,
    merge::ProvenanceMap,
    utils::{display_name, file_stem},
    Result,
};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Envato Elements downloads end in `-YYYY-MM-DD-HH-MM-SS-utc`
static ENVATO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)-(\d{4}-\d{2}-\d{2})-\d{2}-\d{2}-\d{2}-utc$").expect("envato date pattern")
});

const ENVATO_BASE_URL: &str = "https://elements.envato.com";

/// Subdirectory that imported archives are moved into
const PROCESSED_DIR: &str = "processed";

/// Parse an Envato Elements archive name into a provenance record.
///
/// `matech-modern-techno-monospace-2024-06-07-19-45-05-utc.zip` yields the
/// slug `matech-modern-techno-monospace` downloaded on `2024-06-07`. Other
/// names yield `None`.
pub fn parse_envato_slug(zip_filename: &str) -> Option<Provenance> {
    let name = zip_filename.strip_suffix(".zip").unwrap_or(zip_filename);
    let captures = ENVATO_DATE.captures(name)?;
    let whole = captures.get(0)?;
    let slug = &name[..whole.start()];

    Some(Provenance {
        slug: slug.to_string(),
        download_date: Some(captures[1].to_string()),
        envato_url: Some(format!("{}/{}", ENVATO_BASE_URL, slug)),
        extra: BTreeMap::new(),
    })
}

/// Whether an archive member should be skipped outright
fn is_junk_entry(name: &str) -> bool {
    name.ends_with('/') || name.starts_with("__MACOSX") || name.starts_with("._")
}

/// Extract the TTF and OTF members of one archive into `dest_dir`.
///
/// Members are flattened to their file names. Returns the paths written.
pub fn extract_fonts(
    zip_path: &Path,
    dest_dir: &Path,
    provenance: &mut ProvenanceMap,
) -> Result<Vec<PathBuf>> {
    let envato = zip_path
        .file_name()
        .and_then(|name| parse_envato_slug(&name.to_string_lossy()));

    let mut archive = zip::ZipArchive::new(File::open(zip_path)?)?;
    let mut extracted = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let member = entry.name().to_string();
        if entry.is_dir() || is_junk_entry(&member) {
            continue;
        }

        let Some(filename) = Path::new(&member).file_name().map(|n| n.to_owned()) else {
            continue;
        };
        let filename_str = filename.to_string_lossy().into_owned();
        if filename_str.starts_with("._") || !is_font_file(Path::new(&filename)) {
            continue;
        }

        let dest_path = dest_dir.join(&filename);
        let mut out = File::create(&dest_path)?;
        io::copy(&mut entry, &mut out)?;
        info!("  Extracted: {}", filename_str);

        if let Some(source) = &envato {
            provenance.insert(format!("{}.ttf", file_stem(&dest_path)), source.clone());
        }
        extracted.push(dest_path);
    }

    Ok(extracted)
}

/// Import fonts from ZIP files, or directories containing ZIP files.
///
/// Archives found in a directory are moved into its `processed/`
/// subdirectory afterwards, so new downloads can be dropped in and imported
/// incrementally. Missing paths are skipped with a warning. Returns the
/// number of font files extracted.
pub fn import_archives(
    paths: &[PathBuf],
    dest_dir: &Path,
    provenance: &mut ProvenanceMap,
) -> Result<usize> {
    fs::create_dir_all(dest_dir)?;
    let mut total = 0;
    let mut processed: Vec<(PathBuf, PathBuf)> = Vec::new();

    for path in paths {
        if !path.exists() {
            warn!("{} not found, skipping", path.display());
            continue;
        }

        if path.is_dir() {
            let zips = top_level_zips(path);
            if zips.is_empty() {
                info!("  No new ZIP files found in {}", path.display());
                continue;
            }
            let processed_dir = path.join(PROCESSED_DIR);
            fs::create_dir_all(&processed_dir)?;
            for zip_path in zips {
                info!("Importing from: {}", display_name(&zip_path));
                total += extract_fonts(&zip_path, dest_dir, provenance)?.len();
                processed.push((zip_path, processed_dir.clone()));
            }
        } else {
            info!("Importing from: {}", display_name(path));
            total += extract_fonts(path, dest_dir, provenance)?.len();
        }
    }

    for (zip_path, processed_dir) in processed {
        let Some(name) = zip_path.file_name() else {
            continue;
        };
        move_file(&zip_path, &processed_dir.join(name))?;
        info!("  Moved: {} -> {}/", display_name(&zip_path), PROCESSED_DIR);
    }

    Ok(total)
}

fn top_level_zips(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        })
        .collect()
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_err() {
        // Cross-device moves need a copy
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in members {
            if name.ends_with('/') {
                writer
                    .add_directory(name.trim_end_matches('/'), SimpleFileOptions::default())
                    .unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_parse_envato_slug() {
        let info =
            parse_envato_slug("matech-modern-techno-monospace-2024-06-07-19-45-05-utc.zip")
                .unwrap();
        assert_eq!(info.slug, "matech-modern-techno-monospace");
        assert_eq!(info.download_date.as_deref(), Some("2024-06-07"));
        assert_eq!(
            info.envato_url.as_deref(),
            Some("https://elements.envato.com/matech-modern-techno-monospace")
        );

        assert!(parse_envato_slug("Inter-4.0.zip").is_none());
        assert!(parse_envato_slug("foo-2024-06-07.zip").is_none());
    }

    #[test]
    fn test_parse_envato_slug_case_insensitive() {
        let info = parse_envato_slug("foo-bar-2023-01-02-03-04-05-UTC.zip").unwrap();
        assert_eq!(info.slug, "foo-bar");
    }

    #[test]
    fn test_extract_fonts_filters_members() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("foo-2024-06-07-19-45-05-utc.zip");
        write_zip(
            &zip_path,
            &[
                ("Foo/", b""),
                ("Foo/Foo-Regular.ttf", b"ttf"),
                ("Foo/otf/Foo-Bold.OTF", b"otf"),
                ("Foo/._Foo-Regular.ttf", b"junk"),
                ("__MACOSX/Foo/Foo-Regular.ttf", b"junk"),
                ("Foo/README.txt", b"readme"),
            ],
        );
        let dest = dir.path().join("ttf");
        fs::create_dir_all(&dest).unwrap();

        let mut provenance = ProvenanceMap::new();
        let extracted = extract_fonts(&zip_path, &dest, &mut provenance).unwrap();

        assert_eq!(extracted.len(), 2);
        assert_eq!(fs::read(dest.join("Foo-Regular.ttf")).unwrap(), b"ttf");
        assert!(dest.join("Foo-Bold.OTF").exists());
        assert!(!dest.join("README.txt").exists());
        assert_eq!(provenance["Foo-Regular.ttf"].slug, "foo");
        // Keys always use the .ttf spelling, whatever the member was called
        assert_eq!(provenance["Foo-Bold.ttf"].slug, "foo");
        assert_eq!(provenance.len(), 2);
    }

    #[test]
    fn test_import_directory_moves_processed() {
        let dir = tempdir().unwrap();
        let downloads = dir.path().join("downloads");
        fs::create_dir_all(downloads.join(PROCESSED_DIR)).unwrap();
        write_zip(&downloads.join("a.zip"), &[("A-Regular.ttf", b"a")]);
        write_zip(&downloads.join("b.zip"), &[("B-Regular.ttf", b"b")]);
        // Already processed archives are left alone
        write_zip(
            &downloads.join(PROCESSED_DIR).join("old.zip"),
            &[("Old-Regular.ttf", b"o")],
        );

        let dest = dir.path().join("ttf");
        let mut provenance = ProvenanceMap::new();
        let count = import_archives(
            &[downloads.clone(), dir.path().join("missing.zip")],
            &dest,
            &mut provenance,
        )
        .unwrap();

        assert_eq!(count, 2);
        assert!(dest.join("A-Regular.ttf").exists());
        assert!(!dest.join("Old-Regular.ttf").exists());
        assert!(!downloads.join("a.zip").exists());
        assert!(downloads.join(PROCESSED_DIR).join("a.zip").exists());
        assert!(downloads.join(PROCESSED_DIR).join("b.zip").exists());
        assert!(provenance.is_empty());
    }

    #[test]
    fn test_import_single_file_stays_put() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("single.zip");
        write_zip(&zip_path, &[("S-Regular.ttf", b"s")]);

        let dest = dir.path().join("ttf");
        let mut provenance = ProvenanceMap::new();
        let count = import_archives(&[zip_path.clone()], &dest, &mut provenance).unwrap();

        assert_eq!(count, 1);
        assert!(zip_path.exists());
    }
}
