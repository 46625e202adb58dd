// this_file: fontman/src/install.rs
//
// Installation into the per-user font directory

use crate::{utils::system_font_dir, Result};
use log::{info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

/// Copy fonts into the user's font directory, refreshing the font cache on Linux
pub fn install_fonts(fonts: &[PathBuf]) -> Result<usize> {
    let font_dir = system_font_dir()?;
    info!("Installing to {}...", font_dir.display());
    let installed = install_into(fonts, &font_dir)?;

    if cfg!(target_os = "linux") && installed > 0 {
        refresh_font_cache();
    }

    Ok(installed)
}

/// Copy fonts into `font_dir`, skipping files already present there
pub fn install_into(fonts: &[PathBuf], font_dir: &Path) -> Result<usize> {
    fs::create_dir_all(font_dir)?;

    let mut installed = 0;
    for font in fonts {
        let Some(name) = font.file_name() else {
            continue;
        };
        let dest = font_dir.join(name);
        if dest.exists() {
            info!("  Skipped (exists): {}", name.to_string_lossy());
            continue;
        }
        fs::copy(font, &dest)?;
        info!("  Installed: {} -> {}", name.to_string_lossy(), dest.display());
        installed += 1;
    }

    Ok(installed)
}

fn refresh_font_cache() {
    info!("Refreshing font cache...");
    match Command::new("fc-cache").arg("-f").output() {
        Ok(output) if output.status.success() => info!("  Font cache updated"),
        Ok(output) => warn!("fc-cache exited with {}", output.status),
        Err(e) => warn!("Could not refresh font cache (fc-cache not found): {}", e),
    }
}
