// this_file: fontman/src/cli.rs
//
// Command-line interface for fontman

use crate::{
    catalog::API_KEY_VAR,
    pipeline::{run, GenerateOptions},
    Result,
};
use clap::Parser;
use log::debug;
use std::{env, path::PathBuf};

/// Command-line arguments for fontman
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Generate a font manifest and @font-face stylesheet",
    long_about = "fontman scans the ttf/ directory of a font package, groups the fonts into \
                  families and variants, and writes fonts.json and css/fonts.css. The manifest \
                  is merged, not overwritten: human-added fields like 'description', \
                  'pairings' and custom 'tags' are preserved across regenerations."
)]
pub struct Cli {
    /// Font package directory
    #[arg(
        default_value = ".",
        help = "Font package directory",
        long_help = "Directory holding ttf/, woff2/, css/ and fonts.json. \
                    Missing subdirectories are created."
    )]
    pub root: PathBuf,

    /// Convert TTF files to WOFF2
    #[arg(
        long,
        help = "Convert TTF files to WOFF2 format",
        long_help = "Write woff2/<name>.woff2 for every font in ttf/ that has none yet. \
                    Existing WOFF2 files are left untouched."
    )]
    pub convert_woff2: bool,

    /// ZIP archives to import fonts from
    #[arg(
        long,
        num_args = 1..,
        value_name = "PATH",
        help = "Import fonts from ZIP file(s) or directory containing ZIPs",
        long_help = "Extract .ttf and .otf files from ZIP archives into ttf/. \
                    When a directory is given, its ZIP files are imported and then moved \
                    into a processed/ subdirectory. Envato Elements downloads are recorded \
                    as the source of the fonts they contain."
    )]
    pub import_zip: Vec<PathBuf>,

    /// Install fonts for the current user
    #[arg(
        long,
        help = "Install TTF fonts to system font directory",
        long_help = "Copy fonts from ttf/ into the per-user font directory of this OS, \
                    skipping fonts that are already installed."
    )]
    pub install_local: bool,

    /// Enrich the manifest from Google Fonts
    #[arg(
        long,
        help = "Enrich manifest with Google Fonts API metadata (requires GOOGLE_FONTS_API_KEY)",
        long_help = "Look up every family in the Google Fonts catalog and record its \
                    specimen URL, subsets and, where ours is the default, its category. \
                    The API key is read from GOOGLE_FONTS_API_KEY, which may also be set \
                    in a .env file in the font package directory."
    )]
    pub lookup_metadata: bool,

    /// Enable verbose output
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the arguments and environment into run options
    pub fn to_options(&self) -> GenerateOptions {
        let env_file = self.root.join(".env");
        if env_file.exists() {
            if let Err(e) = dotenvy::from_path(&env_file) {
                debug!("Ignoring {}: {}", env_file.display(), e);
            }
        }

        GenerateOptions {
            root: self.root.clone(),
            convert_woff2: self.convert_woff2,
            import_zip: self.import_zip.clone(),
            install_local: self.install_local,
            lookup_metadata: self.lookup_metadata,
            api_key: env::var(API_KEY_VAR).ok(),
        }
    }
}

/// Execute the command
pub fn execute(cli: Cli) -> Result<()> {
    let options = cli.to_options();
    run(&options)?;
    Ok(())
}
