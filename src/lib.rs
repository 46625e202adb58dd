// Main library entry point for fontman
use thiserror::Error;

/// Error type for fontman
#[derive(Error, Debug)]
pub enum FontmanError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// Font parsing errors
    #[error("Font error: {0}")]
    Font(String),

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// ZIP archive errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Remote catalog errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for fontman
pub type Result<T> = std::result::Result<T, FontmanError>;

mod archive;
mod catalog;
pub mod classify;
pub mod cli;
mod css;
mod font;
pub mod group;
mod install;
pub mod manifest;
pub mod merge;
pub mod naming;
pub mod pipeline;
mod utils;
mod woff2;

#[cfg(test)]
mod testfont;

pub use archive::parse_envato_slug;
pub use catalog::{Catalog, CatalogEntry};
pub use css::generate_css;
pub use font::{FontFile, FontFormat};
pub use manifest::{Category, Family, Manifest, Provenance, Style, Variant};
pub use pipeline::{run, GenerateOptions, Summary};
pub use utils::FontDirs;
pub use woff2::compress_sfnt;

// Implement From for common error types
impl From<std::io::Error> for FontmanError {
    fn from(err: std::io::Error) -> Self {
        FontmanError::Io(format!("{:?}: {}", err.kind(), err))
    }
}

impl From<zip::result::ZipError> for FontmanError {
    fn from(err: zip::result::ZipError) -> Self {
        FontmanError::Archive(err.to_string())
    }
}
