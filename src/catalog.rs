// this_file: fontman/src/catalog.rs
//
// Enrichment from the Google Fonts catalog

use crate::{
    manifest::{Category, Family},
    FontmanError, Result,
};
use log::info;
use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "GOOGLE_FONTS_API_KEY";

const CATALOG_URL: &str = "https://www.googleapis.com/webfonts/v1/webfonts";
const SPECIMEN_URL: &str = "https://fonts.google.com/specimen";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One family as listed by the catalog
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogEntry {
    pub family: String,
    pub category: String,
    pub subsets: Vec<String>,
    pub variants: Vec<String>,
    pub version: Option<String>,
    pub last_modified: Option<String>,
}

impl CatalogEntry {
    /// Public specimen page of the family
    pub fn specimen_url(&self) -> String {
        format!("{}/{}", SPECIMEN_URL, self.family.replace(' ', "+"))
    }
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    items: Vec<CatalogEntry>,
}

/// Catalog families indexed by lowercase name
#[derive(Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.family.to_lowercase(), entry))
            .collect();
        Self { entries }
    }

    /// Download the full catalog
    pub fn fetch(api_key: Option<&str>) -> Result<Self> {
        let api_key = api_key.filter(|key| !key.is_empty()).ok_or_else(|| {
            FontmanError::Config(format!(
                "{} environment variable not set. Get an API key at \
                 https://developers.google.com/fonts/docs/developer_api",
                API_KEY_VAR
            ))
        })?;

        info!("Fetching Google Fonts metadata...");
        let response: CatalogResponse = ureq::get(CATALOG_URL)
            .query("key", api_key)
            .query("sort", "alpha")
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(|e| FontmanError::Catalog(e.to_string()))?
            .into_json()?;

        let catalog = Self::from_entries(response.items);
        info!("  Loaded {} font families from Google Fonts", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive exact lookup
    pub fn lookup(&self, family: &str) -> Option<&CatalogEntry> {
        self.entries.get(&family.to_lowercase())
    }

    /// Enrich families found in the catalog. Returns how many matched.
    ///
    /// A locally computed category is only replaced when it is the default
    /// `sans-serif` and the catalog knows better.
    pub fn enrich(&self, families: &mut BTreeMap<String, Family>) -> usize {
        let mut enriched = 0;

        for (name, family) in families.iter_mut() {
            let Some(entry) = self.lookup(name) else {
                info!("  · {}: not in Google Fonts", name);
                continue;
            };

            family.google_fonts = Some(true);
            family.source = Some(entry.specimen_url());

            if family.category == Category::SansSerif {
                if let Some(category) = Category::parse(&entry.category) {
                    if category != Category::SansSerif {
                        family.category = category;
                    }
                }
            }

            if !entry.subsets.is_empty() {
                family.subsets = Some(Value::from(entry.subsets.clone()));
            }

            enriched += 1;
            info!("  ✓ {}: matched Google Fonts", name);
        }

        enriched
    }
}
