//! Label catalog: localized UI text keyed by label name.
//!
//! The catalog is loaded once per process. Lookups never fail: a key with no
//! entry resolves to itself, so a component keeps rendering when a label is
//! missing from the catalog.


use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::LabelsConfig;
use crate::error::NppatchError;

/// Label shown as the header of save failures.
pub const COMMON_UNKNOWN_ERROR: &str = "commonUnknownError";

/// Bundled labels, embedded at compile time.
const BUNDLED_LABELS_TOML: &str = include_str!("../../labels/LABELS.toml");

/// Process-wide catalog. Set at most once.
static CATALOG: OnceCell<LabelCatalog> = OnceCell::new();

/// TOML structure for a label file.
#[derive(Deserialize)]
struct LabelFile {
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

/// Immutable key → text mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCatalog {
    entries: BTreeMap<String, String>,
}

impl LabelCatalog {
    /// Parse a TOML document with a `[labels]` table.
    pub fn from_toml(content: &str) -> Result<Self, NppatchError> {
        let file: LabelFile = toml::from_str(content)
            .map_err(|e| NppatchError::Labels(format!("failed to parse labels: {e}")))?;
        Ok(Self {
            entries: file.labels,
        })
    }

    /// The catalog shipped with the binary.
    pub fn bundled() -> Self {
        match Self::from_toml(BUNDLED_LABELS_TOML) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("labels: bundled catalog is unusable: {e}");
                Self::default()
            }
        }
    }

    /// Load a label file. Read and parse failures are errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NppatchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NppatchError::Labels(format!("failed to read {}: {e}", path.display()))
        })?;
        let catalog = Self::from_toml(&content)?;
        info!("loaded {} labels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Bundled labels overlaid by the configured override file.
    ///
    /// A missing or broken override is logged and skipped.
    pub fn from_config(cfg: &LabelsConfig) -> Self {
        let mut catalog = Self::bundled();
        let Some(path) = cfg.override_path() else {
            return catalog;
        };
        match Self::load(&path) {
            Ok(overrides) => catalog.merge(overrides),
            Err(e) => warn!("labels: ignoring override {path}: {e}"),
        }
        catalog
    }

    /// Copy every entry of `other` into this catalog, replacing existing keys.
    pub fn merge(&mut self, other: LabelCatalog) {
        self.entries.extend(other.entries);
    }

    /// Return the text for `key`, or `key` itself when there is no entry.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        match self.entries.get(key) {
            Some(value) => value.as_str(),
            None => {
                debug!("labels: no entry for {key}, passing key through");
                key
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Sorted `(key, text)` pairs whose key starts with `prefix`.
    pub fn entries_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelCatalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Install the process-wide catalog. Fails if one is already in place.
pub fn install(catalog: LabelCatalog) -> Result<(), NppatchError> {
    let count = catalog.len();
    CATALOG
        .set(catalog)
        .map_err(|_| NppatchError::Labels("label catalog already installed".into()))?;
    info!("labels: installed catalog with {count} entries");
    Ok(())
}

/// The process-wide catalog, falling back to the bundled labels when
/// nothing was installed before first use.
pub fn catalog() -> &'static LabelCatalog {
    CATALOG.get_or_init(LabelCatalog::bundled)
}

/// Resolve `key` against the process-wide catalog.
pub fn resolve(key: &str) -> &str {
    catalog().resolve(key)
}
