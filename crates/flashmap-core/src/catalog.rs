//! Device firmware catalog with JSON persistence
//!
//! The catalog maps hardware slugs to their firmware version history,
//! newest first. It is loaded whole into memory, mutated in place, and
//! written back as a full-file overwrite; there is no partial persistence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::artifacts::ArtifactKind;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in mapping file: {0}")]
    Json(#[from] serde_json::Error),
}

/// One published firmware release for a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwareEntry {
    /// Version identifier, unique within a device's history
    pub id: String,
    /// Title shown by the flasher frontend
    pub title: String,
    /// Release page URL
    pub page_url: String,
    /// Build timestamp (ISO 8601)
    pub created_at: String,
    /// Generated release notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
    /// Download URLs per artifact kind; never empty for persisted entries
    #[serde(default)]
    pub bin_urls: BTreeMap<ArtifactKind, String>,
}

/// The device -> version-history mapping, keyed by hardware slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub devices: BTreeMap<String, Vec<FirmwareEntry>>,
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&content)?;
        Ok(catalog)
    }

    /// Load a catalog, or start empty if the file doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the catalog pretty-printed, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check whether a device already has an entry for a version id
    pub fn contains_version(&self, slug: &str, id: &str) -> bool {
        self.devices
            .get(slug)
            .map(|entries| entries.iter().any(|e| e.id == id))
            .unwrap_or(false)
    }

    /// Prepend an entry to a device's history and cap the history length.
    /// Entries are kept newest first; entries beyond the cap are dropped.
    pub fn insert(&mut self, slug: &str, entry: FirmwareEntry, max_versions: usize) {
        let entries = self.devices.entry(slug.to_string()).or_default();
        entries.insert(0, entry);
        entries.truncate(max_versions);
    }

    /// The newest entry for a device, if any
    pub fn latest(&self, slug: &str) -> Option<&FirmwareEntry> {
        self.devices.get(slug).and_then(|entries| entries.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(id: &str) -> FirmwareEntry {
        FirmwareEntry {
            id: id.to_string(),
            title: format!("Test Firmware {} für T-Echo", id),
            page_url: "https://example.org/releases/1".to_string(),
            created_at: "2026-08-01T10:00:00Z".to_string(),
            release_notes: None,
            bin_urls: BTreeMap::from([(
                ArtifactKind::Factory,
                format!("https://example.org/backend/firmware/techo/{}/f.bin", id),
            )]),
        }
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::load_or_default(&tmp.path().join("missing.json")).unwrap();
        assert!(catalog.devices.is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Catalog::from_file(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/mapping.json");

        let mut catalog = Catalog::default();
        catalog.insert("TECHO", entry("1.0.0"), 10);
        catalog.save(&path).unwrap();

        let reloaded = Catalog::from_file(&path).unwrap();
        assert_eq!(reloaded.devices.len(), 1);
        assert_eq!(reloaded.latest("TECHO").unwrap().id, "1.0.0");
    }

    #[test]
    fn test_insert_is_newest_first_and_capped() {
        let mut catalog = Catalog::default();
        for id in ["1.0.0", "1.1.0", "1.2.0"] {
            catalog.insert("TBEAM", entry(id), 2);
        }

        let entries = &catalog.devices["TBEAM"];
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "1.2.0");
        assert_eq!(entries[1].id, "1.1.0");
    }

    #[test]
    fn test_contains_version() {
        let mut catalog = Catalog::default();
        catalog.insert("TBEAM", entry("1.0.0"), 10);
        assert!(catalog.contains_version("TBEAM", "1.0.0"));
        assert!(!catalog.contains_version("TBEAM", "2.0.0"));
        assert!(!catalog.contains_version("TECHO", "1.0.0"));
    }
}
