//! Firmware artifact discovery and URL mapping
//!
//! Release binaries live under `{firmware_dir}/{board}/{version}/` with
//! filenames `firmware-{board}-{version}[-{kind}].bin` plus optional
//! `.uf2`/`.hex` siblings. Download URLs mirror that layout below the
//! backend origin, so a URL maps back to a local file by stripping the
//! backend path prefix.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PathError {
    #[error("URL has no path component: {0}")]
    NoPath(String),
    #[error("URL path is outside backend prefix {prefix}: {url}")]
    OutsideBackend { url: String, prefix: String },
}

/// Kind of downloadable artifact for a release.
///
/// `Factory` and `Update` double as the tags for the generic single-binary
/// fallback when no per-kind binaries were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Factory,
    Update,
    Ota,
    Uf2,
    Hex,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Factory => "factory",
            ArtifactKind::Update => "update",
            ArtifactKind::Ota => "ota",
            ArtifactKind::Uf2 => "uf2",
            ArtifactKind::Hex => "hex",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Probe the filesystem for the binaries produced for a board/version pair
/// and build their download URLs.
///
/// Per-kind `-factory`/`-update`/`-ota` binaries are preferred; when none
/// exist, a single generic `.bin` serves as both factory and update image.
/// `.uf2` and `.hex` siblings are included whenever present.
pub fn discover_bin_urls(
    firmware_dir: &Path,
    backend_base_url: &str,
    board: &str,
    version: &str,
) -> BTreeMap<ArtifactKind, String> {
    let release_dir = firmware_dir.join(board).join(version);
    let base = backend_base_url.trim_end_matches('/');
    let url_for =
        |filename: &str| format!("{}/firmware/{}/{}/{}", base, board, version, filename);

    let mut urls = BTreeMap::new();

    for kind in [ArtifactKind::Factory, ArtifactKind::Update, ArtifactKind::Ota] {
        let filename = format!("firmware-{}-{}-{}.bin", board, version, kind);
        if release_dir.join(&filename).is_file() {
            urls.insert(kind, url_for(&filename));
        }
    }

    if urls.is_empty() {
        let generic = format!("firmware-{}-{}.bin", board, version);
        if release_dir.join(&generic).is_file() {
            urls.insert(ArtifactKind::Factory, url_for(&generic));
            urls.insert(ArtifactKind::Update, url_for(&generic));
        }
    }

    for (kind, ext) in [(ArtifactKind::Uf2, "uf2"), (ArtifactKind::Hex, "hex")] {
        let filename = format!("firmware-{}-{}.{}", board, version, ext);
        if release_dir.join(&filename).is_file() {
            urls.insert(kind, url_for(&filename));
        }
    }

    urls
}

/// Map a download URL back to the local file path it was built from.
///
/// The URL's path component must start with the backend prefix (the path
/// under which the deploy root is served); everything after it is the
/// path relative to that root. A URL outside the prefix is an error rather
/// than being sliced permissively.
pub fn url_to_local_path(url: &str, backend_prefix: &str) -> Result<PathBuf, PathError> {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path = match after_scheme.find('/') {
        Some(idx) => &after_scheme[idx..],
        None => return Err(PathError::NoPath(url.to_string())),
    };

    let prefix = format!("{}/", backend_prefix.trim_end_matches('/'));
    match path.strip_prefix(&prefix) {
        Some(rest) if !rest.is_empty() => Ok(PathBuf::from(rest)),
        _ => Err(PathError::OutsideBackend {
            url: url.to_string(),
            prefix: backend_prefix.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BASE: &str = "https://flasher.example.org/backend";

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_discover_per_kind_binaries() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("tbeam/1.2.3");
        touch(&dir.join("firmware-tbeam-1.2.3-factory.bin"));
        touch(&dir.join("firmware-tbeam-1.2.3-ota.bin"));

        let urls = discover_bin_urls(tmp.path(), BASE, "tbeam", "1.2.3");
        assert_eq!(urls.len(), 2);
        assert_eq!(
            urls[&ArtifactKind::Factory],
            format!("{}/firmware/tbeam/1.2.3/firmware-tbeam-1.2.3-factory.bin", BASE)
        );
        assert!(urls.contains_key(&ArtifactKind::Ota));
        assert!(!urls.contains_key(&ArtifactKind::Update));
    }

    #[test]
    fn test_generic_binary_fallback() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("techo/1.2.3");
        touch(&dir.join("firmware-techo-1.2.3.bin"));

        let urls = discover_bin_urls(tmp.path(), BASE, "techo", "1.2.3");
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[&ArtifactKind::Factory], urls[&ArtifactKind::Update]);
    }

    #[test]
    fn test_uf2_sibling_included() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("techo/1.2.3");
        touch(&dir.join("firmware-techo-1.2.3-factory.bin"));
        touch(&dir.join("firmware-techo-1.2.3.uf2"));

        let urls = discover_bin_urls(tmp.path(), BASE, "techo", "1.2.3");
        assert!(urls.contains_key(&ArtifactKind::Factory));
        assert!(urls.contains_key(&ArtifactKind::Uf2));
    }

    #[test]
    fn test_nothing_discovered() {
        let tmp = TempDir::new().unwrap();
        let urls = discover_bin_urls(tmp.path(), BASE, "tbeam", "9.9.9");
        assert!(urls.is_empty());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ArtifactKind::Factory).unwrap(),
            "\"factory\""
        );
    }

    #[test]
    fn test_url_to_local_path() {
        let path = url_to_local_path(
            "https://flasher.example.org/backend/firmware/tbeam/1.2.3/firmware-tbeam-1.2.3.bin",
            "/backend",
        )
        .unwrap();
        assert_eq!(
            path,
            PathBuf::from("firmware/tbeam/1.2.3/firmware-tbeam-1.2.3.bin")
        );
    }

    #[test]
    fn test_url_outside_backend_prefix() {
        let err = url_to_local_path(
            "https://flasher.example.org/other/firmware/tbeam/1.2.3/x.bin",
            "/backend",
        )
        .unwrap_err();
        assert!(matches!(err, PathError::OutsideBackend { .. }));
    }

    #[test]
    fn test_url_without_path() {
        let err = url_to_local_path("https://flasher.example.org", "/backend").unwrap_err();
        assert!(matches!(err, PathError::NoPath(_)));
    }
}
