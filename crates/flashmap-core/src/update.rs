//! Mapping updater
//!
//! Runs at release time: resolves each build target to its hardware slug,
//! discovers the binaries produced for it, and prepends a catalog entry to
//! the device's version history. Boards that produced no binaries are
//! skipped with a warning; a version already present for a device is a
//! no-op, which makes a rerun with identical arguments idempotent.

use chrono::DateTime;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::artifacts::discover_bin_urls;
use crate::boards;
use crate::catalog::{Catalog, CatalogError, FirmwareEntry};
use crate::version::display_version;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Run configuration for the updater, captured once by the caller.
///
/// The environment is read by the CLI, never here; this keeps the update
/// logic testable with plain values.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Path to the persisted device firmware mapping
    pub mapping_path: PathBuf,
    /// Directory containing the release binaries
    pub firmware_dir: PathBuf,
    /// Backend origin under which the firmware tree is served
    pub backend_base_url: String,
    /// Firmware display name used in titles and release notes
    pub firmware_name: String,
    /// Organization named in the release notes
    pub organization: String,
    /// Optional tag suffixed to derived display versions
    pub version_prefix: Option<String>,
    /// Maximum versions kept per device
    pub max_versions: usize,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            mapping_path: PathBuf::from("data/device-firmware-mapping.json"),
            firmware_dir: PathBuf::from("firmware"),
            backend_base_url: "https://flasher.schwarzes-seelenreich.de/backend".to_string(),
            firmware_name: "Mesh Hessen Firmware".to_string(),
            organization: "Mesh Hessen".to_string(),
            version_prefix: None,
            max_versions: 10,
        }
    }
}

/// Per-release inputs to an update run.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Full version string, used as the entry id
    pub version: String,
    /// Short version the display title is derived from
    pub short_version: String,
    /// Build date (ISO 8601)
    pub build_date: String,
    /// Whitespace-separated build target names
    pub boards: String,
    /// Release page URL
    pub release_url: String,
    /// Base version for dev-build display titles
    pub base_version: Option<String>,
    /// Explicit display version, overrides derivation
    pub display_version: Option<String>,
}

/// Outcome of an update run.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Hardware slugs that received a new entry
    pub updated_devices: Vec<String>,
    /// Boards skipped because no binaries were found
    pub warnings: Vec<String>,
}

/// Apply one release to the catalog.
///
/// The catalog file is rewritten only when at least one device received a
/// new entry; otherwise it is left untouched.
pub fn update(options: &UpdateOptions, request: &UpdateRequest) -> Result<UpdateReport, UpdateError> {
    let mut catalog = Catalog::load_or_default(&options.mapping_path)?;
    let mut report = UpdateReport::default();

    for board in request.boards.split_whitespace() {
        let slug = boards::hardware_slug(board);
        let name = boards::display_name(&slug);
        debug!(board = %board, slug = %slug, name = %name, "Processing board");

        if catalog.contains_version(&slug, &request.version) {
            debug!(
                slug = %slug,
                version = %request.version,
                "Version already present, skipping"
            );
            continue;
        }

        let bin_urls = discover_bin_urls(
            &options.firmware_dir,
            &options.backend_base_url,
            board,
            &request.version,
        );
        if bin_urls.is_empty() {
            warn!(
                board = %board,
                version = %request.version,
                "No firmware binaries found, board skipped"
            );
            report.warnings.push(format!(
                "no firmware binaries found for {} {}",
                board, request.version
            ));
            continue;
        }

        let display_version = display_version(
            &request.short_version,
            request.base_version.as_deref(),
            request.display_version.as_deref(),
            options.version_prefix.as_deref(),
        );

        let file_count = bin_urls.len();
        let entry = FirmwareEntry {
            id: request.version.clone(),
            title: format!("{} {} für {}", options.firmware_name, display_version, name),
            page_url: request.release_url.clone(),
            created_at: request.build_date.clone(),
            release_notes: Some(release_notes(options, &display_version, &request.build_date, &name)),
            bin_urls,
        };

        catalog.insert(&slug, entry, options.max_versions);
        info!(slug = %slug, files = file_count, "Added firmware entry");
        report.updated_devices.push(slug);
    }

    if report.updated_devices.is_empty() {
        info!("No devices updated, mapping file left untouched");
        return Ok(report);
    }

    catalog.save(&options.mapping_path)?;
    info!(
        devices = report.updated_devices.len(),
        path = %options.mapping_path.display(),
        "Mapping saved"
    );

    for (slug, entries) in &catalog.devices {
        let latest = entries.first().map(|e| e.id.as_str()).unwrap_or("none");
        info!(device = %slug, versions = entries.len(), latest = %latest, "Catalog state");
    }

    Ok(report)
}

/// Generated release notes shown by the flasher frontend.
fn release_notes(
    options: &UpdateOptions,
    display_version: &str,
    build_date: &str,
    display_name: &str,
) -> String {
    let site = options
        .backend_base_url
        .trim_end_matches('/')
        .trim_end_matches("/backend");
    format!(
        "{} {} für {}\n\nBuild vom {}.\n\nAngepasste Meshtastic-Firmware, bereitgestellt von {}. \
         Flashen direkt im Browser unter {}, Details und Changelog auf der Release-Seite.",
        options.firmware_name,
        display_version,
        display_name,
        build_day(build_date),
        options.organization,
        site
    )
}

/// Date portion of an ISO 8601 build timestamp.
fn build_day(build_date: &str) -> String {
    DateTime::parse_from_rfc3339(build_date)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| {
            build_date
                .split('T')
                .next()
                .unwrap_or(build_date)
                .to_string()
        })
}
