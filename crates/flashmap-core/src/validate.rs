//! Catalog validator
//!
//! Pre-deploy check over the persisted mapping and the firmware tree:
//! every referenced binary must exist on disk with a plausible size, and
//! on-disk binaries not referenced by any entry are reported as orphans.
//! Diagnostics are accumulated over the whole catalog; only a missing or
//! unparseable mapping file aborts the run.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::artifacts::url_to_local_path;
use crate::catalog::{Catalog, CatalogError};

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("Mapping file not found: {0}")]
    MissingMapping(PathBuf),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Firmware images below this size draw a warning
const MIN_PLAUSIBLE_SIZE: u64 = 1024;

/// Outcome of a validation run.
#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    /// Number of devices in the catalog
    pub devices: usize,
    /// Total version entries across all devices
    pub total_versions: usize,
    /// Artifacts that passed all checks
    pub validated: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// On-disk binaries not referenced by any entry (informational)
    pub orphans: Vec<PathBuf>,
}

impl ValidationReport {
    /// Validation passes iff no errors were recorded; warnings don't fail it
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate the mapping against the firmware files on disk.
///
/// Local paths are derived from download URLs by stripping `backend_prefix`
/// from the URL path and resolving against the parent of `firmware_dir`,
/// mirroring how the backend serves the deploy root.
pub fn validate(
    mapping_path: &Path,
    firmware_dir: &Path,
    backend_prefix: &str,
) -> Result<ValidationReport, ValidateError> {
    if !mapping_path.exists() {
        return Err(ValidateError::MissingMapping(mapping_path.to_path_buf()));
    }
    let catalog = Catalog::from_file(mapping_path)?;
    info!(devices = catalog.devices.len(), "Mapping loaded");

    let deploy_root = firmware_dir.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut report = ValidationReport {
        devices: catalog.devices.len(),
        ..ValidationReport::default()
    };
    let mut referenced: BTreeSet<PathBuf> = BTreeSet::new();

    for (device, entries) in &catalog.devices {
        debug!(device = %device, versions = entries.len(), "Validating device");
        report.total_versions += entries.len();

        for entry in entries {
            if entry.bin_urls.is_empty() {
                report
                    .warnings
                    .push(format!("{} {}: no binary URLs", device, entry.id));
                continue;
            }

            for (kind, url) in &entry.bin_urls {
                let local = match url_to_local_path(url, backend_prefix) {
                    Ok(path) => deploy_root.join(path),
                    Err(e) => {
                        report
                            .errors
                            .push(format!("{} {} {}: {}", device, entry.id, kind, e));
                        continue;
                    }
                };
                referenced.insert(local.clone());

                match fs::metadata(&local) {
                    Err(_) => report.errors.push(format!(
                        "{} {} {}: file not found: {}",
                        device,
                        entry.id,
                        kind,
                        local.display()
                    )),
                    Ok(meta) if !meta.is_file() => report.errors.push(format!(
                        "{} {} {}: not a regular file: {}",
                        device,
                        entry.id,
                        kind,
                        local.display()
                    )),
                    Ok(meta) if meta.len() == 0 => report.errors.push(format!(
                        "{} {} {}: file is empty: {}",
                        device,
                        entry.id,
                        kind,
                        local.display()
                    )),
                    Ok(meta) if meta.len() < MIN_PLAUSIBLE_SIZE => report.warnings.push(format!(
                        "{} {} {}: file suspiciously small ({} bytes): {}",
                        device,
                        entry.id,
                        kind,
                        meta.len(),
                        local.display()
                    )),
                    Ok(_) => report.validated += 1,
                }
            }
        }
    }

    report.orphans = find_orphans(firmware_dir, &referenced);

    info!(
        devices = report.devices,
        versions = report.total_versions,
        validated = report.validated,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        orphans = report.orphans.len(),
        "Validation finished"
    );

    Ok(report)
}

/// Walk the firmware tree for `.bin`/`.uf2` files not referenced by the catalog
fn find_orphans(firmware_dir: &Path, referenced: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    let mut orphans = Vec::new();
    if !firmware_dir.is_dir() {
        return orphans;
    }

    let mut stack = vec![firmware_dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("bin" | "uf2")
            ) && !referenced.contains(&path)
            {
                orphans.push(path);
            }
        }
    }

    orphans.sort();
    orphans
}
