//! flashmap - Firmware release catalog maintenance
//!
//! Two subcommands around the persisted device firmware mapping: `update`
//! adds a released version for a set of boards, `validate` checks the
//! mapping against the firmware files on disk before deployment.

mod env;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use flashmap_core::{update, validate, UpdateOptions, UpdateRequest};

#[derive(Parser, Debug)]
#[command(name = "flashmap")]
#[command(about = "Firmware release catalog maintenance for the flasher backend")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a released firmware version to the device mapping
    Update {
        /// Full version string
        #[arg(long)]
        version: String,

        /// Short version the display title is derived from
        #[arg(long)]
        short_version: String,

        /// Build date (ISO 8601)
        #[arg(long)]
        build_date: String,

        /// Space-separated build target names
        #[arg(long)]
        boards: String,

        /// Release page URL
        #[arg(long)]
        release_url: String,

        /// Base version for dev-build display titles
        #[arg(long)]
        base_version: Option<String>,

        /// Explicit display version, overrides derivation
        #[arg(long)]
        display_version: Option<String>,

        /// Path to the device firmware mapping
        #[arg(long, default_value = "data/device-firmware-mapping.json")]
        mapping_file: PathBuf,

        /// Maximum versions kept per device
        #[arg(long, default_value_t = 10)]
        max_versions: usize,

        /// Directory containing the release binaries
        #[arg(long, default_value = "firmware")]
        firmware_dir: PathBuf,
    },
    /// Validate the mapping against the firmware files on disk
    Validate {
        /// Path to the device firmware mapping
        #[arg(long, default_value = "data/device-firmware-mapping.json")]
        mapping_file: PathBuf,

        /// Directory containing the release binaries
        #[arg(long, default_value = "firmware")]
        firmware_dir: PathBuf,

        /// URL path prefix stripped when mapping download URLs to local files
        #[arg(long, default_value = "/backend")]
        backend_prefix: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Update {
            version,
            short_version,
            build_date,
            boards,
            release_url,
            base_version,
            display_version,
            mapping_file,
            max_versions,
            firmware_dir,
        } => {
            let overrides = env::EnvOverrides::capture();
            let options = UpdateOptions {
                mapping_path: mapping_file,
                firmware_dir,
                backend_base_url: overrides.backend_base_url,
                firmware_name: overrides.firmware_name,
                organization: overrides.organization,
                version_prefix: overrides.version_prefix,
                max_versions,
            };
            let request = UpdateRequest {
                version,
                short_version,
                build_date,
                boards,
                release_url,
                base_version,
                display_version,
            };

            info!(version = %request.version, "Updating firmware mapping");
            let report = update(&options, &request).context("Update run failed")?;

            for warning in &report.warnings {
                warn!("{}", warning);
            }
            if report.updated_devices.is_empty() {
                println!("No devices updated");
            } else {
                println!("Updated devices: {}", report.updated_devices.join(", "));
            }
        }
        Command::Validate {
            mapping_file,
            firmware_dir,
            backend_prefix,
        } => {
            let report = validate(&mapping_file, &firmware_dir, &backend_prefix)
                .context("Validation could not run")?;

            println!("Devices:        {}", report.devices);
            println!("Total versions: {}", report.total_versions);
            println!("Validated:      {}", report.validated);
            println!("Errors:         {}", report.errors.len());
            println!("Warnings:       {}", report.warnings.len());

            if !report.errors.is_empty() {
                println!("\nErrors:");
                for error in &report.errors {
                    println!("  {}", error);
                }
            }
            if !report.warnings.is_empty() {
                println!("\nWarnings:");
                for warning in &report.warnings {
                    println!("  {}", warning);
                }
            }
            if !report.orphans.is_empty() {
                println!("\nOrphaned files (not referenced by the mapping):");
                for orphan in &report.orphans {
                    println!("  {}", orphan.display());
                }
            }

            if report.passed() {
                println!("\nValidation passed");
            } else {
                println!("\nValidation failed");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
