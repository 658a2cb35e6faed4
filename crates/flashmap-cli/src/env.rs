//! Environment-sourced configuration
//!
//! Captured once at startup so the core logic takes configuration as an
//! explicit value and never reads the environment itself.

/// Deployment-specific overrides taken from the environment.
#[derive(Debug, Clone)]
pub struct EnvOverrides {
    /// FLASHER_FIRMWARE_NAME - firmware display name for titles and notes
    pub firmware_name: String,
    /// FLASHER_ORG - organization named in the release notes
    pub organization: String,
    /// FLASHER_BASE_URL - backend origin the firmware tree is served under
    pub backend_base_url: String,
    /// FLASHER_VERSION_PREFIX - tag suffixed to derived display versions
    pub version_prefix: Option<String>,
}

impl EnvOverrides {
    pub fn capture() -> Self {
        Self {
            firmware_name: var_or("FLASHER_FIRMWARE_NAME", "Mesh Hessen Firmware"),
            organization: var_or("FLASHER_ORG", "Mesh Hessen"),
            backend_base_url: var_or(
                "FLASHER_BASE_URL",
                "https://flasher.schwarzes-seelenreich.de/backend",
            ),
            version_prefix: std::env::var("FLASHER_VERSION_PREFIX")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
