//! Static board lookup tables
//!
//! Maps PlatformIO build-target names to hardware slugs, and hardware slugs
//! to product display names. Unknown boards fall back to their own
//! uppercased form; unknown slugs display as themselves.

/// PlatformIO build target -> hardware slug
const BOARD_SLUGS: &[(&str, &str)] = &[
    ("heltec-v3", "HELTEC_V3"),
    ("heltec-wireless-tracker-V1-0", "HELTEC_TRACKER"),
    ("tbeam", "TBEAM"),
    ("tlora-v2", "TLORA_V2"),
    ("tlora-v1", "TLORA_V1"),
    ("tlora-v1_3", "TLORA_V1_3"),
    ("techo", "TECHO"),
];

/// Hardware slug -> product display name
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("HELTEC_V3", "Heltec V3"),
    ("HELTEC_TRACKER", "Heltec Wireless Tracker V1.0"),
    ("TBEAM", "TTGO T-Beam"),
    ("TLORA_V2", "TTGO LoRa V2"),
    ("TLORA_V1", "TTGO LoRa V1"),
    ("TLORA_V1_3", "TTGO LoRa V1.3"),
    ("TECHO", "T-Echo"),
];

/// Resolve the hardware slug for a build target name
pub fn hardware_slug(board: &str) -> String {
    BOARD_SLUGS
        .iter()
        .find(|(b, _)| *b == board)
        .map(|(_, slug)| (*slug).to_string())
        .unwrap_or_else(|| board.to_uppercase())
}

/// Resolve the display name for a hardware slug
pub fn display_name(slug: &str) -> String {
    DISPLAY_NAMES
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_board() {
        assert_eq!(hardware_slug("heltec-v3"), "HELTEC_V3");
        assert_eq!(display_name("HELTEC_V3"), "Heltec V3");
    }

    #[test]
    fn test_unknown_board_uppercases() {
        assert_eq!(hardware_slug("rak4631"), "RAK4631");
        assert_eq!(hardware_slug("nano-g1"), "NANO-G1");
    }

    #[test]
    fn test_unknown_slug_displays_as_itself() {
        assert_eq!(display_name("RAK4631"), "RAK4631");
    }
}
