//! Display-version derivation for release titles
//!
//! Release pipelines hand us a short version that is either a plain
//! "2.7.12" style string, a "dev-<hash>" development build marker, or
//! something free-form. The display version shown by the flasher frontend
//! is derived from it, optionally suffixed with a configured tag.

/// Derive the display version for a release.
///
/// An explicit override is used verbatim. Otherwise the short version is
/// reduced to its dotted three-part numeric prefix if it has one; a
/// "dev-<hash>" short version becomes "{base}-dev-{hash[..7]}" when a base
/// version is known; anything else is kept verbatim. The configured prefix
/// tag is appended to derived results, never to an explicit override.
pub fn display_version(
    short_version: &str,
    base_version: Option<&str>,
    explicit: Option<&str>,
    prefix_tag: Option<&str>,
) -> String {
    if let Some(v) = explicit {
        return v.to_string();
    }

    let base = if let Some(prefix) = numeric_prefix(short_version) {
        prefix.to_string()
    } else if let Some(hash) = short_version.strip_prefix("dev-") {
        match base_version {
            Some(base) => {
                let short_hash = if hash.len() > 7 { &hash[..7] } else { hash };
                format!("{}-dev-{}", base, short_hash)
            }
            None => short_version.to_string(),
        }
    } else {
        short_version.to_string()
    };

    match prefix_tag {
        Some(tag) if !tag.is_empty() => format!("{}-{}", base, tag),
        _ => base,
    }
}

/// Leading "X.Y.Z" numeric prefix of a version string, if present.
pub fn numeric_prefix(version: &str) -> Option<&str> {
    let mut consumed = 0;
    for (i, part) in version.split('.').enumerate() {
        let digits = part.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        if i == 2 {
            return Some(&version[..consumed + digits]);
        }
        if digits != part.len() {
            // non-digit inside an early component ends the prefix
            return None;
        }
        consumed += digits + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("2.7.12"), Some("2.7.12"));
        assert_eq!(numeric_prefix("2.7.12.abcdef"), Some("2.7.12"));
        assert_eq!(numeric_prefix("2.7.12-rc1"), Some("2.7.12"));
        assert_eq!(numeric_prefix("2.7"), None);
        assert_eq!(numeric_prefix("dev-abc1234"), None);
        assert_eq!(numeric_prefix("v2.7.12"), None);
    }

    #[test]
    fn test_three_part_version() {
        assert_eq!(display_version("2.7.12", None, None, None), "2.7.12");
        assert_eq!(display_version("2.7.12.f00dcafe", None, None, None), "2.7.12");
    }

    #[test]
    fn test_prefix_tag_appended() {
        assert_eq!(display_version("2.7.12", None, None, Some("MH")), "2.7.12-MH");
    }

    #[test]
    fn test_dev_build_with_base_version() {
        assert_eq!(
            display_version("dev-abc1234def", Some("2.7.12"), None, None),
            "2.7.12-dev-abc1234"
        );
    }

    #[test]
    fn test_dev_build_without_base_version_kept_verbatim() {
        assert_eq!(display_version("dev-abc1234", None, None, None), "dev-abc1234");
    }

    #[test]
    fn test_freeform_kept_verbatim() {
        assert_eq!(display_version("nightly", None, None, None), "nightly");
        assert_eq!(display_version("nightly", None, None, Some("MH")), "nightly-MH");
    }

    #[test]
    fn test_explicit_override_wins() {
        assert_eq!(
            display_version("2.7.12", None, Some("Sommer-Edition"), Some("MH")),
            "Sommer-Edition"
        );
    }
}
