//! Host capability checks
//!
//! Some host affordances only exist from a given editor version on. The host
//! version is passed in explicitly and compared here; the traversal itself
//! never looks at it.

use semver::Version;

use crate::error::{Error, Result};

/// First host version offering the keyboard shortcut API.
pub const KEYBOARD_SHORTCUT_SINCE: &str = "6.4.0";
/// First host version with the unified editor toolbar.
pub const UNIFIED_TOOLBAR_SINCE: &str = "6.6.0";

/// Capabilities derived from a host version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCapabilities {
    version: Version,
}

impl HostCapabilities {
    /// Parse a `major.minor` or `major.minor.patch` host version.
    pub fn from_version(version: &str) -> Result<Self> {
        let version = normalize_version(version).map_err(|reason| Error::Version {
            version: version.to_string(),
            reason,
        })?;
        Ok(Self { version })
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Check if the host is at least `version`.
    ///
    /// Returns `false` if `version` cannot be parsed.
    pub fn at_least(&self, version: &str) -> bool {
        normalize_version(version).is_ok_and(|v| self.version >= v)
    }

    pub fn supports_keyboard_shortcut(&self) -> bool {
        self.at_least(KEYBOARD_SHORTCUT_SINCE)
    }

    pub fn uses_unified_toolbar(&self) -> bool {
        self.at_least(UNIFIED_TOOLBAR_SINCE)
    }
}

/// Pad `major.minor` to `major.minor.0` and parse as semver.
fn normalize_version(version: &str) -> std::result::Result<Version, String> {
    let trimmed = version.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    let padded = match parts.len() {
        2 => format!("{trimmed}.0"),
        3 => trimmed.to_string(),
        _ => return Err("expected major.minor or major.minor.patch".to_string()),
    };
    Version::parse(&padded).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("6.3.2", false, false)]
    #[case("6.4.0", true, false)]
    #[case("6.5", true, false)]
    #[case("6.6.0", true, true)]
    #[case("7.0.1", true, true)]
    fn test_gates_by_version(#[case] host: &str, #[case] shortcut: bool, #[case] toolbar: bool) {
        let caps = HostCapabilities::from_version(host).unwrap();
        assert_eq!(caps.supports_keyboard_shortcut(), shortcut);
        assert_eq!(caps.uses_unified_toolbar(), toolbar);
    }

    #[rstest]
    #[case("6")]
    #[case("6.x.1")]
    #[case("1.2.3.4")]
    #[case("")]
    fn test_rejects_malformed_versions(#[case] host: &str) {
        assert!(matches!(
            HostCapabilities::from_version(host),
            Err(Error::Version { .. })
        ));
    }

    #[test]
    fn test_at_least_with_unparseable_argument_is_false() {
        let caps = HostCapabilities::from_version("6.5.0").unwrap();
        assert!(!caps.at_least("latest"));
        assert!(caps.at_least("6.5"));
    }
}
