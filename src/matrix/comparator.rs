//! Version parsing capability used by computed properties

#[cfg(test)]
use mockall::automock;

use semver::Version;

use crate::matrix::error::MatrixError;

/// Turns a version string into a totally ordered semantic version
#[cfg_attr(test, automock)]
pub trait VersionComparator: Send + Sync {
    /// Parse a version string
    ///
    /// # Returns
    /// * `Ok(Version)` - The parsed version
    /// * `Err(MatrixError::MalformedVersion)` - If the string is not a valid version
    fn parse(&self, version: &str) -> Result<Version, MatrixError>;
}

/// Comparator backed by the `semver` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverComparator;

impl VersionComparator for SemverComparator {
    fn parse(&self, version: &str) -> Result<Version, MatrixError> {
        parse_version(version)
    }
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Strips a leading 'v' and pads partial versions with zeros.
///
/// Examples:
/// - "12" -> Version(12, 0, 0)
/// - "v12.1" -> Version(12, 1, 0)
/// - "12.1.3" -> Version(12, 1, 3)
pub fn parse_version(version: &str) -> Result<Version, MatrixError> {
    let trimmed = version.trim();
    let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let parts: Vec<&str> = stripped.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => stripped.to_string(),
    };
    Version::parse(&normalized).map_err(|source| MatrixError::MalformedVersion {
        version: version.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2.0.0", Version::new(2, 0, 0))]
    #[case("12", Version::new(12, 0, 0))]
    #[case("12.1", Version::new(12, 1, 0))]
    #[case("v1.3.0", Version::new(1, 3, 0))]
    #[case(" 1.0.0 ", Version::new(1, 0, 0))]
    #[case("1000.1000.1000", Version::new(1000, 1000, 1000))]
    fn parse_version_accepts_full_and_partial_versions(
        #[case] input: &str,
        #[case] expected: Version,
    ) {
        assert_eq!(SemverComparator.parse(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("latest")]
    #[case("1.x")]
    #[case("one.two.three")]
    fn parse_version_rejects_malformed_versions(#[case] input: &str) {
        let err = SemverComparator.parse(input).unwrap_err();
        assert!(
            matches!(err, MatrixError::MalformedVersion { ref version, .. } if version == input)
        );
    }

    #[test]
    fn parsed_versions_are_totally_ordered() {
        let older = parse_version("1.9.0").unwrap();
        let newer = parse_version("2.0.0").unwrap();
        assert!(older < newer);
        assert!(newer > older);
        assert_eq!(newer, parse_version("2.0").unwrap());
    }
}
