//! Version fields of a JAR manifest.

use serde::{Deserialize, Serialize};

const IMPLEMENTATION_VERSION: &str = "Implementation-Version:";
const SPECIFICATION_VERSION: &str = "Specification-Version:";

/// Version metadata reported for one JAR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification_version: Option<String>,
    /// Lowercase hex MD5 of the whole archive, only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

impl VersionRecord {
    /// Extract `Implementation-Version` and `Specification-Version` from
    /// manifest text.
    ///
    /// Keys are matched case-sensitively at the start of each trimmed line and
    /// the last occurrence of a key wins. Continuation lines are not joined.
    /// A key whose final value is empty counts as absent.
    pub fn parse(manifest: &str) -> Self {
        let mut implementation = None;
        let mut specification = None;

        for line in manifest.split('\n').map(str::trim) {
            if let Some(value) = line.strip_prefix(IMPLEMENTATION_VERSION) {
                implementation = Some(value.trim());
            }
            if let Some(value) = line.strip_prefix(SPECIFICATION_VERSION) {
                specification = Some(value.trim());
            }
        }

        let present = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_owned);
        Self {
            implementation_version: present(implementation),
            specification_version: present(specification),
            md5: None,
        }
    }

    pub fn with_md5(mut self, digest: String) -> Self {
        self.md5 = Some(digest);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_versions() {
        let record = VersionRecord::parse(
            "Manifest-Version: 1.0\nImplementation-Version: 1.2.3\nSpecification-Version: 4.5.6",
        );
        assert_eq!(record.implementation_version.as_deref(), Some("1.2.3"));
        assert_eq!(record.specification_version.as_deref(), Some("4.5.6"));
        assert_eq!(record.md5, None);
    }

    #[test]
    fn tolerates_indentation_blank_lines_and_crlf() {
        let record = VersionRecord::parse(
            "\r\n    Manifest-Version: 1.0\r\n\r\n  Implementation-Version:     2.0.0   \r\n",
        );
        assert_eq!(record.implementation_version.as_deref(), Some("2.0.0"));
        assert_eq!(record.specification_version, None);
    }

    #[test]
    fn only_specification_version() {
        let record = VersionRecord::parse("Specification-Version: 3.1.4\n");
        assert_eq!(record.implementation_version, None);
        assert_eq!(record.specification_version.as_deref(), Some("3.1.4"));
    }

    #[test]
    fn no_version_lines() {
        assert_eq!(VersionRecord::parse("Manifest-Version: 1.0\n"), VersionRecord::default());
        assert_eq!(VersionRecord::parse(""), VersionRecord::default());
    }

    #[test]
    fn last_occurrence_wins() {
        let record = VersionRecord::parse(
            "Implementation-Version: 1.0\nImplementation-Version: 1.1\nSpecification-Version: a\nSpecification-Version:  b ",
        );
        assert_eq!(record.implementation_version.as_deref(), Some("1.1"));
        assert_eq!(record.specification_version.as_deref(), Some("b"));
    }

    #[test]
    fn empty_last_value_clears_field() {
        let record = VersionRecord::parse("Implementation-Version: 1.0\nImplementation-Version:\n");
        assert_eq!(record.implementation_version, None);
    }

    #[test]
    fn keys_are_case_sensitive_and_unfolded() {
        let record = VersionRecord::parse(
            "implementation-version: 9\nX-Implementation-Version: 8\nImplementation-Version: 1.\n 2.3\n",
        );
        assert_eq!(record.implementation_version.as_deref(), Some("1."));
    }

    #[test]
    fn unrelated_lines_do_not_change_the_result() {
        let base = "Implementation-Version: 5\nSpecification-Version: 6\n";
        let noisy = "Built-By: ci\nImplementation-Version: 5\nMain-Class: a.B\nSpecification-Version: 6\nCreated-By: 17\n";
        assert_eq!(VersionRecord::parse(base), VersionRecord::parse(noisy));
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "Implementation-Version: 7.7\n";
        assert_eq!(VersionRecord::parse(text), VersionRecord::parse(text));
    }
}
