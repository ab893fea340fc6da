//! Rendering of a [`VersionRecord`] into the supported output formats.

use crate::manifest::VersionRecord;

/// Two-space indented JSON holding only the present fields.
pub fn to_json(record: &VersionRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

/// `Key: value` lines for the present fields, in fixed order.
pub fn text_lines(record: &VersionRecord) -> Vec<String> {
    labelled_lines(record, "MD5: ")
}

/// Lines printed when no output flag is given.
///
/// The hash line keeps the historical `MD5:  ` form with two spaces.
pub fn console_lines(record: &VersionRecord) -> Vec<String> {
    labelled_lines(record, "MD5:  ")
}

fn labelled_lines(record: &VersionRecord, md5_label: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(3);
    if let Some(version) = &record.implementation_version {
        lines.push(format!("Implementation-Version: {version}"));
    }
    if let Some(version) = &record.specification_version {
        lines.push(format!("Specification-Version: {version}"));
    }
    if let Some(digest) = &record.md5 {
        lines.push(format!("{md5_label}{digest}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> VersionRecord {
        VersionRecord {
            implementation_version: Some("1.2.3".into()),
            specification_version: Some("4.5.6".into()),
            md5: Some("d41d8cd98f00b204e9800998ecf8427e".into()),
        }
    }

    #[test]
    fn json_omits_absent_fields() {
        let record = VersionRecord {
            specification_version: Some("3.1.4".into()),
            ..Default::default()
        };
        assert_eq!(
            to_json(&record).unwrap(),
            "{\n  \"specification_version\": \"3.1.4\"\n}"
        );
        assert_eq!(to_json(&VersionRecord::default()).unwrap(), "{}");
    }

    #[test]
    fn json_reads_back_to_the_same_record() {
        let json = to_json(&full()).unwrap();
        let back: VersionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, full());
    }

    #[test]
    fn text_lines_are_ordered() {
        assert_eq!(
            text_lines(&full()),
            vec![
                "Implementation-Version: 1.2.3",
                "Specification-Version: 4.5.6",
                "MD5: d41d8cd98f00b204e9800998ecf8427e",
            ]
        );
    }

    #[test]
    fn console_hash_line_uses_two_spaces() {
        let lines = console_lines(&full());
        assert_eq!(lines[2], "MD5:  d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn absent_fields_produce_no_lines() {
        let record = VersionRecord {
            implementation_version: Some("2.0.0".into()),
            ..Default::default()
        };
        assert_eq!(text_lines(&record), vec!["Implementation-Version: 2.0.0"]);
        assert!(console_lines(&VersionRecord::default()).is_empty());
    }
}
