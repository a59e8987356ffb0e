use crate::error::{Result, UpdaterError};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static FIELD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(.*)[ \t]:[ \t](.*)$").expect("field pattern is valid"));

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));

/// Marker Composer puts in front of the version that is currently installed
const SELECTED_MARKER: &str = "* ";

/// Labeled fields from one `composer outdated <package>` run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutdatedReport {
    fields: HashMap<String, String>,
}

impl OutdatedReport {
    /// Looks a label up ignoring ASCII case
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .get(&label.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct OutdatedParser;

impl OutdatedParser {
    /// Collects every `label : value` line; later labels overwrite earlier ones.
    pub fn parse(raw: &str) -> OutdatedReport {
        let mut fields = HashMap::new();

        for captures in FIELD_LINE.captures_iter(raw) {
            // Labels are stored lowercased so case variants overwrite each other
            let label = Self::clean(&captures[1]).to_ascii_lowercase();
            let value = Self::clean(&captures[2]);
            fields.insert(label, value);
        }

        tracing::debug!("Parsed {} fields from outdated report", fields.len());
        OutdatedReport { fields }
    }

    /// Installed version from the `versions` field, without the selection marker
    pub fn installed_version(report: &OutdatedReport, package: &str) -> Result<String> {
        let versions = Self::require_field(report, "versions", package)?;
        let versions = versions.trim_start_matches(SELECTED_MARKER).trim();

        versions
            .split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| Self::missing("versions", package))
    }

    pub fn latest_version(report: &OutdatedReport, package: &str) -> Result<String> {
        Self::require_field(report, "latest", package).map(str::to_string)
    }

    fn require_field<'a>(report: &'a OutdatedReport, field: &str, package: &str) -> Result<&'a str> {
        match report.get(field) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Self::missing(field, package)),
        }
    }

    fn missing(field: &str, package: &str) -> UpdaterError {
        UpdaterError::MissingField {
            field: field.to_string(),
            package: package.to_string(),
        }
    }

    fn clean(raw: &str) -> String {
        MARKUP_TAG.replace_all(raw.trim(), "").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = "pantheon-systems/terminus";

    #[test]
    fn parses_installed_and_latest_versions() {
        let report =
            OutdatedParser::parse("Name : Foo\nVersions : * 1.2.3 -> 1.3.0\nLatest : 1.3.0\n");
        assert_eq!(
            OutdatedParser::installed_version(&report, PACKAGE).unwrap(),
            "1.2.3"
        );
        assert_eq!(
            OutdatedParser::latest_version(&report, PACKAGE).unwrap(),
            "1.3.0"
        );
    }

    #[test]
    fn parses_composer_show_layout() {
        let raw = "\
name     : pantheon-systems/terminus
descrip. : A command line interface for Pantheon
keywords : 
versions : * <info>1.9.0</info>
latest   : <highlight>2.0.0</highlight>
type     : library
homepage : https://github.com/pantheon-systems/terminus
source   : [git] https://github.com/pantheon-systems/terminus.git 1.9.0
";
        let report = OutdatedParser::parse(raw);
        assert_eq!(report.get("name"), Some("pantheon-systems/terminus"));
        assert_eq!(
            report.get("homepage"),
            Some("https://github.com/pantheon-systems/terminus")
        );
        assert_eq!(
            OutdatedParser::installed_version(&report, PACKAGE).unwrap(),
            "1.9.0"
        );
        assert_eq!(
            OutdatedParser::latest_version(&report, PACKAGE).unwrap(),
            "2.0.0"
        );
    }

    #[test]
    fn later_label_wins() {
        let report = OutdatedParser::parse("latest : 1.0.0\nlatest : 1.1.0\n");
        assert_eq!(report.get("latest"), Some("1.1.0"));
    }

    #[test]
    fn later_label_wins_across_case_variants() {
        let report = OutdatedParser::parse("latest : 1.0.0\nLatest : 2.0.0\n");
        assert_eq!(
            OutdatedParser::latest_version(&report, PACKAGE).unwrap(),
            "2.0.0"
        );

        let report = OutdatedParser::parse("LATEST : 1.0.0\nLatest : 1.5.0\nlatest : 2.0.0\n");
        assert_eq!(report.get("Latest"), Some("2.0.0"));
    }

    #[test]
    fn text_without_fields_yields_empty_report() {
        let report = OutdatedParser::parse("Nothing to see here\nno colons either\n");
        assert!(report.is_empty());

        let err = OutdatedParser::installed_version(&report, PACKAGE).unwrap_err();
        assert!(matches!(err, UpdaterError::MissingField { ref field, .. } if field == "versions"));
        let err = OutdatedParser::latest_version(&report, PACKAGE).unwrap_err();
        assert!(matches!(err, UpdaterError::MissingField { ref field, .. } if field == "latest"));
    }

    #[test]
    fn empty_field_counts_as_missing() {
        let report = OutdatedParser::parse("versions : * 1.0.0\nlatest : <info></info>\n");
        assert!(OutdatedParser::latest_version(&report, PACKAGE).is_err());
    }

    #[test]
    fn colon_without_spacing_is_not_a_field() {
        let report = OutdatedParser::parse("https://example.com\nkey:value\n");
        assert!(report.is_empty());
    }
}
