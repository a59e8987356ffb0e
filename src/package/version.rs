use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Version representation supporting the formats Composer reports
#[derive(Debug, Clone)]
pub struct Version {
    pub original: String,
    pub parsed: VersionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionType {
    Semantic(semver::Version),
    Numeric(Vec<u64>),
    Unknown(String),
}

impl Version {
    pub fn parse(version: &str) -> Self {
        let parsed = if let Ok(v) = semver::Version::parse(version) {
            VersionType::Semantic(v)
        } else if let Some(numeric) = Self::parse_numeric(version) {
            VersionType::Numeric(numeric)
        } else {
            VersionType::Unknown(version.to_string())
        };

        Version {
            original: version.to_string(),
            parsed,
        }
    }

    fn parse_numeric(version: &str) -> Option<Vec<u64>> {
        let mut numbers = Vec::new();

        for part in version.split('.') {
            numbers.push(part.parse::<u64>().ok()?);
        }

        if numbers.is_empty() {
            None
        } else {
            Some(numbers)
        }
    }

    /// Dotted segments as plain numbers, when every segment is numeric
    fn segments(&self) -> Option<Vec<u64>> {
        match &self.parsed {
            VersionType::Semantic(v) if v.pre.is_empty() && v.build.is_empty() => {
                Some(vec![v.major, v.minor, v.patch])
            }
            VersionType::Numeric(n) => Some(n.clone()),
            _ => None,
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        if let (VersionType::Semantic(a), VersionType::Semantic(b)) = (&self.parsed, &other.parsed)
        {
            return a.cmp(b);
        }

        match (self.segments(), other.segments()) {
            (Some(a), Some(b)) => {
                for (av, bv) in a.iter().zip(b.iter()) {
                    match av.cmp(bv) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.original.cmp(&other.original),
        }
    }
}

/// How far an installed version trails the latest one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateClassification {
    UpToDate,
    MinorOrPatchUpdate,
    MajorUpdate,
}

impl fmt::Display for UpdateClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateClassification::UpToDate => "up to date",
            UpdateClassification::MinorOrPatchUpdate => "minor or patch update available",
            UpdateClassification::MajorUpdate => "major update available",
        };
        f.write_str(label)
    }
}

pub struct VersionComparator;

impl VersionComparator {
    /// Numeric-aware equality; missing segments are not zero-padded
    pub fn equal(a: &str, b: &str) -> bool {
        Version::parse(a) == Version::parse(b)
    }

    /// Leading dot-separated segment, or the whole string when there is none
    pub fn major_component(version: &str) -> &str {
        version.split('.').next().unwrap_or(version)
    }

    pub fn classify(installed: &str, latest: &str) -> UpdateClassification {
        if Self::equal(installed, latest) {
            UpdateClassification::UpToDate
        } else if Self::major_component(installed) != Self::major_component(latest) {
            UpdateClassification::MajorUpdate
        } else {
            UpdateClassification::MinorOrPatchUpdate
        }
    }
}
