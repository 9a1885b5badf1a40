//! Version catalogs and latest-version selection.
//!
//! A [`VersionCatalog`] maps version strings to download URIs. Selecting from it
//! parses every key as a semantic version, filters by an optional requirement
//! (`>=11`, `~8.0`, `^17`, ...) and returns the greatest survivor.

use std::collections::BTreeMap;
use std::fmt;

use semver::{Version, VersionReq};
use tracing::{debug, info};

/// Input name carrying an optional version requirement.
pub const VERSION_CONSTRAINT: &str = "version_constraint";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("unable to parse version {version}: {reason}")]
    InvalidVersion { version: String, reason: String },
    #[error("unable to parse version constraint {constraint}: {reason}")]
    InvalidConstraint { constraint: String, reason: String },
    #[error("no candidate version matches {constraint}")]
    NoMatchingVersion { constraint: String },
}

/// A selected version, keeping the catalog key it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    version: Version,
    original: String,
}

impl ResolvedVersion {
    pub fn parse(original: &str) -> Result<Self, SelectError> {
        let version = Version::parse(original).map_err(|e| SelectError::InvalidVersion {
            version: original.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            version,
            original: original.to_owned(),
        })
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

/// Renders the normalized `major.minor.patch` form.
impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCatalog {
    entries: BTreeMap<String, String>,
}

impl VersionCatalog {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the catalog, returning the greatest version satisfying `constraint`
    /// together with its URI.
    pub fn select_latest(
        mut self,
        constraint: Option<&str>,
    ) -> Result<(ResolvedVersion, String), SelectError> {
        let latest = select_latest(self.entries.keys().map(String::as_str), constraint)?;
        let uri = self
            .entries
            .remove(latest.original())
            .unwrap_or_default();
        info!(version = %latest, uri = %uri, "Selected latest version");
        Ok((latest, uri))
    }
}

/// Return the greatest of `versions` that satisfies `constraint` (all versions when
/// no constraint is given).
pub fn select_latest<'a, I>(
    versions: I,
    constraint: Option<&str>,
) -> Result<ResolvedVersion, SelectError>
where
    I: IntoIterator<Item = &'a str>,
{
    let requirement = match constraint {
        Some(raw) => VersionReq::parse(raw).map_err(|e| SelectError::InvalidConstraint {
            constraint: raw.to_owned(),
            reason: e.to_string(),
        })?,
        None => VersionReq::STAR,
    };

    let mut candidates = Vec::new();
    for raw in versions {
        let candidate = ResolvedVersion::parse(raw)?;
        if requirement.matches(candidate.version()) {
            candidates.push(candidate);
        } else {
            debug!(version = raw, constraint = %requirement, "Version does not satisfy constraint");
        }
    }

    candidates
        .into_iter()
        .max_by(|a, b| a.version().cmp(b.version()))
        .ok_or_else(|| SelectError::NoMatchingVersion {
            constraint: requirement.to_string(),
        })
}
