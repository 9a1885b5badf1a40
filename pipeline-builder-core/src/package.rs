//! `package.toml`: the buildpack package descriptor and its image dependencies.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, error};

use crate::contribution::ContributeError;

pub const PACKAGE_TOML: &str = "package.toml";

/// `<repository>:<tag>`; the repository may itself contain a registry port.
static IMAGE_COORDINATES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+):[^:]+$").expect("image coordinate pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dependency {
    #[serde(alias = "Image")]
    pub image: String,
}

impl Dependency {
    /// The image repository without its tag.
    pub fn repository(&self) -> Result<&str, ContributeError> {
        IMAGE_COORDINATES
            .captures(&self.image)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| ContributeError::ImageCoordinates(self.image.clone()))
    }
}

/// Read `package.toml` from the project root.
pub fn load_package(project: &Path) -> Result<Package, ContributeError> {
    let path = project.join(PACKAGE_TOML);

    let content = fs::read_to_string(&path).map_err(|source| {
        error!(error = ?source, path = %path.display(), "Failed to read package descriptor");
        ContributeError::Read {
            path: path.clone(),
            source,
        }
    })?;

    let package: Package = toml::from_str(&content).map_err(|source| {
        error!(error = %source, path = %path.display(), "Failed to decode package descriptor");
        ContributeError::Decode {
            path: path.clone(),
            source,
        }
    })?;

    debug!(path = %path.display(), dependencies = package.dependencies.len(), "Loaded package descriptor");
    Ok(package)
}
