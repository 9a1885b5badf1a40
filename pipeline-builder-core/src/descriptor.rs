//! Pipeline descriptors: the per-project YAML file that says which workflows a
//! project wants.
//!
//! ```yaml
//! path: ..
//! package:
//!   repository: gcr.io/paketo-buildpacks/java
//! ```
//!
//! `path` is the project root. It defaults to `..` (the descriptor conventionally
//! lives in `.github/`) and a relative value is resolved against the directory
//! holding the descriptor.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_DESCRIPTOR: &str = ".github/pipeline-descriptor.yml";

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("unable to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to decode {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Descriptor {
    #[serde(default = "default_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub package: Option<PackageSection>,
}

/// Marks the project as publishing a package whose dependencies should be kept
/// up to date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageSection {
    #[serde(default)]
    pub repository: Option<String>,
}

fn default_path() -> PathBuf {
    PathBuf::from("..")
}

impl Descriptor {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Read and parse a descriptor file, resolving its project path.
pub fn load_descriptor<P: AsRef<Path>>(path: P) -> Result<Descriptor, DescriptorError> {
    let path = path.as_ref();
    info!(descriptor = %path.display(), "Loading pipeline descriptor");

    let content = fs::read_to_string(path).map_err(|source| {
        error!(error = ?source, descriptor = %path.display(), "Failed to read descriptor");
        DescriptorError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut descriptor = Descriptor::from_yaml(&content).map_err(|source| {
        error!(error = ?source, descriptor = %path.display(), "Failed to parse descriptor");
        DescriptorError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if descriptor.path.is_relative() {
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        descriptor.path = base.join(&descriptor.path);
    }

    info!(
        project = %descriptor.path.display(),
        package = descriptor.package.is_some(),
        "Loaded pipeline descriptor"
    );
    Ok(descriptor)
}
