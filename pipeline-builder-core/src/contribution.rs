//! Contributions: generated files destined for a project, plus the writer that
//! puts them on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::workflow::Workflow;

/// Directory, relative to the project root, that holds workflow files.
pub const WORKFLOWS_DIR: &str = ".github/workflows";

#[derive(Debug, thiserror::Error)]
pub enum ContributeError {
    #[error("unable to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unable to parse image coordinates from {0}")]
    ImageCoordinates(String),
    #[error("unable to serialize workflow {name}")]
    Serialize {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unable to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A generated file: where it goes, relative to the project root, and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub path: PathBuf,
    pub content: String,
}

impl Contribution {
    /// Render `workflow` into `.github/workflows/<slug>.yml`, where the slug is the
    /// workflow name lowercased with spaces replaced by dashes.
    pub fn from_workflow(workflow: &Workflow) -> Result<Self, ContributeError> {
        let content = workflow
            .to_yaml()
            .map_err(|source| ContributeError::Serialize {
                name: workflow.name.clone(),
                source,
            })?;
        let file_name = format!("{}.yml", workflow.name.to_lowercase().replace(' ', "-"));

        Ok(Self {
            path: Path::new(WORKFLOWS_DIR).join(file_name),
            content,
        })
    }

    /// Write the contribution below `root`, creating directories as needed.
    pub fn write(&self, root: &Path) -> Result<PathBuf, ContributeError> {
        let target = root.join(&self.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| {
                error!(error = ?source, path = %parent.display(), "Failed to create directory");
                ContributeError::Write {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }
        fs::write(&target, &self.content).map_err(|source| {
            error!(error = ?source, path = %target.display(), "Failed to write contribution");
            ContributeError::Write {
                path: target.clone(),
                source,
            }
        })?;
        info!(path = %target.display(), "Wrote contribution");
        Ok(target)
    }
}

/// Write every contribution below `root`, stopping at the first failure.
pub fn write_contributions(
    root: &Path,
    contributions: &[Contribution],
) -> Result<Vec<PathBuf>, ContributeError> {
    contributions.iter().map(|c| c.write(root)).collect()
}
