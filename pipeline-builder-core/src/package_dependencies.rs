//! Package dependency contributor.
//!
//! For a project that publishes a package, every image listed in its
//! `package.toml` gets its own workflow. The workflow polls the image repository
//! for a newer tag, rewrites the descriptor through `update-package-dependency`
//! and opens a pull request with the bump.
//!
//! The step order is fixed: tools and credentials are set up before the update
//! script runs, and the pull request step reads the update step's
//! `old-version`/`new-version` outputs.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::contribution::{ContributeError, Contribution};
use crate::descriptor::Descriptor;
use crate::package::load_package;
use crate::workflow::{Cron, Job, Step, Triggers, VirtualEnvironment, Workflow, WorkflowDispatch};

pub const GO_VERSION: &str = "1.15";
pub const YJ_VERSION: &str = "5.0.0";

/// Id of the step that runs the update script; the pull request step reads its outputs.
pub const UPDATE_STEP_ID: &str = "package";

const INSTALL_CRANE: &str = include_str!("scripts/install-crane.sh");
const INSTALL_YJ: &str = include_str!("scripts/install-yj.sh");
const INSTALL_UPDATE_PACKAGE_DEPENDENCY: &str =
    include_str!("scripts/install-update-package-dependency.sh");
const UPDATE_PACKAGE_DEPENDENCY: &str = include_str!("scripts/update-package-dependency.sh");

const OLD_VERSION: &str = "${{ steps.package.outputs.old-version }}";
const NEW_VERSION: &str = "${{ steps.package.outputs.new-version }}";

/// Build one contribution per dependency in the project's `package.toml`.
///
/// A descriptor without a `package` section contributes nothing. Any unreadable
/// descriptor or unparsable image coordinate fails the whole pass; no partial list
/// is returned.
pub fn contribute_package_dependencies(
    descriptor: &Descriptor,
) -> Result<Vec<Contribution>, ContributeError> {
    if descriptor.package.is_none() {
        debug!(project = %descriptor.path.display(), "No package section, skipping package dependencies");
        return Ok(Vec::new());
    }

    let package = load_package(&descriptor.path)?;

    let names = package
        .dependencies
        .iter()
        .map(|d| d.repository())
        .collect::<Result<Vec<_>, _>>()?;

    let contributions = names
        .into_iter()
        .map(|name| Contribution::from_workflow(&package_dependency_workflow(name)))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        project = %descriptor.path.display(),
        contributions = contributions.len(),
        "Contributed package dependency workflows"
    );
    Ok(contributions)
}

/// The update workflow for one image repository, e.g. `gcr.io/paketo-buildpacks/maven`.
pub fn package_dependency_workflow(name: &str) -> Workflow {
    let base = base_name(name);

    let steps = vec![
        Step::uses("actions/checkout@v2"),
        Step::uses("actions/setup-go@v2").with("go-version", GO_VERSION),
        Step::run("Install crane", INSTALL_CRANE),
        Step::run("Install yj", INSTALL_YJ).env("YJ_VERSION", YJ_VERSION),
        Step::run(
            "Install update-package-dependency",
            INSTALL_UPDATE_PACKAGE_DEPENDENCY,
        ),
        Step::uses("GoogleCloudPlatform/github-actions/setup-gcloud@master").with(
            "service_account_key",
            "${{ secrets.JAVA_GCLOUD_SERVICE_ACCOUNT_KEY }}",
        ),
        Step::run(
            "Configure gcloud docker credentials",
            "gcloud auth configure-docker",
        ),
        Step::run("Update Package Dependency", UPDATE_PACKAGE_DEPENDENCY)
            .id(UPDATE_STEP_ID)
            .env("DEPENDENCY", name),
        Step::uses("peter-evans/create-pull-request@v3")
            .with("token", "${{ secrets.GITHUB_TOKEN }}")
            .with(
                "commit-message",
                format!(
                    "Bump {name} from {OLD_VERSION} to {NEW_VERSION}\n\n\
                     Bumps {name} from {OLD_VERSION} to {NEW_VERSION}."
                ),
            )
            .with("signoff", true)
            .with("branch", format!("update-package/{base}"))
            .with("delete-branch", true)
            .with(
                "title",
                format!("Bump {name} from {OLD_VERSION} to {NEW_VERSION}"),
            )
            .with(
                "body",
                format!(
                    "Bumps [`{name}`](https://{name}) from [`{OLD_VERSION}`](https://{name}:{OLD_VERSION}) \
                     to [`{NEW_VERSION}`](https://{name}:{NEW_VERSION})."
                ),
            )
            .with("labels", "semver:minor, type:dependency-upgrade"),
    ];

    Workflow {
        name: format!("Update {base}"),
        on: Triggers {
            // Only the minute is pinned, so this fires at the top of every hour.
            schedule: vec![Cron {
                minute: "0".into(),
                ..Cron::default()
            }],
            workflow_dispatch: Some(WorkflowDispatch {}),
        },
        jobs: BTreeMap::from([(
            "update".to_string(),
            Job {
                name: "Update Package Dependency".into(),
                runs_on: vec![VirtualEnvironment::UbuntuLatest],
                steps,
            },
        )]),
    }
}

fn base_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
}
