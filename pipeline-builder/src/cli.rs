/// # pipeline-builder CLI Interface (Module)
///
/// Command parsing and orchestration for the `pipeline-builder` binary. Everything
/// that is more than glue (workflow models, contributors, version resolution) lives
/// in [`pipeline-builder-core`]; this module maps arguments and environment to
/// core calls and surfaces their errors with context.
///
/// ## Commands
/// - `contribute`: generate workflow files for the project named by a pipeline
///   descriptor and write them below the project root.
/// - `zulu-dependency`: resolve the latest Azul Zulu bundle and print its step
///   outputs as `key=value` lines on stdout.
///
/// Logs go to stderr so stdout carries nothing but outputs.
///
/// [`pipeline-builder-core`]: ../../pipeline-builder-core/
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pipeline_builder_core::contribution::write_contributions;
use pipeline_builder_core::descriptor::{load_descriptor, DEFAULT_DESCRIPTOR};
use pipeline_builder_core::inputs::Inputs;
use pipeline_builder_core::outputs::OutputSet;
use pipeline_builder_core::package_dependencies::contribute_package_dependencies;
use pipeline_builder_core::versions::VERSION_CONSTRAINT;
use pipeline_builder_core::zulu::{self, ZuluClient};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI for pipeline-builder: generate buildpack workflows and resolve dependency versions.
#[derive(Parser)]
#[clap(
    name = "pipeline-builder",
    version,
    about = "Generate GitHub Actions workflows for buildpack projects and resolve dependency versions"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate workflows from a pipeline descriptor and write them into the project
    Contribute {
        /// Path to the pipeline descriptor YAML file
        #[clap(long, default_value = DEFAULT_DESCRIPTOR)]
        descriptor: PathBuf,
    },
    /// Print the latest Azul Zulu bundle as step outputs
    ZuluDependency {
        /// Bundle features, e.g. jdk or jre [env: INPUT_TYPE]
        #[clap(long = "type")]
        bundle_type: Option<String>,
        /// JDK version prefix, e.g. 8 or 11 [env: INPUT_VERSION]
        #[clap(long)]
        version: Option<String>,
        /// Semantic version requirement the result must satisfy [env: INPUT_VERSION_CONSTRAINT]
        #[clap(long)]
        version_constraint: Option<String>,
        /// Abort the catalog request after this many seconds
        #[clap(long)]
        timeout_secs: Option<u64>,
    },
}

/// Action inputs from the environment, overlaid with any values given as flags.
pub fn action_inputs(
    bundle_type: Option<String>,
    version: Option<String>,
    version_constraint: Option<String>,
) -> Inputs {
    Inputs::from_env()
        .overlay("type", bundle_type)
        .overlay("version", version)
        .overlay(VERSION_CONSTRAINT, version_constraint)
}

/// Load the descriptor, contribute every workflow and write them below the project root.
/// Nothing is written unless the whole contribution pass succeeds.
pub fn contribute(descriptor: &Path) -> Result<Vec<PathBuf>> {
    let descriptor = load_descriptor(descriptor)?;
    let contributions = contribute_package_dependencies(&descriptor)
        .with_context(|| format!("unable to contribute workflows for {}", descriptor.path.display()))?;
    let written = write_contributions(&descriptor.path, &contributions)?;
    tracing::info!(command = "contribute", written = written.len(), "Contributions written");
    Ok(written)
}

/// Resolve the latest Zulu bundle for the given inputs.
pub async fn zulu_dependency(inputs: &Inputs, timeout: Option<Duration>) -> Result<OutputSet> {
    let client = match timeout {
        Some(timeout) => ZuluClient::with_timeout(timeout)?,
        None => ZuluClient::new(),
    };
    let outputs = zulu::resolve(inputs, &client).await?;
    Ok(outputs)
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Contribute { descriptor } => {
            tracing::info!(command = "contribute", descriptor = %descriptor.display(), "Contributing workflows");
            for path in contribute(&descriptor)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::ZuluDependency {
            bundle_type,
            version,
            version_constraint,
            timeout_secs,
        } => {
            tracing::info!(command = "zulu-dependency", "Resolving Zulu dependency");
            let inputs = action_inputs(bundle_type, version, version_constraint);
            let outputs = zulu_dependency(&inputs, timeout_secs.map(Duration::from_secs)).await?;
            let mut stdout = std::io::stdout().lock();
            outputs
                .write(&mut stdout)
                .context("unable to write outputs")?;
            Ok(())
        }
    }
}
