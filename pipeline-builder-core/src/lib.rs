#![doc = "pipeline-builder-core: core logic library for pipeline-builder."]

//! This crate holds the data models and transforms behind pipeline-builder:
//! typed GitHub Actions workflow documents, the contributors that generate them
//! from a project descriptor, and the action helpers that resolve the latest
//! version of a dependency and publish it as step outputs.
//!
//! # Usage
//! The `pipeline-builder` CLI crate is a thin shell over this crate. Tests and other
//! tooling can call [`package_dependencies::contribute_package_dependencies`] or
//! [`zulu::resolve`] directly.

pub mod contract;
pub mod contribution;
pub mod descriptor;
pub mod inputs;
pub mod outputs;
pub mod package;
pub mod package_dependencies;
pub mod versions;
pub mod workflow;
pub mod zulu;
