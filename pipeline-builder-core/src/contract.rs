//! # contract: seams between the action helpers and the outside world
//!
//! The version-fetch action talks to exactly one upstream: a vendor catalog that
//! answers "what is the latest bundle for these features and this JDK line?".
//! That conversation is captured by the [`BundleSource`] trait so the resolver in
//! [`crate::zulu`] can be driven by the real HTTP client in production and by a
//! `mockall` mock in tests.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; enable the `test-export-mocks` feature
//!   (on by default) to use `MockBundleSource` from downstream crates.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::zulu::ResolveError;

/// What to ask the catalog for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleQuery {
    /// Bundle feature flag, e.g. `jdk` or `jre`.
    pub features: String,
    /// JDK version prefix, e.g. `8` or `11`.
    pub jdk_version: String,
}

/// A runtime bundle as described by the vendor catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bundle {
    /// Version components, most significant first. The catalog may append a build
    /// number after the patch component.
    pub jdk_version: Vec<u64>,
    /// Download location of the bundle archive.
    pub url: String,
}

/// Source of the latest bundle for a query.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BundleSource: Send + Sync {
    /// Fetch the latest bundle matching `query`. Implementations make at most one
    /// request and never retry.
    async fn latest_bundle(&self, query: &BundleQuery) -> Result<Bundle, ResolveError>;
}
