//! # zulu: latest Azul Zulu bundle for a JDK line
//!
//! Backs the `zulu-dependency` action. Given the `type` (bundle features, e.g.
//! `jdk`) and `version` (JDK version prefix, e.g. `11`) inputs it asks the Azul
//! catalog for the latest Linux x86-64 tarball and turns the answer into step
//! outputs:
//!
//! - `version`: the bundle version as `major.minor.patch`
//! - `uri`: the download URL
//! - `cpe`: only for Java 8, which is tracked as `update<patch>` rather than by
//!   its version number
//!
//! # Error Handling
//! Every failure is fatal for the run and is returned as a [`ResolveError`]. The
//! catalog is queried once; there is no retry and nothing is written until all
//! outputs are known.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use crate::contract::{Bundle, BundleQuery, BundleSource};
use crate::inputs::{Inputs, MissingInput};
use crate::outputs::OutputSet;
use crate::versions::{SelectError, VersionCatalog, VERSION_CONSTRAINT};

pub const BUNDLES_URI: &str = "https://api.azul.com/zulu/download/community/v1.0/bundles/latest/";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    MissingInput(#[from] MissingInput),
    #[error("unable to get {uri}")]
    Transport {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unable to download {uri}: {status}")]
    Status { uri: String, status: u16 },
    #[error("unable to decode payload")]
    Payload(#[source] serde_json::Error),
    #[error("jdk_version must have major, minor and patch components, found {0}")]
    MalformedVersion(usize),
    #[error("unable to get latest version")]
    Select(#[from] SelectError),
    #[error("unable to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("output {0} must be a single line")]
    MultilineOutput(String),
}

impl BundleQuery {
    /// Build a query from the `type` and `version` inputs. Both are required.
    pub fn from_inputs(inputs: &Inputs) -> Result<Self, MissingInput> {
        Ok(Self {
            features: inputs.required("type")?.to_owned(),
            jdk_version: inputs.required("version")?.to_owned(),
        })
    }

    pub fn uri(&self) -> String {
        self.uri_at(BUNDLES_URI)
    }

    /// The query against a catalog rooted at `base` instead of [`BUNDLES_URI`].
    pub fn uri_at(&self, base: &str) -> String {
        format!(
            "{base}?arch=x86&ext=tar.gz&features={}&hw_bitness=64&jdk_version={}&os=linux&javafx=false",
            self.features, self.jdk_version
        )
    }
}

impl Bundle {
    /// The bundle as a one-entry catalog keyed by its `major.minor.patch` version.
    pub fn catalog(&self) -> Result<VersionCatalog, ResolveError> {
        match self.jdk_version.as_slice() {
            [major, minor, patch, ..] => Ok(VersionCatalog::new([(
                format!("{major}.{minor}.{patch}"),
                self.url.clone(),
            )])),
            other => Err(ResolveError::MalformedVersion(other.len())),
        }
    }
}

/// Check the status of a catalog response and decode its body. The status is
/// checked first, so an error response is never decoded.
pub fn decode_response(uri: &str, status: u16, body: &[u8]) -> Result<Bundle, ResolveError> {
    if status != 200 {
        error!(uri, status, "Catalog returned an error status");
        return Err(ResolveError::Status {
            uri: uri.to_owned(),
            status,
        });
    }
    serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, uri, "Failed to decode catalog payload");
        ResolveError::Payload(e)
    })
}

/// [`BundleSource`] backed by the Azul catalog API.
pub struct ZuluClient {
    client: reqwest::Client,
    base_uri: String,
}

impl ZuluClient {
    /// Client without a request timeout; a peer that never answers blocks the run.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_uri: BUNDLES_URI.to_owned(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ResolveError::Client)?;
        Ok(Self {
            client,
            base_uri: BUNDLES_URI.to_owned(),
        })
    }

    /// Point the client at another catalog root, e.g. a mirror.
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }
}

impl Default for ZuluClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BundleSource for ZuluClient {
    async fn latest_bundle(&self, query: &BundleQuery) -> Result<Bundle, ResolveError> {
        let uri = query.uri_at(&self.base_uri);
        info!(uri = %uri, "Requesting latest bundle");

        let response = self.client.get(&uri).send().await.map_err(|source| {
            error!(error = %source, uri = %uri, "Catalog request failed");
            ResolveError::Transport {
                uri: uri.clone(),
                source,
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| ResolveError::Transport {
                uri: uri.clone(),
                source,
            })?;

        decode_response(&uri, status, &body)
    }
}

/// Resolve the latest bundle for `inputs` and build the step outputs.
///
/// Inputs are validated before `source` is consulted.
pub async fn resolve<S>(inputs: &Inputs, source: &S) -> Result<OutputSet, ResolveError>
where
    S: BundleSource + ?Sized,
{
    let query = BundleQuery::from_inputs(inputs)?;
    info!(features = %query.features, jdk_version = %query.jdk_version, "Resolving Zulu bundle");

    let bundle = source.latest_bundle(&query).await?;
    let (latest, uri) = bundle
        .catalog()?
        .select_latest(inputs.get(VERSION_CONSTRAINT))?;

    let mut outputs = OutputSet::for_version(&latest, uri);
    if latest.major() == 8 {
        // Java 8 is published as 1.8.0 with `updateNN` in its CPE instead of 8.0.NN.
        outputs.insert("cpe", format!("update{}", latest.patch()));
    }
    if let Some(name) = outputs.first_multiline() {
        error!(output = name, "Catalog returned a value spanning several lines");
        return Err(ResolveError::MultilineOutput(name.to_owned()));
    }

    info!(version = %latest, outputs = outputs.len(), "Resolved Zulu bundle");
    Ok(outputs)
}
