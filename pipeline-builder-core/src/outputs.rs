//! Step outputs in the runner's `key=value` line format.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::versions::ResolvedVersion;

/// Named outputs of one action run, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSet {
    values: BTreeMap<String, String>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard outputs of a dependency action: the normalized `version` and
    /// the `uri` it can be downloaded from.
    pub fn for_version(version: &ResolvedVersion, uri: impl Into<String>) -> Self {
        let mut outputs = Self::new();
        outputs.insert("uri", uri);
        outputs.insert("version", version.to_string());
        outputs
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Name of the first output whose value spans more than one line.
    pub fn first_multiline(&self) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, value)| is_multiline(value))
            .map(|(name, _)| name.as_str())
    }

    /// Write every output as a `key=value` line.
    ///
    /// A value containing a line break would be read back as extra outputs, so the
    /// set is checked before anything is written and rejected as a whole.
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(name) = self.first_multiline() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("output {name} must be a single line"),
            ));
        }
        for (name, value) in &self.values {
            writeln!(out, "{name}={value}")?;
        }
        out.flush()
    }
}

fn is_multiline(value: &str) -> bool {
    value.contains(['\n', '\r'])
}
