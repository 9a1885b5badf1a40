//! Action inputs.
//!
//! GitHub Actions hands `with:` parameters to a step as environment variables named
//! `INPUT_<NAME>`. [`Inputs`] collects them into a lowercase-keyed map that callers
//! can overlay with explicit command-line values.

use std::collections::BTreeMap;

use tracing::debug;

/// Environment variable prefix used by the runner for action inputs.
pub const INPUT_PREFIX: &str = "INPUT_";

/// A required input was absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} must be specified")]
pub struct MissingInput(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    values: BTreeMap<String, String>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect inputs from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Collect inputs from an arbitrary set of environment variables. Variables
    /// without the `INPUT_` prefix are ignored.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let values: BTreeMap<String, String> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(INPUT_PREFIX)
                    .map(|name| (name.to_lowercase(), value))
            })
            .collect();
        debug!(names = ?values.keys().collect::<Vec<_>>(), "Collected action inputs");
        Self { values }
    }

    /// Set `name` to `value`, replacing anything collected from the environment.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Overlay `value` when one was given; `None` keeps the current value.
    pub fn overlay(mut self, name: &str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.set(name, value);
        }
        self
    }

    /// Look up an input. The runner passes unset optional inputs as empty strings,
    /// so an empty value counts as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<&str, MissingInput> {
        self.get(name).ok_or_else(|| MissingInput(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn collects_only_prefixed_variables_with_lowercase_names() {
        let inputs = Inputs::from_vars(vars(&[
            ("INPUT_TYPE", "jdk"),
            ("INPUT_VERSION", "11"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(inputs.get("type"), Some("jdk"));
        assert_eq!(inputs.get("version"), Some("11"));
        assert_eq!(inputs.get("path"), None);
    }

    #[test]
    fn empty_values_are_treated_as_missing() {
        let inputs = Inputs::from_vars(vars(&[("INPUT_TYPE", "")]));

        assert_eq!(inputs.get("type"), None);
        assert_eq!(
            inputs.required("type"),
            Err(MissingInput("type".to_string()))
        );
    }

    #[test]
    fn overlay_replaces_environment_value_only_when_present() {
        let inputs = Inputs::from_vars(vars(&[("INPUT_VERSION", "8")]))
            .overlay("version", Some("17".to_string()))
            .overlay("type", None);

        assert_eq!(inputs.get("version"), Some("17"));
        assert_eq!(inputs.get("type"), None);
    }

    #[test]
    fn missing_input_message_names_the_input() {
        let err = Inputs::new().required("version").unwrap_err();
        assert_eq!(err.to_string(), "version must be specified");
    }
}
