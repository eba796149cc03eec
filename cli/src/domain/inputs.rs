//! Action input names and validation of their raw string values.

use serde_json::Value;

use crate::domain::error::ConfigError;

/// Input names as declared by the action. Each maps to `INPUT_<NAME>`.
pub mod names {
    pub const DEPLOYER_VERSION: &str = "deployer-version";
    pub const DEPLOYER_BINARY: &str = "deployer-binary";
    pub const DEPLOYER_COMMAND: &str = "dep";
    pub const DEPLOYER_OPTIONS: &str = "options";
    pub const DEPLOYER_VERBOSITY: &str = "verbosity";
    pub const DEPLOYER_ANSI_OUTPUT: &str = "ansi";
    pub const SSH_SKIP_SETUP: &str = "skip-ssh-setup";
    pub const SSH_CONFIG: &str = "ssh-config";
    pub const SSH_KNOWN_HOSTS: &str = "known-hosts";
    pub const SSH_PRIVATE_KEY: &str = "private-key";
    pub const SUB_DIRECTORY: &str = "sub-directory";
}

/// Parses a boolean input following the YAML 1.2 core schema.
///
/// An empty value is `false`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBool`] for anything outside
/// `true | True | TRUE | false | False | FALSE`.
pub fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" | "" => Ok(false),
        other => Err(ConfigError::InvalidBool {
            name,
            value: other.to_string(),
        }),
    }
}

/// Splits the `dep` input into command tokens on spaces.
///
/// # Errors
///
/// Returns [`ConfigError::MissingInput`] if no token remains.
pub fn parse_command(value: &str) -> Result<Vec<String>, ConfigError> {
    let tokens: Vec<String> = value
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tokens.is_empty() {
        return Err(ConfigError::MissingInput(names::DEPLOYER_COMMAND));
    }
    Ok(tokens)
}

/// Decodes the `options` input into ordered `(key, value)` pairs.
///
/// Empty input means no options. Non-string JSON values are rendered as their
/// JSON text, so `{"port": 22}` becomes `("port", "22")`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOptions`] for malformed JSON and
/// [`ConfigError::OptionsNotObject`] for valid JSON that is not an object.
pub fn parse_options(value: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Value =
        serde_json::from_str(value).map_err(|e| ConfigError::InvalidOptions(e.to_string()))?;
    let Value::Object(map) = parsed else {
        return Err(ConfigError::OptionsNotObject(value.to_string()));
    };
    Ok(map
        .into_iter()
        .map(|(k, v)| {
            let rendered = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, rendered)
        })
        .collect())
}
