//! Configuration document decoding, validation, and presets.
//!
//! This crate is intentionally IO-free: it parses and validates documents provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod validate;

pub use model::{ConfigDocumentV1, ConfigFileV1, ElementV1, PolicySpecV1, RuleSetV1};
pub use presets::{GLOBAL_DEFAULT_YAML, global_default};
pub use validate::{ConfigError, Violation, validate_document, validate_file};

use htmlguard_domain::spec::ConfigurationDocument;

/// Encodings a configuration document may arrive in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    /// Infer the encoding from a file-style identity. Unknown extensions are read as YAML.
    pub fn from_identity(identity: &str) -> Self {
        let extension = identity
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("toml") => DocumentFormat::Toml,
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parse a YAML configuration file into the raw model.
pub fn parse_config_yaml(input: &str) -> Result<ConfigFileV1, ConfigError> {
    serde_yaml::from_str(input).map_err(|e| ConfigError::Decode(e.to_string()))
}

/// Parse a TOML configuration file into the raw model.
pub fn parse_config_toml(input: &str) -> Result<ConfigFileV1, ConfigError> {
    toml::from_str(input).map_err(|e| ConfigError::Decode(e.to_string()))
}

/// Parse a JSON configuration file into the raw model.
pub fn parse_config_json(input: &str) -> Result<ConfigFileV1, ConfigError> {
    serde_json::from_str(input).map_err(|e| ConfigError::Decode(e.to_string()))
}

pub fn parse_config(input: &str, format: DocumentFormat) -> Result<ConfigFileV1, ConfigError> {
    match format {
        DocumentFormat::Yaml => parse_config_yaml(input),
        DocumentFormat::Toml => parse_config_toml(input),
        DocumentFormat::Json => parse_config_json(input),
    }
}

/// Decode and validate a document in one step.
pub fn load_document(
    input: &str,
    format: DocumentFormat,
) -> Result<ConfigurationDocument, ConfigError> {
    let file = parse_config(input, format)?;
    validate_file(&file)
}
