//! Configuration system for the triage service
//!
//! Configuration is loaded from a TOML file. Credentials are never stored
//! in the file itself: the `[llm]` section names an environment variable
//! and the key is resolved from the process environment at runtime.

use crate::triage::Specialty;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Main service configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriageConfig {
    pub service: ServiceSection,
    pub llm: LlmSection,
    #[serde(default)]
    pub routing: RoutingSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub integrations: IntegrationsSection,
}

/// Service identity section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSection {
    /// Service identifier (must match [a-zA-Z0-9._-]+)
    pub id: String,
    /// Description of what this service does
    pub description: String,
}

/// LLM section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSection {
    /// Provider name (currently "gemini")
    pub provider: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Sampling temperature for responder calls (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Routing section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingSection {
    /// Specialty substituted when classification output is unrecognized
    #[serde(default = "default_specialty_label")]
    pub default_specialty: String,
    /// Temperature for classification calls (default: 0.1 for consistency)
    #[serde(default = "default_routing_temperature")]
    pub temperature: f32,
}

impl Default for RoutingSection {
    fn default() -> Self {
        Self {
            default_specialty: default_specialty_label(),
            temperature: default_routing_temperature(),
        }
    }
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Listen port for the HTTP adapter
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Downstream system endpoints. Reserved: none of these are called yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrationsSection {
    #[serde(default = "default_core_banking_url")]
    pub core_banking_url: String,
    #[serde(default = "default_document_storage_url")]
    pub document_storage_url: String,
    #[serde(default = "default_compliance_url")]
    pub compliance_url: String,
}

impl Default for IntegrationsSection {
    fn default() -> Self {
        Self {
            core_banking_url: default_core_banking_url(),
            document_storage_url: default_document_storage_url(),
            compliance_url: default_compliance_url(),
        }
    }
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_specialty_label() -> String {
    "customer_service".to_string()
}

fn default_routing_temperature() -> f32 {
    0.1
}

fn default_port() -> u16 {
    8080
}

fn default_core_banking_url() -> String {
    "https://mock-core-banking.api".to_string()
}

fn default_document_storage_url() -> String {
    "https://mock-docs.api".to_string()
}

fn default_compliance_url() -> String {
    "https://mock-compliance.api".to_string()
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid service ID format: {0}")]
    InvalidServiceId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TriageConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: TriageConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field-level constraints that TOML parsing cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_service_id(&self.service.id)?;

        if Specialty::parse_label(&self.routing.default_specialty).is_none() {
            return Err(ConfigError::InvalidConfig(format!(
                "Unknown default specialty '{}'",
                self.routing.default_specialty
            )));
        }

        if self.llm.provider != "gemini" {
            return Err(ConfigError::InvalidConfig(format!(
                "Unsupported LLM provider '{}'",
                self.llm.provider
            )));
        }

        Ok(())
    }

    /// The fallback specialty as a parsed enum value
    ///
    /// Safe after validate(): the label is checked at load time.
    pub fn default_specialty(&self) -> Specialty {
        Specialty::parse_label(&self.routing.default_specialty)
            .unwrap_or(Specialty::CustomerService)
    }

    /// Resolve the LLM API key from the configured environment variable
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.llm.api_key_env)
            .map_err(|_| ConfigError::EnvVarNotFound(self.llm.api_key_env.clone()))
    }

    /// Create a test configuration for unit testing
    #[cfg(test)]
    pub fn test_config() -> Self {
        let toml_content = r#"
[service]
id = "triage-test"
description = "A test triage service"

[llm]
provider = "gemini"
model = "gemini-1.5-pro"
api_key_env = "GOOGLE_API_KEY"
temperature = 0.1
max_tokens = 1024
"#;
        toml::from_str(toml_content).expect("Test config should parse")
    }
}

/// Validate service ID format
fn validate_service_id(service_id: &str) -> Result<(), ConfigError> {
    let valid_chars = service_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if service_id.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidServiceId(format!(
            "Service ID '{service_id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}
