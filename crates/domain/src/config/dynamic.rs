use serde::Deserialize;

use super::errors::ConfigError;
use crate::dns_name;

/// Settings for synthesized A answers.
///
/// A query for `{pattern}{N}.anything` of type A is answered with
/// `{network_prefix}.{N}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DynamicConfig {
    #[serde(default = "default_pattern")]
    pub pattern: String,

    #[serde(default = "default_network_prefix")]
    pub network_prefix: String,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            network_prefix: default_network_prefix(),
        }
    }
}

impl DynamicConfig {
    pub fn new(pattern: impl Into<String>, network_prefix: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            network_prefix: network_prefix.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        dns_name::validate_label(&self.pattern, &self.pattern).map_err(|e| {
            ConfigError::Validation(format!("Invalid dynamic pattern '{}': {}", self.pattern, e))
        })?;

        let octets: Vec<&str> = self.network_prefix.split('.').collect();
        let valid = octets.len() == 3
            && octets.iter().all(|o| {
                !o.is_empty() && o.bytes().all(|b| b.is_ascii_digit()) && o.parse::<u8>().is_ok()
            });
        if !valid {
            return Err(ConfigError::Validation(format!(
                "Invalid network prefix '{}': expected three dotted octets (e.g. 172.0.2)",
                self.network_prefix
            )));
        }

        Ok(())
    }
}

fn default_pattern() -> String {
    "workstation".to_string()
}

fn default_network_prefix() -> String {
    "172.0.2".to_string()
}
