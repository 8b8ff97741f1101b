use serde::{Deserialize, Serialize};
use std::path::Path;

use verbatim_http::ParseOptions;

use crate::error::HarnessError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HarnessConfig {
    pub parse: ParseOptions,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    pub echo_message: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { echo_message: true }
    }
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, HarnessError> {
        toml::from_str(raw).map_err(|err| HarnessError::Config(err.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, HarnessError> {
        toml::to_string_pretty(self).map_err(|err| HarnessError::Config(err.to_string()))
    }
}
