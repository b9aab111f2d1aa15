//! Serializable batch configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use stocklab_core::engine::{EngineConfig, EngineConfigError};
use stocklab_core::template::{StrategyTemplate, TemplateError};

use crate::catalog::CatalogFilter;

/// Unique identifier for a batch run (content-addressable hash).
pub type RunId = String;

/// Configuration errors, all rejected before batch execution starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("engine config error: {0}")]
    Engine(#[from] EngineConfigError),
    #[error("result limit must be at least 1")]
    ZeroLimit,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Template selection: a built-in by name, or a fully inline policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateConfig {
    Named { name: String },
    Inline(StrategyTemplate),
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TemplateConfig::Named {
            name: "weekly-90".into(),
        }
    }
}

fn default_limit() -> usize {
    500
}

fn default_parallel() -> bool {
    true
}

/// Serializable configuration for a single batch run.
///
/// Captures everything needed to reproduce a run against the same catalog
/// snapshot: template, filter, result limit, and engine constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub filter: CatalogFilter,

    /// Maximum number of items in the final ranked list.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Evaluate SKUs on the rayon pool; set false for sequential runs.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            template: TemplateConfig::default(),
            filter: CatalogFilter::default(),
            limit: default_limit(),
            parallel: default_parallel(),
            engine: EngineConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Load from a TOML file.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Resolve the configured template to a concrete, validated policy.
    pub fn resolve_template(&self) -> Result<StrategyTemplate, ConfigError> {
        let template = match &self.template {
            TemplateConfig::Named { name } => StrategyTemplate::builtin(name)
                .ok_or_else(|| ConfigError::UnknownTemplate(name.clone()))?,
            TemplateConfig::Inline(t) => t.clone(),
        };
        template.validate()?;
        Ok(template)
    }

    /// Fail-fast validation, called before any evaluation starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        self.resolve_template()?;
        self.engine.validate()?;
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two runs with identical configs share a RunId, so reports over the
    /// same catalog snapshot are recognizably the same run.
    pub fn run_id(&self) -> RunId {
        // BatchConfig always serializes: it contains only plain data.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
