//! Configuration loading (config.toml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::TimeUnit;
use crate::projections::AnalysisParams;
use crate::sample::SAMPLE_ACTIVITIES;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub sample: SampleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default = "default_reference_sequence")]
    pub reference_sequence: Vec<String>,
    #[serde(default = "default_top_variants")]
    pub top_variants: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_unit: TimeUnit::default(),
            reference_sequence: default_reference_sequence(),
            top_variants: default_top_variants(),
        }
    }
}

impl AnalysisConfig {
    pub fn params(&self) -> AnalysisParams {
        AnalysisParams {
            time_unit: self.time_unit,
            reference_sequence: self.reference_sequence.clone(),
        }
    }
}

fn default_reference_sequence() -> Vec<String> {
    SAMPLE_ACTIVITIES.iter().map(|s| s.to_string()).collect()
}

fn default_top_variants() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SampleConfig {
    #[serde(default = "default_sample_cases")]
    pub cases: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            cases: default_sample_cases(),
        }
    }
}

fn default_sample_cases() -> usize {
    5
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.analysis.reference_sequence.is_empty() {
        anyhow::bail!("analysis.reference_sequence in {:?} must not be empty", path);
    }

    Ok(config)
}
