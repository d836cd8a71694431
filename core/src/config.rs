use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};

/// Bounded 2D region accounts are placed in, inset by `margin` on every side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub width:  f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self { width: 960.0, height: 600.0, margin: 40.0 }
    }
}

impl Layout {
    pub fn validate(&self) -> DeskResult<()> {
        let usable = |extent: f64| extent.is_finite() && extent - 2.0 * self.margin > 0.0;
        if !self.margin.is_finite() || self.margin < 0.0 || !usable(self.width) || !usable(self.height) {
            return Err(DeskError::InvalidLayout {
                width: self.width,
                height: self.height,
                margin: self.margin,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    pub account_count:     usize,
    pub transaction_count: usize,
    pub layout:            Layout,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            account_count: 120,
            transaction_count: 900,
            layout: Layout::default(),
        }
    }
}

impl GeneratorParams {
    pub fn new(account_count: usize, transaction_count: usize) -> Self {
        Self {
            account_count,
            transaction_count,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DeskResult<()> {
        if self.account_count == 0 {
            return Err(DeskError::InvalidAccountCount { count: 0 });
        }
        // from != to needs a second account to redirect to.
        if self.account_count == 1 && self.transaction_count > 0 {
            return Err(DeskError::UnsatisfiableTransfers {
                accounts: self.account_count,
                transactions: self.transaction_count,
            });
        }
        self.layout.validate()
    }
}

/// Top-level session configuration, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub seed:        u64,
    pub generator:   GeneratorParams,
    pub sensitivity: f64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            generator: GeneratorParams::default(),
            sensitivity: 1.0,
        }
    }
}

impl DeskConfig {
    /// Load and validate a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> DeskResult<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config: DeskConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> DeskResult<()> {
        self.generator.validate()?;
        validate_sensitivity(self.sensitivity)
    }
}

pub fn validate_sensitivity(value: f64) -> DeskResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DeskError::InvalidSensitivity { value })
    }
}
