//! Tool configuration module.
//!
//! Handles loading and validating `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` placed in the input folder, next to
//! the images it applies to.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [assemble]
//! overlap = 0.45      # Fraction of the previous image's width to overlap
//! min_height = 200    # Floor for the common strip height in px
//!
//! [background]
//! fuzz = 50.0         # Flood-fill color tolerance in percent
//! border = 5          # Frame in px added around the image before filling
//!
//! [processing]
//! max_processes = 4   # Max parallel decoders (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the input folder.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Upper bound for `background.border`, in px.
pub const MAX_BORDER: u32 = 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Strip layout settings (pass 3).
    pub assemble: AssembleConfig,
    /// Background removal settings (pass 1).
    pub background: BackgroundConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let overlap = self.assemble.overlap;
        if !(overlap > -1.0 && overlap < 1.0) {
            return Err(ConfigError::Validation(
                "assemble.overlap must be between -1 and 1 (exclusive)".into(),
            ));
        }
        if self.assemble.min_height == 0 {
            return Err(ConfigError::Validation(
                "assemble.min_height must be non-zero".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.background.fuzz) {
            return Err(ConfigError::Validation(
                "background.fuzz must be 0-100".into(),
            ));
        }
        if self.background.border > MAX_BORDER {
            return Err(ConfigError::Validation(format!(
                "background.border must be at most {MAX_BORDER}"
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Strip layout settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssembleConfig {
    /// Each image overlaps the previous one by this fraction of the previous
    /// image's scaled width. Negative values leave gaps.
    pub overlap: f64,
    /// The strip is as tall as the shortest image, but never shorter than this.
    pub min_height: u32,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            overlap: 0.45,
            min_height: 200,
        }
    }
}

/// Background removal settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    /// Color tolerance in percent of the maximum RGBA distance.
    pub fuzz: f64,
    /// Width of the corner-colored frame added before the fill. 0 disables it.
    pub border: u32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            fuzz: 50.0,
            border: 5,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel decoders for the assemble pass.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load config from `config.toml` in the given directory.
///
/// Returns stock defaults when the file is absent. Omitted keys keep their
/// defaults, unknown keys are rejected, and the result is validated.
pub fn load_config(dir: &Path) -> Result<ToolConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(ToolConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: ToolConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# spritestrip configuration
# ========================
#
# Place this file in the input folder as config.toml.
# Every key is optional; omitted keys keep the values shown here.

[assemble]
# Each image overlaps the previous one by this fraction of the previous
# image's scaled width. Must lie between -1 and 1 (exclusive). Negative
# values leave gaps.
overlap = 0.45
# The strip is as tall as the shortest input image, but never shorter
# than this many pixels.
min_height = 200

[background]
# Flood-fill color tolerance, in percent of the maximum color distance.
fuzz = 50.0
# Frame (px) of the corner color added before the fill so that it can
# reach background touching any edge. 0 fills from the corner only.
# At most 1024.
border = 5

[processing]
# Maximum number of images decoded in parallel by the assemble pass.
# Omit to use all CPU cores. Larger values are clamped to the core count.
# max_processes = 4
"##
}
