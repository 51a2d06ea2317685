use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

use crate::{
    algorithms::{HsvRange, HsvSegmenter, Smoothing, Thresholds},
    error::{FingerError, Result},
    types::Palette,
};

/// Everything a frame needs besides its pixels: the HSV box that produces the
/// mask, the finger-valley limits and the annotation colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FingerConfig {
    pub hsv: HsvRange,
    /// Applied to the frame before HSV thresholding
    pub smoothing: Smoothing,
    pub thresholds: Thresholds,
    pub palette: Palette,
}

impl Default for FingerConfig {
    fn default() -> Self {
        Self {
            hsv: HsvRange::default(),
            smoothing: Smoothing::default(),
            thresholds: Thresholds::default(),
            palette: Palette::default(),
        }
    }
}

impl FingerConfig {
    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FingerConfig)
    }

    pub fn segmenter(&self) -> HsvSegmenter {
        HsvSegmenter {
            range: self.hsv,
            smoothing: self.smoothing,
        }
    }

    /// Reject values that would make the pipeline meaningless
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.smoothing.validate()?;
        if (0..3).any(|c| self.hsv.lower[c] > self.hsv.upper[c]) {
            return Err(FingerError::InvalidConfig(format!(
                "hsv.lower {:?} exceeds hsv.upper {:?}",
                self.hsv.lower, self.hsv.upper
            )));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: FingerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: FingerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            other => Err(FingerError::UnsupportedConfigFormat(other.unwrap_or_default().to_string())),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save configuration, picking the format from the extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            other => return Err(FingerError::UnsupportedConfigFormat(other.unwrap_or_default().to_string())),
        };
        fs::write(path_ref, content)?;
        Ok(())
    }
}
