//! Reader configuration.
//!
//! Defaults match a stock FARGO3D output directory. Values can be overridden
//! from the environment or from a YAML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FargoError, Result};

/// Floating point width of snapshot values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 32-bit floats (runs compiled with `-DFLOAT`).
    Single,
    /// 64-bit floats.
    Double,
}

impl Precision {
    /// Bytes per stored value.
    pub fn size(&self) -> usize {
        match self {
            Precision::Single => 4,
            Precision::Double => 8,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "f32" | "float" => Some(Precision::Single),
            "double" | "f64" => Some(Precision::Double),
            _ => None,
        }
    }
}

/// Byte order of snapshot values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Byte order of the machine reading the files.
    #[default]
    Native,
    Little,
    Big,
}

impl ByteOrder {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "native" => Some(ByteOrder::Native),
            "little" | "le" => Some(ByteOrder::Little),
            "big" | "be" => Some(ByteOrder::Big),
            _ => None,
        }
    }
}

/// Configuration for opening a run directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Name of the run variables file.
    pub variables_file: String,

    /// Name of the summary file holding the compile options.
    pub summary_file: String,

    /// Snapshot precision. `None` follows the run's `FLOAT` option.
    pub precision: Option<Precision>,

    /// Byte order of snapshot files.
    pub byte_order: ByteOrder,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            variables_file: "variables.par".to_string(),
            summary_file: "summary0.dat".to_string(),
            precision: None,
            byte_order: ByteOrder::Native,
        }
    }
}

impl ReaderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FARGONAUT_VARIABLES_FILE") {
            config.variables_file = val;
        }

        if let Ok(val) = std::env::var("FARGONAUT_SUMMARY_FILE") {
            config.summary_file = val;
        }

        if let Ok(val) = std::env::var("FARGONAUT_PRECISION") {
            if let Some(precision) = Precision::parse(&val) {
                config.precision = Some(precision);
            }
        }

        if let Ok(val) = std::env::var("FARGONAUT_BYTE_ORDER") {
            if let Some(order) = ByteOrder::parse(&val) {
                config.byte_order = order;
            }
        }

        config
    }

    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FargoError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_yaml::from_str(&text)
            .map_err(|e| FargoError::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        for (key, name) in [
            ("variables_file", &self.variables_file),
            ("summary_file", &self.summary_file),
        ] {
            if name.trim().is_empty() {
                return Err(FargoError::Config(format!("{} must not be empty", key)));
            }
            if name.contains('/') || name.contains('\\') {
                return Err(FargoError::Config(format!(
                    "{} must be a file name inside the run directory, got '{}'",
                    key, name
                )));
            }
        }
        Ok(())
    }
}
