//! Configuration structures for the daybook pipeline.

use serde::{Deserialize, Serialize};

use super::audit::DEFAULT_SIZE_ML;
use crate::error::{DaybookError, Result};

/// Main configuration for the daybook pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaybookConfig {
    /// PDF text layer configuration.
    pub pdf: PdfConfig,

    /// Sheet extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider the PDF as text-based.
    pub min_text_length: usize,

    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            max_pages: 10,
        }
    }
}

/// Sheet extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Bottle size used when the brand text has no volume.
    pub default_size_ml: u32,

    /// Lines with fewer numeric tokens are not table rows.
    pub min_numeric_tokens: usize,

    /// Shortest brand text accepted for a row.
    pub min_brand_len: usize,

    /// Additional lone-token OCR artifacts to ignore.
    pub extra_noise_tokens: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_size_ml: DEFAULT_SIZE_ML,
            min_numeric_tokens: 5,
            min_brand_len: 2,
            extra_noise_tokens: Vec::new(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl DaybookConfig {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the extraction rules cannot work with.
    pub fn validate(&self) -> Result<()> {
        // The narrowest column template reads five tokens.
        if self.extraction.min_numeric_tokens < 5 {
            return Err(DaybookError::Config(format!(
                "extraction.min_numeric_tokens must be at least 5, got {}",
                self.extraction.min_numeric_tokens
            )));
        }
        if self.extraction.default_size_ml == 0 {
            return Err(DaybookError::Config(
                "extraction.default_size_ml must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
