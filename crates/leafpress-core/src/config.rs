// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LeafpressError, Result};

/// Settings that stay fixed across exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Longest edge, in pixels, of the raster embedded for each image.
    pub max_dimension_px: u32,
    /// JPEG re-encoding quality in (0, 1].
    pub jpeg_quality: f32,
    /// Margin used when a policy does not specify one.
    pub default_margin_mm: f64,
    /// Prefix of the suggested output filename (`<prefix>_<millis>.pdf`).
    pub filename_prefix: String,
    /// Title written into the PDF metadata.
    pub document_title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_dimension_px: 1600,
            jpeg_quality: 0.92,
            default_margin_mm: 10.0,
            filename_prefix: "leafpress".into(),
            document_title: "Leafpress Document".into(),
        }
    }
}

impl ExportConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_dimension_px == 0 {
            return Err(LeafpressError::Validation(
                "max_dimension_px must be greater than zero".into(),
            ));
        }
        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            return Err(LeafpressError::Validation(format!(
                "jpeg_quality must be in (0, 1], got {}",
                self.jpeg_quality
            )));
        }
        if !self.default_margin_mm.is_finite() || self.default_margin_mm <= 0.0 {
            return Err(LeafpressError::Validation(format!(
                "default_margin_mm must be positive, got {}",
                self.default_margin_mm
            )));
        }
        if self.filename_prefix.trim().is_empty() {
            return Err(LeafpressError::Validation(
                "filename_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }
}
