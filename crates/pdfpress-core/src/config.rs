// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compression run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PdfPressError, Result};
use crate::types::{PaperSize, Placement};

/// Default JPEG quality used when re-encoding extracted images.
pub const DEFAULT_QUALITY: u8 = 50;

/// Default destination for the assembled document.
pub const DEFAULT_OUTPUT_PATH: &str = "combined.pdf";

/// Settings for one compression run.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    /// JPEG quality for re-encoded images (1-100, lossy).
    pub quality: u8,
    /// Output canvas for every page.
    pub paper_size: PaperSize,
    /// How the image extent maps onto the page.
    pub placement: Placement,
    /// Turn landscape images onto landscape pages, rotating them 90 degrees.
    pub orientation_aware: bool,
    /// Compress the output document's content streams.
    pub compress_output: bool,
    /// Transcode images on a worker pool. Page order is unaffected.
    pub parallel: bool,
    /// Where the assembled document is written.
    pub output_path: PathBuf,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            paper_size: PaperSize::A4,
            placement: Placement::Swapped,
            orientation_aware: false,
            compress_output: true,
            parallel: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl CompressConfig {
    /// Parse a config from a JSON string and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Reject values the encoder or page builder cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(PdfPressError::InvalidConfig(format!(
                "quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        let (w, h) = self.paper_size.dimensions_mm();
        if w == 0 || h == 0 {
            return Err(PdfPressError::InvalidConfig(format!(
                "paper size must be non-empty, got {w}x{h} mm"
            )));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(PdfPressError::InvalidConfig(
                "output path must not be empty".into(),
            ));
        }
        Ok(())
    }
}
