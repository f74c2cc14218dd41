// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image transcoder — decode each located region and re-encode it as a lower
// quality JPEG using the `image` crate.
//
// A region that fails to decode or re-encode is a per-item failure: it is
// logged, reported with its 1-based index, and left out of the output. The
// run itself carries on with the remaining regions.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use pdfpress_core::config::DEFAULT_QUALITY;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::locate::ImageRegion;

/// Colour model of a re-encoded JPEG, mapped to a PDF device colour space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColor {
    Gray,
    Rgb,
}

impl JpegColor {
    /// PDF `/ColorSpace` name for this colour model.
    pub fn pdf_color_space(&self) -> &'static str {
        match self {
            Self::Gray => "DeviceGray",
            Self::Rgb => "DeviceRGB",
        }
    }
}

/// A freshly encoded JPEG payload ready to be placed on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecompressedImage {
    /// Index of the region this payload came from (diagnostics only).
    pub source_index: usize,
    pub width: u32,
    pub height: u32,
    pub color: JpegColor,
    /// Baseline JPEG bytes.
    pub data: Vec<u8>,
}

impl RecompressedImage {
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Which half of the transcode step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Decode,
    Encode,
}

/// A single region that could not be transcoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeFailure {
    #[error("Failed to decode image {index}: {reason}")]
    Decode { index: usize, reason: String },

    #[error("Failed to encode and compress image {index}: {reason}")]
    Encode { index: usize, reason: String },
}

impl TranscodeFailure {
    /// 1-based index of the failed region.
    pub fn index(&self) -> usize {
        match self {
            Self::Decode { index, .. } | Self::Encode { index, .. } => *index,
        }
    }

    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Decode { .. } => FailureStage::Decode,
            Self::Encode { .. } => FailureStage::Encode,
        }
    }
}

/// Per-region results of a transcode pass, in region order.
#[derive(Debug, Default)]
pub struct TranscodeBatch {
    outcomes: Vec<Result<RecompressedImage, TranscodeFailure>>,
}

impl TranscodeBatch {
    /// Number of regions attempted.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Successful payloads, in the order their regions appeared.
    pub fn payloads(&self) -> impl Iterator<Item = &RecompressedImage> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TranscodeFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// Split into payloads and failures, both order-preserving.
    pub fn into_parts(self) -> (Vec<RecompressedImage>, Vec<TranscodeFailure>) {
        let mut payloads = Vec::new();
        let mut failures = Vec::new();
        for outcome in self.outcomes {
            match outcome {
                Ok(image) => payloads.push(image),
                Err(failure) => failures.push(failure),
            }
        }
        (payloads, failures)
    }
}

/// Decodes image regions and re-encodes them as JPEG at a fixed quality.
#[derive(Debug, Clone, Copy)]
pub struct Transcoder {
    quality: u8,
    parallel: bool,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY)
    }
}

impl Transcoder {
    /// Create a sequential transcoder. `quality` is clamped to 1-100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            parallel: false,
        }
    }

    /// Spread decode/encode across the rayon pool. Results keep region order.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Decode one region and re-encode it. Attempted exactly once.
    #[instrument(skip(self, region), fields(index = region.index, region_len = region.len()))]
    pub fn transcode(&self, region: &ImageRegion<'_>) -> Result<RecompressedImage, TranscodeFailure> {
        let decoded = decode_region(region.bytes).map_err(|reason| TranscodeFailure::Decode {
            index: region.index,
            reason,
        })?;

        let (width, height) = (decoded.width(), decoded.height());
        let (color, data) =
            encode_jpeg(&decoded, self.quality).map_err(|reason| TranscodeFailure::Encode {
                index: region.index,
                reason,
            })?;

        debug!(
            width,
            height,
            before = region.len(),
            after = data.len(),
            "Image recompressed"
        );

        Ok(RecompressedImage {
            source_index: region.index,
            width,
            height,
            color,
            data,
        })
    }

    /// Transcode every region, recording a result for each one.
    #[instrument(skip_all, fields(regions = regions.len(), quality = self.quality, parallel = self.parallel))]
    pub fn transcode_all(&self, regions: &[ImageRegion<'_>]) -> TranscodeBatch {
        let outcomes: Vec<_> = if self.parallel {
            // Indexed collect keeps the input ordering.
            regions.par_iter().map(|r| self.transcode(r)).collect()
        } else {
            regions.iter().map(|r| self.transcode(r)).collect()
        };

        for failure in outcomes.iter().filter_map(|o| o.as_ref().err()) {
            warn!(index = failure.index(), stage = ?failure.stage(), "{failure}");
        }

        let batch = TranscodeBatch { outcomes };
        info!(
            attempted = batch.len(),
            succeeded = batch.payloads().count(),
            "Transcode pass complete"
        );
        batch
    }
}

/// Decode with format auto-detection from the magic bytes.
fn decode_region(bytes: &[u8]) -> Result<DynamicImage, String> {
    let format = image::guess_format(bytes).map_err(|err| err.to_string())?;
    if format != ImageFormat::Jpeg {
        debug!(?format, "Region is not JPEG, decoding anyway");
    }
    image::load_from_memory_with_format(bytes, format).map_err(|err| err.to_string())
}

/// Encode as baseline JPEG. Grayscale stays single-channel; alpha is dropped.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<(JpegColor, Vec<u8>), String> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    let color = if image.color().has_color() {
        image
            .to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|err| err.to_string())?;
        JpegColor::Rgb
    } else {
        image
            .to_luma8()
            .write_with_encoder(encoder)
            .map_err(|err| err.to_string())?;
        JpegColor::Gray
    };
    Ok((color, buffer))
}
