// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfpress-document — Shrink a scanned PDF by recompressing its images.
//
// Locates embedded image streams with a byte-pattern heuristic, re-encodes
// each one as a lower quality JPEG, and lays the results out one per page in
// a fresh document. Also provides a page inspector for input documents.

pub mod image;
pub mod locate;
pub mod pdf;
pub mod pipeline;
pub mod report;

// Re-export the primary structs so callers can use `pdfpress_document::Compressor` etc.
pub use crate::image::transcoder::{
    FailureStage, JpegColor, RecompressedImage, TranscodeBatch, TranscodeFailure, Transcoder,
};
pub use locate::{ImageRegion, PatternRegionFinder, RegionFinder};
pub use pdf::assembler::{PageAssembler, PageGeometry, PageLayout, SealedDocument};
pub use pdf::inspect::{LopdfInspector, PageInfo, PageInspector};
pub use pipeline::{CompressionOutcome, CompressionReport, Compressor};
pub use report::SizeReport;
