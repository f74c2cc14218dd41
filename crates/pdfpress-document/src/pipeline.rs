// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compression pipeline — locate image streams, recompress them, and lay them
// out one per page.
//
// raw bytes -> RegionFinder -> Transcoder -> PageAssembler -> sealed PDF
//
// Reading the input and sealing the output are fatal on failure. A region
// that cannot be transcoded is only reported.

use std::path::{Path, PathBuf};

use pdfpress_core::CompressConfig;
use pdfpress_core::error::{PdfPressError, Result};
use tracing::{info, instrument};

use crate::image::{TranscodeFailure, Transcoder};
use crate::locate::{PatternRegionFinder, RegionFinder};
use crate::pdf::assembler::{PageAssembler, PageLayout};
use crate::report::SizeReport;

/// Result of compressing an in-memory document.
#[derive(Debug)]
pub struct CompressionOutcome {
    /// The sealed output document.
    pub pdf: Vec<u8>,
    pub regions_found: usize,
    pub pages_written: usize,
    /// Regions left out of the output, in region order.
    pub failures: Vec<TranscodeFailure>,
}

/// Result of compressing a file on disk.
#[derive(Debug)]
pub struct CompressionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub regions_found: usize,
    pub pages_written: usize,
    pub failures: Vec<TranscodeFailure>,
    pub size: SizeReport,
}

/// Runs the locate -> transcode -> assemble pipeline with one configuration.
pub struct Compressor<F = PatternRegionFinder> {
    config: CompressConfig,
    finder: F,
}

impl Compressor<PatternRegionFinder> {
    /// Create a compressor using the byte-pattern region finder.
    pub fn new(config: CompressConfig) -> Result<Self> {
        Self::with_finder(config, PatternRegionFinder)
    }
}

impl<F: RegionFinder> Compressor<F> {
    /// Create a compressor with a custom region finder.
    pub fn with_finder(config: CompressConfig, finder: F) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, finder })
    }

    pub fn config(&self) -> &CompressConfig {
        &self.config
    }

    /// Compress a document held in memory.
    #[instrument(skip_all, fields(input_len = input.len()))]
    pub fn compress_bytes(&self, input: &[u8]) -> Result<CompressionOutcome> {
        let (assembler, regions_found, failures) = self.assemble(input)?;
        let pages_written = assembler.page_count();
        let pdf = assembler.seal_to_vec()?;

        Ok(CompressionOutcome {
            pdf,
            regions_found,
            pages_written,
            failures,
        })
    }

    /// Compress `input` into `output` and compare their sizes.
    ///
    /// An unreadable input aborts before anything is written. A failed write
    /// aborts before the size comparison.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
    pub fn compress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CompressionReport> {
        let input = input.as_ref();
        let output = output.as_ref();

        let data = std::fs::read(input).map_err(|err| {
            PdfPressError::Io(std::io::Error::new(
                err.kind(),
                format!("failed to read {}: {err}", input.display()),
            ))
        })?;

        let (assembler, regions_found, failures) = self.assemble(&data)?;
        let sealed = assembler.seal(output)?;
        let size = SizeReport::from_paths(input, output)?;

        info!(
            regions_found,
            pages = sealed.pages,
            failed = failures.len(),
            delta = ?size.percent_delta(),
            "Compression complete"
        );

        Ok(CompressionReport {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            regions_found,
            pages_written: sealed.pages,
            failures,
            size,
        })
    }

    fn assemble(&self, input: &[u8]) -> Result<(PageAssembler, usize, Vec<TranscodeFailure>)> {
        let regions = self.finder.find_regions(input);
        info!(regions = regions.len(), "Located image streams");

        let transcoder = Transcoder::new(self.config.quality).with_parallel(self.config.parallel);
        let (payloads, failures) = transcoder.transcode_all(&regions).into_parts();

        let mut assembler = PageAssembler::new(PageLayout::from(&self.config));
        for payload in &payloads {
            assembler.append(payload)?;
        }

        Ok((assembler, regions.len(), failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::ImageRegion;

    /// Treats the whole document as a single region.
    struct WholeBuffer;

    impl RegionFinder for WholeBuffer {
        fn find_regions<'a>(&self, document: &'a [u8]) -> Vec<ImageRegion<'a>> {
            vec![ImageRegion {
                index: 1,
                offset: 0,
                bytes: document,
            }]
        }
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = CompressConfig {
            quality: 0,
            ..CompressConfig::default()
        };
        assert!(matches!(
            Compressor::new(config),
            Err(PdfPressError::InvalidConfig(_))
        ));
    }

    #[test]
    fn input_without_images_gives_empty_document() {
        let outcome = Compressor::new(CompressConfig::default())
            .unwrap()
            .compress_bytes(b"%PDF-1.4\n%%EOF\n")
            .unwrap();
        assert_eq!(outcome.regions_found, 0);
        assert_eq!(outcome.pages_written, 0);
        assert!(outcome.failures.is_empty());
        assert!(outcome.pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn custom_finder_is_used() {
        let outcome = Compressor::with_finder(CompressConfig::default(), WholeBuffer)
            .unwrap()
            .compress_bytes(b"not an image")
            .unwrap();
        assert_eq!(outcome.regions_found, 1);
        assert_eq!(outcome.pages_written, 0);
        assert_eq!(outcome.failures[0].index(), 1);
    }

    #[test]
    fn missing_input_is_fatal_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");
        let err = Compressor::new(CompressConfig::default())
            .unwrap()
            .compress_file(dir.path().join("missing.pdf"), &output)
            .unwrap_err();
        assert!(matches!(err, PdfPressError::Io(_)));
        assert!(!output.exists());
    }
}
