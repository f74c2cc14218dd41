// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfpress — recompress the images of a scanned PDF into a smaller one.
//
// Entry point. Parses arguments, initialises logging, runs the compression
// pipeline or the page inspector, and prints the console report.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use pdfpress_core::{CompressConfig, PaperSize, Placement};
use pdfpress_document::{CompressionReport, Compressor, LopdfInspector, PageInspector};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pdfpress",
    version,
    about = "Shrink a scanned PDF by recompressing its embedded images",
    long_about = None
)]
struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, recompress, and reassemble the images of a PDF.
    Compress(CompressArgs),
    /// Print the size and orientation of every page in a PDF.
    Inspect {
        /// PDF to inspect.
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// PDF to compress.
    input: PathBuf,

    /// Where to write the result [default: combined.pdf].
    #[arg(short, long, env = "PDFPRESS_OUTPUT")]
    output: Option<PathBuf>,

    /// JPEG quality for recompressed images (1-100) [default: 50].
    #[arg(short, long, env = "PDFPRESS_QUALITY",
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Output page size: a4, a3, a5, letter, legal, or WIDTHxHEIGHT in mm.
    #[arg(long, value_parser = parse_paper)]
    paper: Option<PaperSize>,

    /// Image extent on the page: swapped (legacy) or nominal (full-bleed).
    #[arg(long, value_parser = parse_placement)]
    placement: Option<Placement>,

    /// Put landscape images on landscape pages, rotated 90 degrees.
    #[arg(long)]
    orientation_aware: bool,

    /// Leave the output's content streams uncompressed.
    #[arg(long)]
    no_compress: bool,

    /// Recompress images in parallel.
    #[arg(long)]
    parallel: bool,

    /// JSON config file; command-line flags override its values.
    #[arg(long, env = "PDFPRESS_CONFIG")]
    config: Option<PathBuf>,
}

fn parse_paper(s: &str) -> std::result::Result<PaperSize, String> {
    s.parse().map_err(|err: pdfpress_core::PdfPressError| err.to_string())
}

fn parse_placement(s: &str) -> std::result::Result<Placement, String> {
    s.parse().map_err(|err: pdfpress_core::PdfPressError| err.to_string())
}

impl CompressArgs {
    /// Load the config file (if any) and apply command-line overrides.
    fn resolve_config(&self) -> Result<CompressConfig> {
        let mut config = match &self.config {
            Some(path) => CompressConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => CompressConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(paper) = self.paper {
            config.paper_size = paper;
        }
        if let Some(placement) = self.placement {
            config.placement = placement;
        }
        if self.orientation_aware {
            config.orientation_aware = true;
        }
        if self.no_compress {
            config.compress_output = false;
        }
        if self.parallel {
            config.parallel = true;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Compress(args) => run_compress(&args),
        Command::Inspect { input } => run_inspect(&input),
    }
}

fn run_compress(args: &CompressArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let output = config.output_path.clone();
    tracing::info!(input = %args.input.display(), output = %output.display(), "pdfpress starting");

    let compressor = Compressor::new(config).context("invalid configuration")?;
    let report = compressor
        .compress_file(&args.input, &output)
        .with_context(|| format!("failed to compress {}", args.input.display()))?;

    write_report(&mut io::stdout().lock(), &report).context("failed to print report")
}

/// Console report: one line per skipped image in region order, then the
/// success line, then the size comparison.
fn write_report(out: &mut impl Write, report: &CompressionReport) -> io::Result<()> {
    for failure in &report.failures {
        writeln!(out, "{failure}")?;
    }
    writeln!(out, "PDF created successfully: {}", report.output_path.display())?;
    writeln!(out, "{}", report.size)?;
    out.flush()
}

fn run_inspect(input: &Path) -> Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let pages = LopdfInspector
        .inspect(&data)
        .with_context(|| format!("failed to inspect {}", input.display()))?;

    for page in pages {
        println!("{page}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfpress_document::{SizeReport, TranscodeFailure};

    fn parse(args: &[&str]) -> CompressArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Compress(args) => args,
            other => panic!("expected compress, got {other:?}"),
        }
    }

    #[test]
    fn defaults_follow_config_defaults() {
        let args = parse(&["pdfpress", "compress", "scan.pdf"]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config, CompressConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&[
            "pdfpress",
            "compress",
            "scan.pdf",
            "-o",
            "small.pdf",
            "-q",
            "35",
            "--paper",
            "letter",
            "--placement",
            "nominal",
            "--orientation-aware",
            "--no-compress",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.output_path, PathBuf::from("small.pdf"));
        assert_eq!(config.quality, 35);
        assert_eq!(config.paper_size, PaperSize::Letter);
        assert_eq!(config.placement, Placement::Nominal);
        assert!(config.orientation_aware);
        assert!(!config.compress_output);
    }

    #[test]
    fn quality_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["pdfpress", "compress", "a.pdf", "-q", "0"]).is_err());
        assert!(Cli::try_parse_from(["pdfpress", "compress", "a.pdf", "-q", "101"]).is_err());
    }

    #[test]
    fn report_lists_failures_before_success_line() {
        let report = CompressionReport {
            input_path: PathBuf::from("scan.pdf"),
            output_path: PathBuf::from("combined.pdf"),
            regions_found: 3,
            pages_written: 1,
            failures: vec![
                TranscodeFailure::Decode {
                    index: 1,
                    reason: "bad header".into(),
                },
                TranscodeFailure::Encode {
                    index: 3,
                    reason: "too wide".into(),
                },
            ],
            size: SizeReport::new(1000, 500),
        };

        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Failed to decode image 1: bad header",
                "Failed to encode and compress image 3: too wide",
                "PDF created successfully: combined.pdf",
                "Input PDF size: 1000 bytes",
                "Output PDF size: 500 bytes",
                "Percentage difference in file size: -50.00%",
            ]
        );
    }

    #[test]
    fn inspect_takes_a_path() {
        let cli = Cli::try_parse_from(["pdfpress", "inspect", "scan.pdf", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Command::Inspect { .. }));
    }
}
