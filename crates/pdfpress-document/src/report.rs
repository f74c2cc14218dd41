// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File size comparison between the input and the assembled output.

use std::fmt;
use std::path::Path;

use pdfpress_core::error::Result;

/// Byte sizes of the input and output documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl SizeReport {
    pub fn new(input_bytes: u64, output_bytes: u64) -> Self {
        Self {
            input_bytes,
            output_bytes,
        }
    }

    /// Read both sizes from file metadata.
    pub fn from_paths(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Self> {
        let input_bytes = std::fs::metadata(input.as_ref())?.len();
        let output_bytes = std::fs::metadata(output.as_ref())?.len();
        Ok(Self::new(input_bytes, output_bytes))
    }

    /// Signed size change as a percentage of the input size.
    ///
    /// `None` for an empty input, where the ratio is undefined.
    pub fn percent_delta(&self) -> Option<f64> {
        if self.input_bytes == 0 {
            return None;
        }
        let input = self.input_bytes as f64;
        Some((self.output_bytes as f64 - input) / input * 100.0)
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input PDF size: {} bytes", self.input_bytes)?;
        writeln!(f, "Output PDF size: {} bytes", self.output_bytes)?;
        match self.percent_delta() {
            Some(delta) => write!(f, "Percentage difference in file size: {delta:.2}%"),
            None => write!(f, "Percentage difference in file size: n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_is_negative() {
        let report = SizeReport::new(2000, 500);
        assert_eq!(report.percent_delta(), Some(-75.0));
    }

    #[test]
    fn growing_is_positive() {
        let report = SizeReport::new(300, 400);
        let delta = report.percent_delta().unwrap();
        assert!((delta - 33.333).abs() < 0.001);
    }

    #[test]
    fn empty_input_has_no_ratio() {
        assert_eq!(SizeReport::new(0, 10).percent_delta(), None);
        assert!(SizeReport::new(0, 10).to_string().ends_with("n/a"));
    }

    #[test]
    fn display_uses_two_decimals() {
        let text = SizeReport::new(3, 2).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Input PDF size: 3 bytes",
                "Output PDF size: 2 bytes",
                "Percentage difference in file size: -33.33%",
            ]
        );
    }

    #[test]
    fn reads_sizes_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        let output = dir.path().join("out.pdf");
        std::fs::write(&input, vec![0u8; 1000]).unwrap();
        std::fs::write(&output, vec![0u8; 250]).unwrap();

        let report = SizeReport::from_paths(&input, &output).unwrap();
        assert_eq!(report, SizeReport::new(1000, 250));
    }
}
