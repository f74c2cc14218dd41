// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for pdfpress.

use thiserror::Error;

/// Top-level error type for all pdfpress operations.
///
/// Only fatal conditions live here. A single image that fails to decode or
/// re-encode is reported as a per-item failure value by the transcoder and
/// never surfaces as a `PdfPressError`.
#[derive(Debug, Error)]
pub enum PdfPressError {
    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PdfPressError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Exhaustive over the variants, so a new one must be given a message here.
    fn prefix(err: &PdfPressError) -> &'static str {
        match err {
            PdfPressError::PdfError(_) => "PDF operation failed",
            PdfPressError::InvalidConfig(_) => "invalid configuration",
            PdfPressError::Io(_) => "file I/O error",
            PdfPressError::Serialization(_) => "serialization error",
        }
    }

    #[test]
    fn messages_carry_their_category() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = [
            PdfPressError::PdfError("bad xref".into()),
            PdfPressError::InvalidConfig("quality 0".into()),
            PdfPressError::Io(std::io::Error::other("disk full")),
            PdfPressError::Serialization(json),
        ];
        for err in &errors {
            assert!(err.to_string().starts_with(prefix(err)), "{err}");
        }
    }
}
