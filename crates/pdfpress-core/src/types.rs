// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for page geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PdfPressError;

/// PostScript points per millimetre.
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Portrait dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        (mm_to_pt(w_mm as f32), mm_to_pt(h_mm as f32))
    }
}

impl FromStr for PaperSize {
    type Err = PdfPressError;

    /// Parse a paper name (`a4`, `letter`, ...) or a custom `WIDTHxHEIGHT` in mm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => {
                let (w, h) = other.split_once('x').ok_or_else(|| {
                    PdfPressError::InvalidConfig(format!("unknown paper size: {s}"))
                })?;
                let parse = |v: &str| {
                    v.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                        PdfPressError::InvalidConfig(format!("bad paper dimension in {s}"))
                    })
                };
                Ok(Self::Custom {
                    width_mm: parse(w)?,
                    height_mm: parse(h)?,
                })
            }
        }
    }
}

/// Convert millimetres to points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Classify a width/height pair. Square pages count as portrait.
    pub fn from_dimensions(width: f32, height: f32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Portrait => "Portrait",
            Self::Landscape => "Landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How an image's drawn extent relates to the page it sits on.
///
/// Both modes anchor the image at the top-left corner of the page and ignore
/// the image's native aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Drawn width is the page height and drawn height is the page width.
    /// On a portrait page the image overflows the right edge and covers only
    /// the top of the page, which is how legacy output looked.
    #[default]
    Swapped,
    /// Drawn width and height match the page exactly (true full-bleed),
    /// including a landscape page in orientation-aware mode.
    Nominal,
}

impl FromStr for Placement {
    type Err = PdfPressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "swapped" => Ok(Self::Swapped),
            "nominal" => Ok(Self::Nominal),
            other => Err(PdfPressError::InvalidConfig(format!(
                "unknown placement: {other} (expected swapped or nominal)"
            ))),
        }
    }
}
