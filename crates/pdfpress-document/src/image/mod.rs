// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode located image regions and re-encode them as JPEG.

pub mod transcoder;

pub use transcoder::{RecompressedImage, TranscodeBatch, TranscodeFailure, Transcoder};
