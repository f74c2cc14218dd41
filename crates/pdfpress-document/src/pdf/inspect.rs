// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page inspection — report the size and orientation of each input page using
// a conformant parser (`lopdf`). Not part of the compression flow; the CLI
// exposes it as a separate subcommand.

use std::fmt;

use lopdf::{Document, Object, ObjectId};
use pdfpress_core::error::{PdfPressError, Result};
use pdfpress_core::types::Orientation;
use tracing::{debug, instrument};

/// Parent-chain depth after which a page tree is treated as cyclic.
const MAX_TREE_DEPTH: usize = 32;

/// Displayed dimensions of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    /// 1-based page number.
    pub number: u32,
    /// Width in points after applying `/Rotate`.
    pub width_pt: f32,
    /// Height in points after applying `/Rotate`.
    pub height_pt: f32,
    /// Normalised `/Rotate` value (0, 90, 180 or 270).
    pub rotation: i64,
    pub orientation: Orientation,
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Page {}: {:.2} x {:.2} - {}",
            self.number, self.width_pt, self.height_pt, self.orientation
        )
    }
}

/// Anything that can list page dimensions for a PDF.
pub trait PageInspector {
    fn inspect(&self, document: &[u8]) -> Result<Vec<PageInfo>>;
}

/// Inspector backed by `lopdf`'s page tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfInspector;

impl PageInspector for LopdfInspector {
    #[instrument(skip_all, fields(bytes_len = document.len()))]
    fn inspect(&self, document: &[u8]) -> Result<Vec<PageInfo>> {
        let doc = Document::load_mem(document).map_err(|err| {
            PdfPressError::PdfError(format!("failed to load PDF for inspection: {err}"))
        })?;

        let pages = doc
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| page_info(&doc, number, page_id))
            .collect::<Result<Vec<_>>>()?;

        debug!(pages = pages.len(), "Pages inspected");
        Ok(pages)
    }
}

fn page_info(doc: &Document, number: u32, page_id: ObjectId) -> Result<PageInfo> {
    let media_box = inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| PdfPressError::PdfError(format!("page {number} has no /MediaBox")))?;
    let corners = resolve(doc, media_box)
        .as_array()
        .map_err(|err| PdfPressError::PdfError(format!("page {number} /MediaBox: {err}")))?
        .iter()
        .map(|o| resolve(doc, o).as_float())
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|err| PdfPressError::PdfError(format!("page {number} /MediaBox: {err}")))?;

    let [x0, y0, x1, y1] = corners[..] else {
        return Err(PdfPressError::PdfError(format!(
            "page {number} /MediaBox has {} entries",
            corners.len()
        )));
    };

    let rotation = inherited(doc, page_id, b"Rotate")?
        .and_then(|r| resolve(doc, r).as_i64().ok())
        .unwrap_or(0)
        .rem_euclid(360);

    let (mut width_pt, mut height_pt) = ((x1 - x0).abs(), (y1 - y0).abs());
    if rotation % 180 == 90 {
        std::mem::swap(&mut width_pt, &mut height_pt);
    }

    Ok(PageInfo {
        number,
        width_pt,
        height_pt,
        rotation,
        orientation: Orientation::from_dimensions(width_pt, height_pt),
    })
}

/// Look up `key` on the page, falling back to its ancestors in the page tree.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Result<Option<&'a Object>> {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(current).map_err(|err| {
            PdfPressError::PdfError(format!("cannot read page tree node {current:?}: {err}"))
        })?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
    Err(PdfPressError::PdfError(format!(
        "page tree deeper than {MAX_TREE_DEPTH} levels at {page_id:?}"
    )))
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}
