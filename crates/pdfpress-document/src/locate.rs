// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stream locator — find embedded image streams in raw PDF bytes without
// building an object model.
//
// The default finder is a structural byte pattern: an XObject dictionary whose
// subtype is Image, followed by a `stream ... endstream` body. It does not
// look at object numbers, the xref table, or `/Filter` entries, so it assumes
// the stream body is the codec's own output (e.g. DCTDecode JPEG bytes).

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tracing::{debug, instrument};

/// Bytes stripped from both ends of a captured stream body.
const PADDING: &[u8] = b" \r\n\t\x0c";

/// `(?s)` lets `.` cross line breaks and `(?-u)` lets it match any byte,
/// including invalid UTF-8 inside binary stream data.
static IMAGE_STREAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s-u)/Type\s*/XObject.*?/Subtype\s*/Image.*?stream(.*?)endstream").unwrap()
});

/// A byte range inside the source document believed to hold one encoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRegion<'a> {
    /// 1-based position in order of appearance, used in diagnostics.
    pub index: usize,
    /// Byte offset of the trimmed region within the document.
    pub offset: usize,
    /// The trimmed stream body.
    pub bytes: &'a [u8],
}

impl ImageRegion<'_> {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Anything that can split a document into image regions.
///
/// Implementations must return regions in byte-stream order with 1-based,
/// contiguous indices.
pub trait RegionFinder {
    fn find_regions<'a>(&self, document: &'a [u8]) -> Vec<ImageRegion<'a>>;
}

/// Heuristic finder driven by a byte pattern over the whole buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternRegionFinder;

impl RegionFinder for PatternRegionFinder {
    #[instrument(skip_all, fields(document_len = document.len()))]
    fn find_regions<'a>(&self, document: &'a [u8]) -> Vec<ImageRegion<'a>> {
        let regions: Vec<ImageRegion<'a>> = IMAGE_STREAM
            .captures_iter(document)
            .filter_map(|caps| caps.get(1))
            .enumerate()
            .map(|(i, body)| {
                let (lead, bytes) = trim_padding(body.as_bytes());
                ImageRegion {
                    index: i + 1,
                    offset: body.start() + lead,
                    bytes,
                }
            })
            .collect();

        debug!(regions = regions.len(), "Image streams located");
        regions
    }
}

/// Strip [`PADDING`] bytes from both ends, returning the number of leading
/// bytes removed alongside the trimmed slice.
fn trim_padding(bytes: &[u8]) -> (usize, &[u8]) {
    let start = bytes
        .iter()
        .position(|b| !PADDING.contains(b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !PADDING.contains(b))
        .map_or(start, |i| i + 1);
    (start, &bytes[start..end])
}
