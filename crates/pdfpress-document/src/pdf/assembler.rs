// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembler — build a new PDF with one recompressed JPEG per page using
// `lopdf`.
//
// The JPEG bytes are embedded untouched as `/DCTDecode` image XObjects, so the
// quality chosen by the transcoder is exactly what ends up in the file.
// Output compression Flate-encodes the page content streams.
//
// Lifecycle: Empty -> (AddPage -> PlaceImage)* -> Sealed. `add_page` hands out
// a `PageSlot` that `place_image` consumes, and sealing consumes the
// assembler, so neither an empty page nor a post-seal mutation can be
// expressed.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use pdfpress_core::CompressConfig;
use pdfpress_core::error::{PdfPressError, Result};
use pdfpress_core::types::{Orientation, PaperSize, Placement};
use tracing::{debug, info, instrument};

use crate::image::RecompressedImage;

/// Page geometry settings shared by every page of the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub paper_size: PaperSize,
    pub placement: Placement,
    pub orientation_aware: bool,
    /// Flate-encode every page content stream.
    pub compress: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            placement: Placement::Swapped,
            orientation_aware: false,
            compress: true,
        }
    }
}

impl From<&CompressConfig> for PageLayout {
    fn from(config: &CompressConfig) -> Self {
        Self {
            paper_size: config.paper_size,
            placement: config.placement,
            orientation_aware: config.orientation_aware,
            compress: config.compress_output,
        }
    }
}

/// Resolved geometry for one page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub orientation: Orientation,
    /// The `cm` matrix mapping the unit image square onto the page.
    pub transform: [f32; 6],
}

impl PageLayout {
    /// Work out the page size and image transform for `image`.
    ///
    /// The drawn extent is expressed along the image's own axes: `Swapped`
    /// draws it `page height` wide and `page width` tall, `Nominal` covers
    /// the page exactly. The image is anchored at the top-left corner of the
    /// page. In orientation-aware mode a landscape image gets a landscape page
    /// and is turned 90 degrees counter-clockwise, which puts its width along
    /// the page's height, so both placements cover that page exactly.
    pub fn geometry_for(&self, image: &RecompressedImage) -> PageGeometry {
        let (portrait_w, portrait_h) = self.paper_size.dimensions_pt();
        let rotate = self.orientation_aware && image.is_landscape();

        let (page_w, page_h) = if rotate {
            (portrait_h, portrait_w)
        } else {
            (portrait_w, portrait_h)
        };

        let (draw_w, draw_h) = match (self.placement, rotate) {
            (Placement::Nominal, false) => (page_w, page_h),
            (Placement::Nominal, true) | (Placement::Swapped, _) => (page_h, page_w),
        };

        let transform = if rotate {
            [0.0, draw_w, -draw_h, 0.0, draw_h, page_h - draw_w]
        } else {
            [draw_w, 0.0, 0.0, draw_h, 0.0, page_h - draw_h]
        };

        PageGeometry {
            width_pt: page_w,
            height_pt: page_h,
            orientation: Orientation::from_dimensions(page_w, page_h),
            transform,
        }
    }
}

/// A page that has been added but has not had its image placed yet.
#[must_use = "a page slot must be filled with place_image"]
#[derive(Debug)]
pub struct PageSlot {
    page_id: ObjectId,
    number: usize,
    geometry: PageGeometry,
}

/// Summary of a sealed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedDocument {
    /// Destination file, if the document was written to disk.
    pub path: Option<PathBuf>,
    pub pages: usize,
    pub bytes_written: u64,
}

/// Builds the output document, one image per page, in append order.
pub struct PageAssembler {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    layout: PageLayout,
}

impl PageAssembler {
    /// Start an empty document with the given page layout.
    pub fn new(layout: PageLayout) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
            layout,
        }
    }

    /// Number of pages placed so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Add a page and place `image` on it.
    #[instrument(skip_all, fields(source_index = image.source_index, jpeg_len = image.data.len()))]
    pub fn append(&mut self, image: &RecompressedImage) -> Result<()> {
        let slot = self.add_page(image);
        self.place_image(slot, image)
    }

    /// Reserve the next page and compute its geometry.
    fn add_page(&mut self, image: &RecompressedImage) -> PageSlot {
        PageSlot {
            page_id: self.document.new_object_id(),
            number: self.kids.len() + 1,
            geometry: self.layout.geometry_for(image),
        }
    }

    /// Register the image as a page resource and draw it.
    fn place_image(&mut self, slot: PageSlot, image: &RecompressedImage) -> Result<()> {
        let PageSlot {
            page_id,
            number,
            geometry,
        } = slot;

        let image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => image.color.pdf_color_space(),
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.data.clone(),
        )
        .with_compression(false);
        let image_id = self.document.add_object(image_stream);

        let name = format!("Im{number}");
        let [a, b, c, d, e, f] = geometry.transform;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![a.into(), b.into(), c.into(), d.into(), e.into(), f.into()],
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|err| {
            PdfPressError::PdfError(format!("failed to encode content for page {number}: {err}"))
        })?;
        let content_stream = if self.layout.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&encoded)?;
            Stream::new(dictionary! { "Filter" => "FlateDecode" }, encoder.finish()?)
        } else {
            Stream::new(Dictionary::new(), encoded)
        };
        let content_id = self
            .document
            .add_object(content_stream.with_compression(false));

        let mut xobjects = Dictionary::new();
        xobjects.set(name.as_str(), image_id);

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            geometry.width_pt.into(),
            geometry.height_pt.into(),
        ];
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => xobjects,
            },
        };
        self.document.objects.insert(page_id, Object::Dictionary(page));
        self.kids.push(Object::Reference(page_id));

        debug!(
            number,
            name = %name,
            orientation = %geometry.orientation,
            width_pt = geometry.width_pt,
            height_pt = geometry.height_pt,
            "Image placed on page"
        );
        Ok(())
    }

    /// Finish the page tree and serialise the document to bytes.
    pub fn seal_to_vec(self) -> Result<Vec<u8>> {
        let pages = self.kids.len();
        let mut document = self.finish();

        let mut output = Vec::new();
        document.save_to(&mut output).map_err(|err| {
            PdfPressError::PdfError(format!("failed to serialise output PDF: {err}"))
        })?;

        debug!(pages, output_bytes = output.len(), "Document sealed");
        Ok(output)
    }

    /// Seal the document and write it to `destination`.
    ///
    /// Serialisation happens before the file is created, so an encoding error
    /// leaves no file behind. A failing write may leave a partial file.
    #[instrument(skip_all, fields(destination = %destination.as_ref().display()))]
    pub fn seal(self, destination: impl AsRef<Path>) -> Result<SealedDocument> {
        let pages = self.kids.len();
        let bytes = self.seal_to_vec()?;
        std::fs::write(destination.as_ref(), &bytes)?;

        info!(pages, bytes = bytes.len(), "Wrote PDF to {}", destination.as_ref().display());
        Ok(SealedDocument {
            path: Some(destination.as_ref().to_path_buf()),
            pages,
            bytes_written: bytes.len() as u64,
        })
    }

    fn finish(self) -> Document {
        let Self {
            mut document,
            pages_id,
            kids,
            ..
        } = self;

        let count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = document.add_object(dictionary! {
            "Producer" => Object::string_literal("pdfpress"),
        });
        document.trailer.set("Root", catalog_id);
        document.trailer.set("Info", info_id);
        document
    }
}
