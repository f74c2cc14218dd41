// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pdfpress-document crate: locating image
// streams in a synthetic document and recompressing one JPEG.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

use pdfpress_document::{PatternRegionFinder, RegionFinder, Transcoder};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 256x256 gradient encoded at quality 90.
fn sample_jpeg() -> Vec<u8> {
    let img = RgbImage::from_fn(256, 256, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
    let mut buffer = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, 90))
        .unwrap();
    buffer
}

/// A fake document with `count` image objects separated by filler objects.
fn sample_document(jpeg: &[u8], count: usize) -> Vec<u8> {
    let mut doc = b"%PDF-1.4\n".to_vec();
    for i in 0..count {
        doc.extend(format!("{} 0 obj\n<< /Type /Page /Filler true >>\nendobj\n", 2 * i + 1).bytes());
        doc.extend(
            format!(
                "{} 0 obj\n<< /Type /XObject /Subtype /Image /Filter /DCTDecode /Length {} >>\nstream\n",
                2 * i + 2,
                jpeg.len()
            )
            .bytes(),
        );
        doc.extend_from_slice(jpeg);
        doc.extend_from_slice(b"\nendstream\nendobj\n");
    }
    doc.extend_from_slice(b"%%EOF\n");
    doc
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_locate(c: &mut Criterion) {
    let jpeg = sample_jpeg();
    let document = sample_document(&jpeg, 50);

    c.bench_function("locate (50 image streams)", |b| {
        b.iter(|| black_box(PatternRegionFinder.find_regions(black_box(&document))).len());
    });
}

fn bench_transcode(c: &mut Criterion) {
    let jpeg = sample_jpeg();
    let document = sample_document(&jpeg, 1);
    let regions = PatternRegionFinder.find_regions(&document);
    let transcoder = Transcoder::default();

    c.bench_function("transcode q50 (256x256)", |b| {
        b.iter(|| black_box(transcoder.transcode(black_box(&regions[0]))).is_ok());
    });
}

criterion_group!(benches, bench_locate, bench_transcode);
criterion_main!(benches);
