// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the quill-document crate: page compositing at the
// export supersample and ink stroke rasterization.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use quill_bridge::{PageRasterizer, PageScene};
use quill_core::{Field, FieldKind, FieldValue, InkColor, PageSize};
use quill_document::image::encode_png;
use quill_document::{Compositor, GlyphFont, InkSurface};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Composite a letter-sized page with three filled signature fields at 4x.
///
/// No text painter is configured, so this measures page scaling, ink tinting,
/// and contain-fit placement, which dominate real exports.
fn bench_composite_letter_page(c: &mut Criterion) {
    let mut ink = RgbaImage::new(600, 200);
    for x in 50..550 {
        for y in 95..105 {
            ink.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    let png = encode_png(&ink).expect("encode ink");
    let page = encode_png(&RgbaImage::from_pixel(816, 1056, Rgba([250, 250, 250, 255])))
        .expect("encode page");

    let fields: Vec<Field> = [InkColor::Black, InkColor::Blue, InkColor::Red]
        .into_iter()
        .map(|color| {
            let mut field = Field::new(FieldKind::Signature);
            field.value = Some(FieldValue::Image(png.clone()));
            field.ink_color = color;
            field
        })
        .collect();

    let scene = PageScene {
        page: Some(quill_core::PageImage {
            bytes: page,
            width: 816,
            height: 1056,
        }),
        size: PageSize::new(816, 1056),
        fields,
        selected: None,
        caption: None,
    };
    let compositor = Compositor::<GlyphFont>::image_only();

    c.bench_function("composite letter page (4x, 3 signatures)", |b| {
        b.iter(|| {
            let raster = compositor.rasterize(black_box(&scene), 4).expect("rasterize");
            black_box(raster);
        });
    });
}

/// Draw a 200-point zig-zag stroke on a 2x ink surface.
fn bench_ink_stroke(c: &mut Criterion) {
    c.bench_function("ink stroke (200 points, 2x)", |b| {
        b.iter(|| {
            let mut surface = InkSurface::new(600, 200, 2.0);
            surface.begin_stroke((10.0, 100.0));
            for i in 0..200 {
                let x = 10.0 + i as f32 * 2.9;
                let y = if i % 2 == 0 { 60.0 } else { 140.0 };
                surface.extend_stroke(black_box((x, y)));
            }
            surface.end_stroke();
            black_box(surface);
        });
    });
}

criterion_group!(benches, bench_composite_letter_page, bench_ink_stroke);
criterion_main!(benches);
