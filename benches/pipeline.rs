//! Benchmarks for the template pipeline.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use template_assembler::shape::generate_priority_mask;
use template_assembler::types::{Colour, Palette, Priority, TemplateEntry};
use template_assembler::{normalize_image, Assembler, AssemblerConfig, MemoryLoader, Raster};

/// Square image with varied colours, most of them off-palette.
fn noisy_image(size: usize) -> Raster {
    let rows = (0..size)
        .map(|y| {
            (0..size)
                .map(|x| {
                    Colour::rgb(
                        ((x * 2) % 256) as u8,
                        ((y * 2) % 256) as u8,
                        (((x + y) * 3) % 256) as u8,
                    )
                })
                .collect()
        })
        .collect();
    Raster::from_rows(rows)
}

/// Opaque disc on a transparent background.
fn disc(size: usize, colour: Colour) -> Raster {
    let r = size as f64 / 2.0;
    let rows = (0..size)
        .map(|y| {
            (0..size)
                .map(|x| {
                    let dx = x as f64 + 0.5 - r;
                    let dy = y as f64 + 0.5 - r;
                    if dx * dx + dy * dy <= r * r {
                        colour
                    } else {
                        Colour::TRANSPARENT
                    }
                })
                .collect()
        })
        .collect();
    Raster::from_rows(rows)
}

// -- Palette benchmarks --

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let palette = Palette::builtin();

    for size in [32, 128] {
        let image = noisy_image(size);
        group.bench_function(format!("normalize_{}x{}", size, size), |b| {
            b.iter_batched(
                || image.clone(),
                |mut img| normalize_image(palette, black_box(&mut img)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

// -- Priority mask benchmarks --

fn bench_priority_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_mask");
    let priority = Priority::new("bench", 5).unwrap();

    let square = Raster::filled(64, 64, Colour::BLACK);
    let round = disc(128, Colour::BLACK);

    group.bench_function("mask_square_64", |b| {
        b.iter(|| generate_priority_mask(black_box(&square), priority))
    });

    group.bench_function("mask_disc_128", |b| {
        b.iter(|| generate_priority_mask(black_box(&round), priority))
    });

    group.finish();
}

// -- Full pipeline benchmarks --

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");

    let config = AssemblerConfig {
        canvas_width: 512,
        canvas_height: 512,
        ..AssemblerConfig::default()
    };

    let mut loader = MemoryLoader::new();
    let mut entries = Vec::new();
    for i in 0..24 {
        let source = format!("entry-{}.png", i);
        loader.insert(source.clone(), disc(48 + (i % 4) * 16, Colour::rgb(255, 69, 0)));
        let mut entry = TemplateEntry::new(format!("entry-{}", i), (i as i64 * 37) % 400, (i as i64 * 53) % 400)
            .with_image(source)
            .with_autopick(i % 3 != 0)
            .with_priority(1 + (i as i64 % 10));
        if i % 2 == 0 {
            entry = entry.with_export_group(format!("group-{}", i % 6));
        }
        entries.push(entry);
    }

    let assembler = Assembler::new(loader, &config).unwrap().with_now(0);

    group.bench_function("assemble_24_entries", |b| {
        b.iter(|| assembler.assemble(black_box(&entries)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_priority_mask, bench_assemble);
criterion_main!(benches);
