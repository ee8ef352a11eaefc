//! Streaming writer benchmarks
//!
//! Measures end-to-end document generation with eager page flushing versus
//! a fully buffered document, the cost of a back-pressured sink, and raw
//! object throughput of the store.
//!
//! Run with: `cargo bench streaming_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use streampdf::objects::Dictionary;
use streampdf::writer::{ObjectStore, ObjectWriter, Sink};
use streampdf::{
    BoundedSink, Color, Document, DocumentConfig, Font, GraphicsContext, OutlineOptions,
    PageOptions,
};
use std::time::Duration;

fn build_document<S: Sink>(sink: S, config: DocumentConfig, pages: usize) -> S {
    let mut doc = Document::new(sink, config).unwrap();
    let mut graphics = GraphicsContext::new();
    graphics
        .set_stroke_color(Color::gray(0.5))
        .rect(72.0, 72.0, 451.0, 698.0)
        .stroke();

    for i in 0..pages {
        doc.add_page(PageOptions::a4()).unwrap();
        doc.font(Font::Helvetica, 12.0);
        for line in 0..40 {
            doc.text(&format!("Page {i} line {line}"), 72.0, 760.0 - line as f64 * 16.0)
                .unwrap();
        }
        doc.draw(&graphics).unwrap();
        doc.add_outline(&format!("Page {i}"), None, OutlineOptions::default())
            .unwrap();
    }
    doc.end().unwrap();
    doc.into_sink()
}

fn benchmark_page_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_streaming");

    for pages in [10, 100, 500].iter() {
        group.throughput(Throughput::Elements(*pages as u64));
        group.bench_with_input(BenchmarkId::new("eager_flush", pages), pages, |b, &pages| {
            b.iter(|| {
                let config = DocumentConfig::default().with_compression(false);
                black_box(build_document(Vec::<u8>::new(), config, pages))
            })
        });
        group.bench_with_input(BenchmarkId::new("buffered", pages), pages, |b, &pages| {
            b.iter(|| {
                let config = DocumentConfig::default()
                    .with_compression(false)
                    .with_buffer_pages(true);
                black_box(build_document(Vec::<u8>::new(), config, pages))
            })
        });
    }

    group.finish();
}

fn benchmark_backpressure(c: &mut Criterion) {
    let mut group = c.benchmark_group("backpressure");

    for high_water_mark in [256usize, 4096, 65536].iter() {
        group.bench_with_input(
            BenchmarkId::new("high_water_mark", high_water_mark),
            high_water_mark,
            |b, &high_water_mark| {
                b.iter(|| {
                    let config = DocumentConfig::default().with_compression(false);
                    let sink = BoundedSink::new(Vec::<u8>::new(), high_water_mark);
                    black_box(build_document(sink, config, 50).into_inner())
                })
            },
        );
    }

    group.finish();
}

#[cfg(feature = "compression")]
fn benchmark_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");

    for compress in [false, true] {
        group.bench_function(BenchmarkId::new("compress_streams", compress), |b| {
            b.iter(|| {
                let config = DocumentConfig::default().with_compression(compress);
                black_box(build_document(Vec::<u8>::new(), config, 50))
            })
        });
    }

    group.finish();
}

fn benchmark_object_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("object_store");
    let payload = vec![b'x'; 1024];

    for count in [1_000usize, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("objects", count), count, |b, &count| {
            b.iter(|| {
                let mut store = ObjectStore::new(Vec::<u8>::new(), false);
                store.write_header("1.7").unwrap();
                let root = store.create(Dictionary::typed("Catalog"));
                let root_id = root.id();
                for _ in 0..count {
                    let mut reference = store.create(Dictionary::new());
                    reference.append_data(&payload);
                    store.write(reference).unwrap();
                }
                store.write(root).unwrap();
                store.finish(root_id, None).unwrap();
                black_box(store.into_sink())
            })
        });
    }

    group.finish();
}

criterion_group!(
    name = streaming_benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(50);
    targets =
        benchmark_page_streaming,
        benchmark_backpressure,
        benchmark_object_store
);

#[cfg(feature = "compression")]
criterion_group!(
    name = compression_benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(50);
    targets =
        benchmark_compression
);

#[cfg(feature = "compression")]
criterion_main!(streaming_benches, compression_benches);

#[cfg(not(feature = "compression"))]
criterion_main!(streaming_benches);
