//! Criterion benchmarks for the frame engine hot paths.
//!
//! Run with: `cargo bench`
//! Quick compile check: `cargo bench -- --test`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use vcamframe::processing::tables;
use vcamframe::{AspectRatio, Frame, PixelFormat, Scaling, VideoFormat};

/// 640x480 RGB24 test card with a smooth gradient.
fn make_frame() -> Frame {
    let format = VideoFormat::new(PixelFormat::Rgb24, 640, 480);
    let mut frame = Frame::new(format);

    for y in 0..480usize {
        let line = frame.line_mut(0, y);
        for (x, px) in line.chunks_exact_mut(3).enumerate() {
            px.copy_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
        }
    }

    frame
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    let frame = make_frame();
    group.throughput(Throughput::Bytes(frame.data().len() as u64));

    for target in [
        PixelFormat::Bgr32,
        PixelFormat::Rgb16,
        PixelFormat::Yuy2,
        PixelFormat::Nv12,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(target), &target, |b, &target| {
            b.iter(|| black_box(&frame).convert(target));
        });
    }

    group.finish();
}

fn bench_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("scale");
    let frame = make_frame();

    group.bench_function("fast_up_1280x720", |b| {
        b.iter(|| black_box(&frame).scaled(1280, 720, Scaling::Fast, AspectRatio::Ignore));
    });

    group.bench_function("linear_up_1280x720", |b| {
        b.iter(|| black_box(&frame).scaled(1280, 720, Scaling::Linear, AspectRatio::Keep));
    });

    group.bench_function("fast_down_320x180", |b| {
        b.iter(|| black_box(&frame).scaled(320, 180, Scaling::Fast, AspectRatio::Expanding));
    });

    group.finish();
}

fn bench_adjust(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust");
    let frame = make_frame();
    group.throughput(Throughput::Bytes(frame.data().len() as u64));

    // Keep table construction out of the measurements
    tables::warmup();

    group.bench_function("hsl", |b| {
        b.iter(|| black_box(&frame).adjust_hsl(45, 20, -10));
    });

    group.bench_function("gamma_contrast", |b| {
        b.iter(|| black_box(&frame).adjust(0, 0, 0, 60, 40, false));
    });

    group.bench_function("grayscale", |b| {
        b.iter(|| black_box(&frame).to_grayscale());
    });

    group.bench_function("mirror", |b| {
        b.iter(|| black_box(&frame).mirror(true, true));
    });

    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    c.bench_function("gamma_curve_lookup", |b| {
        b.iter(|| tables::gamma_curve(black_box(100))[128]);
    });
}

criterion_group!(benches, bench_convert, bench_scale, bench_adjust, bench_tables);
criterion_main!(benches);
