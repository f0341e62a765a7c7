use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iconscan::image_loader::downsample_contain;
use iconscan::{IconColorAnalyzer, NoopObserver, PixelBuffer};
use image::{Rgba, RgbaImage};

fn icon(size: u32) -> RgbaImage {
    let center = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let d = ((x as f32 - center).powi(2) + (y as f32 - center).powi(2)).sqrt();
        if d < center * 0.8 {
            Rgba([40, 40, 40, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn benchmark_color_analysis(c: &mut Criterion) {
    let analyzer = IconColorAnalyzer::new().with_observer(NoopObserver);
    let sample = icon(32);

    c.bench_function("analyze_32x32", |b| {
        b.iter(|| analyzer.analyze(black_box(&PixelBuffer::from(&sample))))
    });

    let large = icon(512);
    c.bench_function("downsample_512_to_32", |b| {
        b.iter(|| downsample_contain(black_box(&large), 32, 32))
    });
}

criterion_group!(benches, benchmark_color_analysis);
criterion_main!(benches);
