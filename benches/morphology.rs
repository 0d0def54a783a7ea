use criterion::{Criterion, black_box, criterion_group, criterion_main};
use set_vision::Grid;
use set_vision::models::{Attributes, Color, Count, Raster, Shape, Texture};
use set_vision::morphology::{MorphOp, apply};
use set_vision::tools::synthetic::render_layout;
use set_vision::utils::binarization::threshold_binarize;
use set_vision::utils::grayscale::rgb_to_grayscale;

fn layout_mask() -> Raster {
    let attrs = Attributes::new(Count::Three, Texture::Striped, Color::Red, Shape::Diamond);
    let image = render_layout(&Grid::from_fn(|_| attrs));
    let (w, h) = (image.width() as usize, image.height() as usize);
    let gray = rgb_to_grayscale(image.as_raw(), w, h).unwrap();
    threshold_binarize(&gray, 180)
}

fn bench_dilation_medium(c: &mut Criterion) {
    let mask = Raster::filled(640, 480, 128);
    c.bench_function("dilation_3x3_640x480", |b| {
        b.iter(|| apply(black_box(&mask), MorphOp::Dilation, 3, 3))
    });
}

fn bench_fill_opening_layout(c: &mut Criterion) {
    let mask = layout_mask();
    c.bench_function("opening_9_7_580x560", |b| {
        b.iter(|| apply(black_box(&mask), MorphOp::Opening, 9, 7))
    });
}

fn bench_closing_large(c: &mut Criterion) {
    let mask = Raster::filled(1920, 1080, 255);
    c.bench_function("closing_5_5_1920x1080", |b| {
        b.iter(|| apply(black_box(&mask), MorphOp::Closing, 5, 5))
    });
}

criterion_group!(
    benches,
    bench_dilation_medium,
    bench_fill_opening_layout,
    bench_closing_large
);
criterion_main!(benches);
