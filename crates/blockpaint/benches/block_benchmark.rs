use blockpaint::codec::{self, Layout};
use blockpaint::{shapes, Canvas, GridSize, History, RecolorPolicy, Settings};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn random_canvas() -> Canvas {
    let mut rng = StdRng::seed_from_u64(0xb10c);
    let mut canvas = Canvas::new(GridSize::default());
    canvas.randomize(&mut rng);
    canvas
}

fn bench_set_pixel(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let strokes: Vec<(i32, i32, u8)> = (0..4096)
        .map(|_| (rng.gen_range(0..320), rng.gen_range(0..200), rng.gen_range(0..16)))
        .collect();

    for (name, settings) in [
        ("set_pixel_same_as_pointer", Settings::default()),
        (
            "set_pixel_minimal_change",
            Settings::default().with_policy(RecolorPolicy::MinimalChange),
        ),
        ("set_pixel_masked", Settings::default().with_mask_color(Some(6))),
    ] {
        let mut canvas = random_canvas();
        c.bench_function(name, |b| {
            b.iter(|| {
                for &(x, y, color) in &strokes {
                    canvas.set_pixel(x, y, color, black_box(&settings));
                }
            })
        });
    }
}

fn bench_shapes(c: &mut Criterion) {
    let settings = Settings::default();
    let mut canvas = random_canvas();

    c.bench_function("line_diagonal_320x200", |b| {
        b.iter(|| shapes::line(&mut canvas, (0, 0), black_box((319, 199)), 5, &settings))
    });

    c.bench_function("circle_r90", |b| {
        b.iter(|| shapes::circle(&mut canvas, (160, 100), black_box((250, 100)), 7, &settings))
    });
}

fn bench_codec(c: &mut Criterion) {
    let canvas = random_canvas();
    let size = canvas.size();
    let data = codec::serialize(&canvas, Layout::Masked);
    let text = codec::to_text(&data);

    c.bench_function("serialize_40x25", |b| {
        b.iter(|| codec::serialize(black_box(&canvas), Layout::Masked))
    });

    c.bench_function("restore_40x25", |b| {
        b.iter(|| codec::restore(black_box(&data), size))
    });

    c.bench_function("restore_text_40x25", |b| {
        b.iter(|| codec::restore_text(black_box(&text), size))
    });
}

fn bench_history(c: &mut Criterion) {
    let mut canvas = random_canvas();
    let mut history = History::new();
    for _ in 0..16 {
        history.save(&canvas);
    }

    c.bench_function("history_undo_redo", |b| {
        b.iter(|| {
            history.undo(&mut canvas);
            history.redo(&mut canvas);
        })
    });
}

criterion_group!(
    benches,
    bench_set_pixel,
    bench_shapes,
    bench_codec,
    bench_history
);
criterion_main!(benches);
