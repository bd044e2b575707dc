use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skeleton_graphic_core::{ExecutionContext, FrameTime};
use skeleton_graphic_test_fixtures as fx;
use fx::RecordingHost;

pub fn criterion_benchmark(c: &mut Criterion) {
    let settings = fx::settings::load("hero-live").expect("settings fixture");
    let mut graphic = fx::graphic("hero", settings).expect("hero fixture");
    graphic
        .initialize(false, ExecutionContext::Live)
        .expect("initialize");
    let mut host = RecordingHost::new();
    let frame = FrameTime::new(1.0 / 60.0, 1.0 / 60.0);

    c.bench_function("frame_step/advance", |b| {
        b.iter(|| graphic.tick(black_box(&frame)))
    });
    c.bench_function("frame_step/advance_regenerate", |b| {
        b.iter(|| {
            graphic.tick(black_box(&frame));
            graphic.regenerate(&mut host);
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
