use std::sync::Arc;

use skeleton_graphic_core::{
    Bounds, ExecutionContext, GraphicSettings, RectFit, SkeletonGraphic,
};
use skeleton_graphic_test_fixtures as fx;
use fx::{FixtureAsset, FixtureGraphic, QuadMeshGenerator, RecordingHost};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn invalid_graphic_has_zero_bounds_and_fallback_rect() {
    let mut g: FixtureGraphic = SkeletonGraphic::new(
        Some(Arc::new(FixtureAsset::unloadable())),
        GraphicSettings::default(),
        QuadMeshGenerator::new(),
    );
    let mut host = RecordingHost::new();

    let bounds = g.compute_bounds(&mut host, ExecutionContext::Live).unwrap();
    assert_eq!(bounds, Bounds::ZERO);

    let fit = g.rect_fit(&mut host, ExecutionContext::Live).unwrap();
    assert_eq!(fit.size, [RectFit::DEFAULT_SIZE, RectFit::DEFAULT_SIZE]);
    assert_eq!(fit.pivot, [0.5, 0.5]);
    assert_eq!(host.created(), 0);
}

#[test]
fn compute_bounds_initializes_on_demand() {
    let mut g = fx::graphic("hero", GraphicSettings::default()).unwrap();
    let mut host = RecordingHost::new();
    assert!(!g.is_valid());

    let bounds = g.compute_bounds(&mut host, ExecutionContext::Live).unwrap();
    assert!(g.is_valid());
    assert_eq!(bounds.min, [-1000.0, -1000.0, 0.0]);
    assert_eq!(bounds.max, [1000.0, 3000.0, 0.0]);
}

#[test]
fn bounds_cover_every_submesh() {
    let settings = GraphicSettings {
        initial_skin: Some("armored".into()),
        ..Default::default()
    };
    let mut g = fx::graphic("hero", settings).unwrap();
    let mut host = RecordingHost::with_canvas(1.0);

    let bounds = g.compute_bounds(&mut host, ExecutionContext::Live).unwrap();
    // shield around the arm at (5, 30) reaches y = 35
    assert_eq!(bounds.min, [-10.0, -10.0, 0.0]);
    assert_eq!(bounds.max, [10.0, 35.0, 0.0]);
}

#[test]
fn bounds_always_include_origin() {
    let mut g = fx::graphic("hero", GraphicSettings::default()).unwrap();
    let mut host = RecordingHost::with_canvas(1.0);
    g.initialize(false, ExecutionContext::Live).unwrap();
    if let Some(root) = g.skeleton_mut().unwrap().bone_mut("root") {
        root.x = 100.0;
    }
    g.advance(0.0);

    // body quad spans x in [90, 110]; the origin stretches it to 0
    let bounds = g.compute_bounds(&mut host, ExecutionContext::Live).unwrap();
    assert_eq!(bounds.min, [0.0, -10.0, 0.0]);
    assert_eq!(bounds.max, [110.0, 30.0, 0.0]);

    let fit = g.rect_fit(&mut host, ExecutionContext::Live).unwrap();
    assert!(approx(fit.size[0], 110.0));
    assert!(approx(fit.size[1], 40.0));
    assert!(approx(fit.pivot[0], 0.0));
    assert!(approx(fit.pivot[1], 0.25));
}

#[test]
fn rect_fit_frames_the_content() {
    let mut g = fx::graphic("sprite", GraphicSettings::default()).unwrap();
    let mut host = RecordingHost::new();

    // 2x1 image centered on the root, scaled by 100
    let fit = g.rect_fit(&mut host, ExecutionContext::Live).unwrap();
    assert!(approx(fit.size[0], 200.0));
    assert!(approx(fit.size[1], 100.0));
    assert!(approx(fit.pivot[0], 0.5));
    assert!(approx(fit.pivot[1], 0.5));

    let settings = GraphicSettings {
        initial_skin: Some("armored".into()),
        ..Default::default()
    };
    let mut hero = fx::graphic("hero", settings).unwrap();
    let fit = hero.rect_fit(&mut host, ExecutionContext::Live).unwrap();
    assert!(approx(fit.size[0], 2000.0));
    assert!(approx(fit.size[1], 4500.0));
    assert!(approx(fit.pivot[0], 0.5));
    assert!(approx(fit.pivot[1], 0.5 - 1250.0 / 4500.0));
}
