use std::sync::{Arc, Mutex};

use skeleton_graphic_core::{ExecutionContext, FrameTime, GraphicSettings, Skeleton};
use skeleton_graphic_test_fixtures as fx;
use fx::RecordingHost;

fn initialized(settings: GraphicSettings) -> fx::FixtureGraphic {
    let mut g = fx::graphic("hero", settings).unwrap();
    g.initialize(false, ExecutionContext::Live).unwrap();
    g
}

fn walking() -> GraphicSettings {
    GraphicSettings {
        starting_animation: Some("walk".into()),
        ..Default::default()
    }
}

fn track_time(g: &fx::FixtureGraphic) -> f32 {
    g.animation_state().unwrap().track(0).unwrap().time
}

#[test]
fn hooks_run_once_per_advance_in_order() {
    let mut g = initialized(GraphicSettings::default());
    let log = Arc::new(Mutex::new(Vec::new()));

    let l = log.clone();
    g.on_update_complete(move |_| l.lock().unwrap().push("complete"));
    let l = log.clone();
    g.on_world_ready(move |_| l.lock().unwrap().push("world"));
    let l = log.clone();
    g.on_pose_applied(move |_| l.lock().unwrap().push("pose"));

    g.advance(0.1);
    assert_eq!(*log.lock().unwrap(), vec!["pose", "world", "complete"]);

    g.advance(0.1);
    assert_eq!(log.lock().unwrap().len(), 6);
}

#[test]
fn world_ready_hook_adds_second_world_pass() {
    let mut g = initialized(GraphicSettings::default());
    g.advance(0.1);
    assert_eq!(g.skeleton().unwrap().world_passes, 1);

    let id = g.on_world_ready(|sk| {
        if let Some(root) = sk.bone_mut("root") {
            root.x = 100.0;
        }
    });
    g.advance(0.1);
    let sk = g.skeleton().unwrap();
    assert_eq!(sk.world_passes, 3);
    // the edit is propagated to children by the second pass
    assert_eq!(sk.bone("arm").unwrap().world[4], 105.0);

    assert!(g.remove_hook(id));
    g.advance(0.1);
    assert_eq!(g.skeleton().unwrap().world_passes, 4);
}

#[test]
fn pose_hook_edits_are_seen_by_world_pass() {
    let mut g = initialized(GraphicSettings::default());
    g.on_pose_applied(|sk| {
        if let Some(torso) = sk.bone_mut("torso") {
            torso.y = 50.0;
        }
    });
    let seen = Arc::new(Mutex::new(None));
    let s = seen.clone();
    g.on_update_complete(move |sk| {
        *s.lock().unwrap() = sk.bone("arm").map(|b| b.world[5]);
    });

    g.advance(0.0);
    assert_eq!(*seen.lock().unwrap(), Some(70.0));
}

#[test]
fn advance_applies_time_scale() {
    let mut g = initialized(GraphicSettings {
        time_scale: 2.0,
        ..walking()
    });
    g.advance(0.5);
    assert!((track_time(&g) - 1.0).abs() < 1e-6);
    assert!((g.skeleton().unwrap().time - 1.0).abs() < 1e-6);
    // walk moves root 10 units over 2 seconds
    assert!((g.skeleton().unwrap().bone("root").unwrap().x - 5.0).abs() < 1e-4);
}

#[test]
fn tick_picks_delta_by_unscaled_flag() {
    let frame = FrameTime::new(0.1, 0.5);

    let mut unscaled = initialized(walking());
    unscaled.tick(&frame);
    assert!((track_time(&unscaled) - 0.5).abs() < 1e-6);

    let mut scaled = initialized(fx::settings::load("hero-live").unwrap());
    scaled.tick(&frame);
    assert!((track_time(&scaled) - 0.1).abs() < 1e-6);
}

#[test]
fn frozen_graphic_holds_pose_and_meshes() {
    let mut g = initialized(fx::settings::load("frozen").unwrap());
    let mut host = RecordingHost::new();
    let applied = g.animation_state().unwrap().applied;

    g.advance(0.5);
    g.tick(&FrameTime::new(0.5, 0.5));
    assert_eq!(track_time(&g), 0.0);
    assert_eq!(g.animation_state().unwrap().applied, applied);

    g.regenerate(&mut host);
    assert_eq!(host.created(), 0);

    // refresh re-poses at zero delta but still skips meshes
    g.refresh(&mut host);
    assert_eq!(g.animation_state().unwrap().applied, applied + 1);
    assert_eq!(host.created(), 0);

    // bounds queries are not gated by freeze
    g.compute_bounds(&mut host, ExecutionContext::Live).unwrap();
    assert_eq!(host.created(), 1);
}

#[test]
fn refresh_picks_up_skin_edits() {
    let mut g = initialized(GraphicSettings::default());
    let mut host = RecordingHost::new();
    g.regenerate(&mut host);
    assert_eq!(g.submesh_count(), 1);

    g.skeleton_mut().unwrap().set_skin("armored").unwrap();
    g.refresh(&mut host);
    assert_eq!(g.submesh_count(), 2);
    assert_eq!(host.alive_count(), 2);
}

#[test]
fn freezing_after_a_rendered_frame_keeps_everything_still() {
    let mut g = initialized(walking());
    let mut host = RecordingHost::new();
    g.advance(0.5);
    g.regenerate(&mut host);

    let prims = g.primitives().to_vec();
    let records: Vec<_> = prims.iter().map(|p| host.primitive(*p).clone()).collect();
    let bones = g.skeleton().unwrap().bones.clone();

    g.settings_mut().freeze = true;
    for _ in 0..3 {
        g.advance(0.25);
        g.tick(&FrameTime::new(0.25, 0.25));
        g.regenerate(&mut host);
    }

    assert_eq!(g.skeleton().unwrap().bones, bones);
    let after: Vec<_> = prims.iter().map(|p| host.primitive(*p).clone()).collect();
    assert_eq!(after, records);
    assert_eq!(g.primitives(), prims.as_slice());
}
