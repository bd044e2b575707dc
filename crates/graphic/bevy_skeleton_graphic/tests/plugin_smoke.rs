use bevy::prelude::*;
use bevy_skeleton_graphic::{
    trim_graphic_primitives, GraphicAwake, GraphicCanvas, GraphicExecution, GraphicPrimitive,
    GraphicRuntime, SkeletonGraphicComponent, SkeletonGraphicPlugin,
};
use skeleton_graphic_core::{GraphicSettings, Skeleton};
use skeleton_graphic_test_fixtures as fx;

struct FixtureRuntime;

impl GraphicRuntime for FixtureRuntime {
    type Asset = fx::FixtureAsset;
    type Generator = fx::QuadMeshGenerator;
    type Material = String;
    type Texture = String;
}

type Graphic = SkeletonGraphicComponent<FixtureRuntime>;
type Primitive = GraphicPrimitive<String, String>;

#[derive(Resource, Default)]
struct GraphicsAdded(usize);

fn count_added_graphics(mut added: ResMut<GraphicsAdded>, graphics: Query<(), Added<Graphic>>) {
    added.0 += graphics.iter().count();
}

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SkeletonGraphicPlugin::<FixtureRuntime>::default());
    app
}

fn spawn_graphic(app: &mut App, settings: GraphicSettings) -> Entity {
    let graphic = fx::graphic_with::<Entity>("hero", settings).unwrap();
    app.world_mut()
        .spawn((
            Graphic::new(graphic),
            SpatialBundle::default(),
        ))
        .id()
}

fn primitive_children(app: &App, owner: Entity) -> Vec<Entity> {
    app.world()
        .get::<Children>(owner)
        .map(|c| c.iter().copied().collect())
        .unwrap_or_default()
}

#[test]
fn plugin_inserts_execution_resource() {
    let app = app();
    assert!(app.world().get_resource::<GraphicExecution>().is_some());
}

#[test]
fn first_frame_initializes_and_spawns_primitives() {
    let mut app = app();
    let owner = spawn_graphic(&mut app, GraphicSettings::default());
    app.update();

    assert!(app.world().get::<GraphicAwake>(owner).is_some());
    let graphic = app.world().get::<Graphic>(owner).unwrap();
    assert!(graphic.0.is_valid());
    assert_eq!(graphic.0.primitives().len(), 1);

    let children = primitive_children(&app, owner);
    assert_eq!(children, graphic.0.primitives().to_vec());

    let child = children[0];
    let world = app.world();
    assert_eq!(world.get::<Name>(child).unwrap().as_str(), "Primitive[0]");
    assert_eq!(world.get::<Visibility>(child), Some(&Visibility::Inherited));
    let prim = world.get::<Primitive>(child).unwrap();
    assert_eq!(prim.vertex_count, 8);
    assert_eq!(prim.material.as_deref(), Some("body"));
    // MinimalPlugins has no mesh assets
    assert!(prim.mesh.is_none());
}

#[test]
fn skin_change_hides_unused_primitive_and_trim_despawns_it() {
    let mut app = app();
    let settings = GraphicSettings {
        initial_skin: Some("armored".into()),
        ..Default::default()
    };
    let owner = spawn_graphic(&mut app, settings);
    app.update();
    let children = primitive_children(&app, owner);
    assert_eq!(children.len(), 2);

    app.world_mut()
        .get_mut::<Graphic>(owner)
        .unwrap()
        .0
        .skeleton_mut()
        .unwrap()
        .set_skin("default")
        .unwrap();
    app.update();
    assert_eq!(
        app.world().get::<Visibility>(children[1]),
        Some(&Visibility::Hidden)
    );

    let removed = trim_graphic_primitives::<FixtureRuntime>(app.world_mut(), owner);
    assert_eq!(removed, 1);
    assert!(app.world().get_entity(children[1]).is_none());
    assert_eq!(primitive_children(&app, owner), vec![children[0]]);
}

#[test]
fn canvas_ancestor_sets_mesh_scale() {
    let mut app = app();
    let canvas = app
        .world_mut()
        .spawn((
            GraphicCanvas {
                reference_pixels_per_unit: 1.0,
            },
            SpatialBundle::default(),
        ))
        .id();
    let owner = spawn_graphic(&mut app, GraphicSettings::default());
    app.world_mut().entity_mut(owner).set_parent(canvas);
    app.update();

    let graphic = app.world().get::<Graphic>(owner).unwrap();
    assert_eq!(graphic.0.meshes()[0].positions[0], [-10.0, -10.0, 0.0]);
}

#[test]
fn frozen_graphic_spawns_nothing() {
    let mut app = app();
    let owner = spawn_graphic(&mut app, fx::settings::load("frozen").unwrap());
    app.update();
    app.update();

    let graphic = app.world().get::<Graphic>(owner).unwrap();
    assert!(graphic.0.is_valid());
    assert!(primitive_children(&app, owner).is_empty());
}

#[test]
fn regeneration_keeps_the_component_in_place() {
    let mut app = app();
    app.init_resource::<GraphicsAdded>()
        .add_systems(Update, count_added_graphics);
    let owner = spawn_graphic(&mut app, GraphicSettings::default());
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(app.world().resource::<GraphicsAdded>().0, 1);
    let graphic = app.world().get::<Graphic>(owner).unwrap();
    assert!(graphic.0.is_valid());
    assert_eq!(graphic.0.generator().instructions_built, 3);
}
