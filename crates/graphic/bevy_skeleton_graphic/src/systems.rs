use bevy::prelude::*;
use bevy::time::Real;
use skeleton_graphic_core::{FrameTime, GraphicSettings};

use crate::components::{GraphicAwake, SkeletonGraphicComponent, WorldGraphic};
use crate::host::WorldPrimitiveHost;
use crate::resources::GraphicExecution;
use crate::GraphicRuntime;

/// Host type handed to graphics of runtime `R`.
pub type RuntimeHost<'w, R> =
    WorldPrimitiveHost<'w, <R as GraphicRuntime>::Material, <R as GraphicRuntime>::Texture>;

/// First-time initialization of newly added graphics. Failures are logged and
/// the graphic stays invalid; it is still marked awake.
pub fn initialize_graphics<R>(
    mut commands: Commands,
    exec: Res<GraphicExecution>,
    mut graphics: Query<(Entity, &mut SkeletonGraphicComponent<R>), Without<GraphicAwake>>,
) where
    R: GraphicRuntime,
    SkeletonGraphicComponent<R>: Component,
{
    for (entity, mut graphic) in graphics.iter_mut() {
        if let Err(err) = graphic.0.initialize(false, exec.0) {
            warn!("skeleton graphic {entity:?}: initialization failed: {err}");
        }
        commands.entity(entity).insert(GraphicAwake);
    }
}

/// Advance every awake graphic by this frame's delta.
pub fn advance_graphics<R>(
    time: Res<Time>,
    real: Option<Res<Time<Real>>>,
    mut graphics: Query<&mut SkeletonGraphicComponent<R>, With<GraphicAwake>>,
) where
    R: GraphicRuntime,
    SkeletonGraphicComponent<R>: Component,
{
    let delta = time.delta_seconds();
    let unscaled = real.map_or(delta, |r| r.delta_seconds());
    let frame = FrameTime::new(delta, unscaled);
    for mut graphic in graphics.iter_mut() {
        graphic.0.tick(&frame);
    }
}

/// Run `f` with the graphic on `owner` and a host over the world. The graphic
/// is swapped out of its component for the duration so the host can borrow the
/// world; the component itself stays on the entity. Returns `None` when
/// `owner` has no graphic of runtime `R`.
pub fn with_graphic_host<R, O>(
    world: &mut World,
    owner: Entity,
    f: impl FnOnce(&mut WorldGraphic<R>, &mut RuntimeHost<'_, R>) -> O,
) -> Option<O>
where
    R: GraphicRuntime,
    SkeletonGraphicComponent<R>: Component,
{
    let mut slot = world.get_mut::<SkeletonGraphicComponent<R>>(owner)?;
    let mut graphic = std::mem::replace(
        &mut slot.bypass_change_detection().0,
        empty_graphic::<R>(),
    );
    let out = {
        let mut host = RuntimeHost::<R>::new(world, owner);
        f(&mut graphic, &mut host)
    };
    if let Some(mut slot) = world.get_mut::<SkeletonGraphicComponent<R>>(owner) {
        slot.0 = graphic;
    }
    Some(out)
}

fn empty_graphic<R: GraphicRuntime>() -> WorldGraphic<R> {
    WorldGraphic::<R>::new(None, GraphicSettings::default(), R::Generator::default())
}

/// Rebuild meshes of every awake graphic after animation has run.
pub fn regenerate_graphics<R>(world: &mut World)
where
    R: GraphicRuntime,
    SkeletonGraphicComponent<R>: Component,
{
    let owners: Vec<Entity> = world
        .query_filtered::<Entity, (With<SkeletonGraphicComponent<R>>, With<GraphicAwake>)>()
        .iter(world)
        .collect();
    for owner in owners {
        with_graphic_host::<R, _>(world, owner, |graphic, host| graphic.regenerate(host));
    }
}

/// Destroy the idle primitive entities of the graphic on `owner`.
pub fn trim_graphic_primitives<R>(world: &mut World, owner: Entity) -> usize
where
    R: GraphicRuntime,
    SkeletonGraphicComponent<R>: Component,
{
    with_graphic_host::<R, _>(world, owner, |graphic, host| graphic.trim_primitives(host))
        .unwrap_or(0)
}
