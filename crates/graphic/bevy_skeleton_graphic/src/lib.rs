use std::marker::PhantomData;

use bevy::prelude::*;
use skeleton_graphic_core::{MeshGenerator, SkeletonDataAsset, SkeletonOf};

pub mod components;
pub mod host;
pub mod resources;
pub mod systems;

pub use components::{
    GraphicAwake, GraphicCanvas, GraphicPrimitive, SkeletonGraphicComponent, WorldGraphic,
};
pub use host::WorldPrimitiveHost;
pub use resources::GraphicExecution;
pub use systems::{trim_graphic_primitives, with_graphic_host, RuntimeHost};

/// Binds the collaborator types a graphic is built from.
///
/// The generator must be `Default`: an empty graphic built from one holds the
/// component slot while the real graphic is out with a world-backed host.
pub trait GraphicRuntime: 'static {
    type Asset: SkeletonDataAsset;
    type Generator: MeshGenerator<
            SkeletonOf<Self::Asset>,
            Material = Self::Material,
            Texture = Self::Texture,
        > + Default;
    type Material: Clone + Send + Sync + 'static;
    type Texture: Clone + Send + Sync + 'static;
}

/// Drives every `SkeletonGraphicComponent<R>`: initialization and animation in
/// `Update`, mesh regeneration in `PostUpdate`.
pub struct SkeletonGraphicPlugin<R>(PhantomData<fn() -> R>);

impl<R> Default for SkeletonGraphicPlugin<R> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<R> Plugin for SkeletonGraphicPlugin<R>
where
    R: GraphicRuntime,
    SkeletonGraphicComponent<R>: Component,
{
    fn build(&self, app: &mut App) {
        app.init_resource::<GraphicExecution>()
            .add_systems(
                Update,
                (
                    systems::initialize_graphics::<R>,
                    systems::advance_graphics::<R>,
                )
                    .chain(),
            )
            .add_systems(PostUpdate, systems::regenerate_graphics::<R>);
    }
}
