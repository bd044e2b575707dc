use bevy::prelude::*;
use skeleton_graphic_core::{SkeletonGraphic, DEFAULT_PIXELS_PER_UNIT};

use crate::GraphicRuntime;

/// Graphic type driven for runtime `R`; primitives are child entities.
pub type WorldGraphic<R> =
    SkeletonGraphic<<R as GraphicRuntime>::Asset, <R as GraphicRuntime>::Generator, Entity>;

/// The skeleton graphic owned by an entity. Its primitives are spawned as
/// children of that entity.
#[derive(Component)]
pub struct SkeletonGraphicComponent<R: GraphicRuntime>(pub WorldGraphic<R>);

impl<R: GraphicRuntime> SkeletonGraphicComponent<R> {
    pub fn new(graphic: WorldGraphic<R>) -> Self {
        Self(graphic)
    }
}

/// Marker inserted once a graphic went through its first initialization.
/// Only awake graphics are advanced and regenerated.
#[derive(Component, Debug, Default)]
pub struct GraphicAwake;

/// Canvas scale for every graphic below this entity (or on it).
#[derive(Component, Debug, Clone, Copy)]
pub struct GraphicCanvas {
    pub reference_pixels_per_unit: f32,
}

impl Default for GraphicCanvas {
    fn default() -> Self {
        Self {
            reference_pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        }
    }
}

/// Render state of one primitive entity, as last bound by its graphic.
#[derive(Component, Debug, Clone)]
pub struct GraphicPrimitive<M: Send + Sync + 'static, T: Send + Sync + 'static> {
    pub material: Option<M>,
    pub texture: Option<T>,
    pub material_count: usize,
    pub vertex_count: usize,
    pub index_count: usize,
    /// Mesh asset, present when the app has `Assets<Mesh>`.
    pub mesh: Option<Handle<Mesh>>,
}

impl<M: Send + Sync + 'static, T: Send + Sync + 'static> Default for GraphicPrimitive<M, T> {
    fn default() -> Self {
        Self {
            material: None,
            texture: None,
            material_count: 0,
            vertex_count: 0,
            index_count: 0,
            mesh: None,
        }
    }
}
