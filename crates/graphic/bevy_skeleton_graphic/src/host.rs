use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use skeleton_graphic_core::{Canvas, MeshBuffer, RenderPrimitiveHost};

use crate::components::{GraphicCanvas, GraphicPrimitive};

/// Primitive host over the ECS world: every primitive is a hidden-by-default
/// child entity of `owner` carrying a [`GraphicPrimitive`].
pub struct WorldPrimitiveHost<'w, M, T> {
    world: &'w mut World,
    owner: Entity,
    _marker: std::marker::PhantomData<fn() -> (M, T)>,
}

impl<'w, M, T> WorldPrimitiveHost<'w, M, T>
where
    M: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(world: &'w mut World, owner: Entity) -> Self {
        Self {
            world,
            owner,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn owner(&self) -> Entity {
        self.owner
    }

    fn primitive_mut(&mut self, entity: Entity) -> Option<Mut<'_, GraphicPrimitive<M, T>>> {
        self.world.get_mut::<GraphicPrimitive<M, T>>(entity)
    }
}

fn to_bevy_mesh(buffer: &MeshBuffer) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, buffer.positions.clone());
    if buffer.uvs.len() == buffer.positions.len() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, buffer.uvs.clone());
    }
    if buffer.colors.len() == buffer.positions.len() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, buffer.colors.clone());
    }
    mesh.insert_indices(Indices::U32(buffer.indices.clone()));
    mesh
}

impl<'w, M, T> RenderPrimitiveHost for WorldPrimitiveHost<'w, M, T>
where
    M: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    type Handle = Entity;
    type Material = M;
    type Texture = T;

    fn create_primitive(&mut self, name: &str) -> Entity {
        let child = self
            .world
            .spawn((
                Name::new(name.to_string()),
                GraphicPrimitive::<M, T>::default(),
                SpatialBundle {
                    visibility: Visibility::Hidden,
                    ..default()
                },
            ))
            .id();
        self.world.entity_mut(self.owner).add_child(child);
        debug!("skeleton graphic {:?}: spawned primitive {name} as {child:?}", self.owner);
        child
    }

    fn set_mesh(&mut self, primitive: &Entity, mesh: &MeshBuffer) {
        let existing = match self.primitive_mut(*primitive) {
            Some(mut p) => {
                p.vertex_count = mesh.vertex_count();
                p.index_count = mesh.indices.len();
                p.mesh.clone()
            }
            None => return,
        };

        let Some(mut meshes) = self.world.get_resource_mut::<Assets<Mesh>>() else {
            return;
        };
        let asset = to_bevy_mesh(mesh);
        if let Some(handle) = existing {
            meshes.insert(&handle, asset);
            return;
        }
        let handle = meshes.add(asset);
        if let Some(mut p) = self.primitive_mut(*primitive) {
            p.mesh = Some(handle);
        }
    }

    fn set_material_count(&mut self, primitive: &Entity, count: usize) {
        if let Some(mut p) = self.primitive_mut(*primitive) {
            p.material_count = count;
        }
    }

    fn set_material(&mut self, primitive: &Entity, material: &M, texture: Option<&T>) {
        if let Some(mut p) = self.primitive_mut(*primitive) {
            p.material = Some(material.clone());
            p.texture = texture.cloned();
        }
    }

    fn clear(&mut self, primitive: &Entity) {
        if let Some(mut p) = self.primitive_mut(*primitive) {
            p.material = None;
            p.texture = None;
            p.material_count = 0;
            p.vertex_count = 0;
            p.index_count = 0;
        }
    }

    fn set_active(&mut self, primitive: &Entity, active: bool) {
        if let Some(mut visibility) = self.world.get_mut::<Visibility>(*primitive) {
            *visibility = if active {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }

    fn is_active(&self, primitive: &Entity) -> bool {
        self.world
            .get::<Visibility>(*primitive)
            .is_some_and(|v| *v != Visibility::Hidden)
    }

    fn destroy(&mut self, primitive: Entity) {
        if let Some(entity) = self.world.get_entity_mut(primitive) {
            entity.despawn_recursive();
        }
    }

    fn contains(&self, primitive: &Entity) -> bool {
        self.world.get_entity(*primitive).is_some()
    }

    fn enclosing_canvas(&self) -> Option<Canvas> {
        let mut current = Some(self.owner);
        while let Some(entity) = current {
            if let Some(canvas) = self.world.get::<GraphicCanvas>(entity) {
                return Some(Canvas {
                    reference_pixels_per_unit: canvas.reference_pixels_per_unit,
                });
            }
            current = self.world.get::<Parent>(entity).map(Parent::get);
        }
        None
    }
}
