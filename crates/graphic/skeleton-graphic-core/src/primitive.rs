//! Render primitive host contract.
//!
//! A host is scoped to one graphic: primitives it creates are children of that
//! graphic's node, and `enclosing_canvas` resolves the canvas above it.
//! Primitive objects belong to the host; the graphic only keeps handles.

use std::fmt;

use crate::mesh::MeshBuffer;

/// Canvas settings that affect mesh scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub reference_pixels_per_unit: f32,
}

pub trait RenderPrimitiveHost {
    type Handle: Clone + PartialEq + fmt::Debug;
    type Material;
    type Texture;

    /// Create a new, inactive primitive under the graphic's node.
    fn create_primitive(&mut self, name: &str) -> Self::Handle;

    fn set_mesh(&mut self, primitive: &Self::Handle, mesh: &MeshBuffer);

    fn set_material_count(&mut self, primitive: &Self::Handle, count: usize);

    fn set_material(
        &mut self,
        primitive: &Self::Handle,
        material: &Self::Material,
        texture: Option<&Self::Texture>,
    );

    /// Drop displayed content (mesh and materials).
    fn clear(&mut self, primitive: &Self::Handle);

    fn set_active(&mut self, primitive: &Self::Handle, active: bool);

    fn is_active(&self, primitive: &Self::Handle) -> bool;

    fn destroy(&mut self, primitive: Self::Handle);

    /// False once the backing object was destroyed outside the graphic.
    fn contains(&self, _primitive: &Self::Handle) -> bool {
        true
    }

    fn enclosing_canvas(&self) -> Option<Canvas>;
}
