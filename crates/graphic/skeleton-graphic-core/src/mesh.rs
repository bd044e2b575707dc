//! Mesh buffers, render instructions and the mesh generator contract.

use crate::bounds::Bounds;
use crate::config::GenerationOptions;

/// Reusable vertex/index storage for one submesh. Capacity is kept across
/// frames; `clear` only resets lengths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
    bounds: Bounds,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.colors.clear();
        self.indices.clear();
        self.bounds = Bounds::ZERO;
    }

    /// Bounds as of the last `recalculate_bounds`.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn recalculate_bounds(&mut self) -> Bounds {
        self.bounds = Bounds::from_points(self.positions.iter()).unwrap_or(Bounds::ZERO);
        self.bounds
    }
}

/// One contiguous run of attachments sharing a material/texture.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmeshInstruction<M, T> {
    pub material: M,
    pub texture: Option<T>,
    /// Slot range `[start_slot, end_slot)` in draw order.
    pub start_slot: usize,
    pub end_slot: usize,
    pub raw_vertex_count: usize,
    pub raw_triangle_count: usize,
}

/// Ordered submeshes for the current pose. Reused in place every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderInstruction<M, T> {
    pub submeshes: Vec<SubmeshInstruction<M, T>>,
}

impl<M, T> Default for RenderInstruction<M, T> {
    fn default() -> Self {
        Self {
            submeshes: Vec::new(),
        }
    }
}

impl<M, T> RenderInstruction<M, T> {
    #[inline]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.submeshes.clear();
    }

    pub fn raw_vertex_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.raw_vertex_count).sum()
    }
}

/// Converts a posed skeleton into submesh geometry. Grouping of attachments
/// into submeshes is the generator's policy.
///
/// Per submesh the graphic calls, in order: `begin`, `add_submesh`,
/// `scale_vertex_data`, `fill_vertex_data`, `fill_triangles`,
/// `fill_late_vertex_data`.
pub trait MeshGenerator<S> {
    type Material: Clone;
    type Texture: Clone;

    /// Rebuild `instruction` in place from the current pose.
    fn generate_instruction(
        &mut self,
        instruction: &mut RenderInstruction<Self::Material, Self::Texture>,
        skeleton: &S,
        options: &GenerationOptions,
    );

    fn begin(&mut self);

    fn add_submesh(
        &mut self,
        submesh: &SubmeshInstruction<Self::Material, Self::Texture>,
        options: &GenerationOptions,
    );

    fn scale_vertex_data(&mut self, factor: f32);

    fn fill_vertex_data(&mut self, mesh: &mut MeshBuffer);

    fn fill_triangles(&mut self, mesh: &mut MeshBuffer);

    /// Attributes finalized after tinting (vertex colors and the like).
    fn fill_late_vertex_data(&mut self, mesh: &mut MeshBuffer);
}
