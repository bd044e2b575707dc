//! Render primitive pool and the mesh buffers aligned with it.
//!
//! Growth is lazy and monotonic: `reconcile` only ever appends. Primitives are
//! removed by `trim` (explicit) or when the host reports a handle dead.

use std::fmt;

use crate::mesh::MeshBuffer;
use crate::primitive::RenderPrimitiveHost;

#[derive(Debug)]
pub struct PrimitivePool<P> {
    primitives: Vec<P>,
    meshes: Vec<MeshBuffer>,
}

impl<P> Default for PrimitivePool<P> {
    fn default() -> Self {
        Self {
            primitives: Vec::new(),
            meshes: Vec::new(),
        }
    }
}

impl<P: Clone + PartialEq + fmt::Debug> PrimitivePool<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt primitives that already exist (e.g. restored from a saved scene).
    pub fn with_primitives(primitives: Vec<P>) -> Self {
        Self {
            primitives,
            meshes: Vec::new(),
        }
    }

    #[inline]
    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    #[inline]
    pub fn meshes(&self) -> &[MeshBuffer] {
        &self.meshes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Grow both pools to at least `required` entries.
    pub fn reconcile<H>(&mut self, required: usize, host: &mut H)
    where
        H: RenderPrimitiveHost<Handle = P>,
    {
        self.prune_dead(host);

        let existing = self.primitives.len();
        if existing < required {
            log::debug!("primitive pool: growing {existing} -> {required}");
            for i in existing..required {
                let handle = host.create_primitive(&format!("Primitive[{i}]"));
                self.primitives.push(handle);
            }
        }
        if self.meshes.len() < required {
            self.meshes.resize_with(required, MeshBuffer::new);
        }
    }

    fn prune_dead<H>(&mut self, host: &H)
    where
        H: RenderPrimitiveHost<Handle = P>,
    {
        let before = self.primitives.len();
        self.primitives.retain(|p| host.contains(p));
        let pruned = before - self.primitives.len();
        if pruned > 0 {
            log::debug!("primitive pool: pruned {pruned} destroyed handle(s)");
            self.meshes.truncate(self.primitives.len());
        }
    }

    /// Primitives and mesh buffers side by side, for filling and binding.
    pub fn entries_mut(&mut self) -> (&[P], &mut [MeshBuffer]) {
        (&self.primitives, &mut self.meshes)
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut MeshBuffer> {
        self.meshes.get_mut(index)
    }

    /// Clear and deactivate every primitive at index `start` and beyond.
    pub fn deactivate_from<H>(&self, start: usize, host: &mut H)
    where
        H: RenderPrimitiveHost<Handle = P>,
    {
        for primitive in self.primitives.iter().skip(start) {
            host.clear(primitive);
            host.set_active(primitive, false);
        }
    }

    /// Destroy every inactive primitive. Active ones keep their relative order.
    /// Returns how many were removed.
    pub fn trim<H>(&mut self, host: &mut H) -> usize
    where
        H: RenderPrimitiveHost<Handle = P>,
    {
        self.prune_dead(host);

        let (kept, removed): (Vec<P>, Vec<P>) = std::mem::take(&mut self.primitives)
            .into_iter()
            .partition(|p| host.is_active(p));
        let count = removed.len();
        for primitive in removed {
            host.destroy(primitive);
        }
        self.primitives = kept;
        self.meshes.truncate(self.primitives.len());
        if count > 0 {
            log::debug!("primitive pool: trimmed {count} inactive primitive(s)");
        }
        count
    }

    /// Clear every primitive's content and release all mesh buffers.
    pub fn clear<H>(&mut self, host: &mut H)
    where
        H: RenderPrimitiveHost<Handle = P>,
    {
        for primitive in self.primitives.iter() {
            host.clear(primitive);
        }
        self.meshes = Vec::new();
    }
}
