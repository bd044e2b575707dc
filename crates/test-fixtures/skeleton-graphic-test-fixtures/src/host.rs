//! Render primitive host that records what was done to each primitive.

use skeleton_graphic_core::{Canvas, MeshBuffer, RenderPrimitiveHost};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveHandle(pub u32);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordedPrimitive {
    pub name: String,
    pub active: bool,
    pub alive: bool,
    pub vertex_count: usize,
    pub index_count: usize,
    pub material_count: usize,
    pub material: Option<String>,
    pub texture: Option<String>,
    pub clears: u32,
    /// First vertex position of the last mesh set, if any.
    pub first_vertex: Option<[f32; 3]>,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    primitives: Vec<RecordedPrimitive>,
    pub canvas: Option<Canvas>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(reference_pixels_per_unit: f32) -> Self {
        Self {
            primitives: Vec::new(),
            canvas: Some(Canvas {
                reference_pixels_per_unit,
            }),
        }
    }

    pub fn primitive(&self, handle: PrimitiveHandle) -> &RecordedPrimitive {
        &self.primitives[handle.0 as usize]
    }

    /// Total primitives ever created, destroyed ones included.
    pub fn created(&self) -> usize {
        self.primitives.len()
    }

    pub fn alive_count(&self) -> usize {
        self.primitives.iter().filter(|p| p.alive).count()
    }

    /// Simulate the scene destroying a primitive behind the graphic's back.
    pub fn destroy_externally(&mut self, handle: PrimitiveHandle) {
        self.primitives[handle.0 as usize].alive = false;
    }

    pub fn active_flags(&self, handles: &[PrimitiveHandle]) -> Vec<bool> {
        handles.iter().map(|h| self.primitive(*h).active).collect()
    }

    fn get_mut(&mut self, handle: &PrimitiveHandle) -> &mut RecordedPrimitive {
        &mut self.primitives[handle.0 as usize]
    }
}

impl RenderPrimitiveHost for RecordingHost {
    type Handle = PrimitiveHandle;
    type Material = String;
    type Texture = String;

    fn create_primitive(&mut self, name: &str) -> PrimitiveHandle {
        let handle = PrimitiveHandle(self.primitives.len() as u32);
        self.primitives.push(RecordedPrimitive {
            name: name.to_string(),
            alive: true,
            ..Default::default()
        });
        handle
    }

    fn set_mesh(&mut self, primitive: &PrimitiveHandle, mesh: &MeshBuffer) {
        let p = self.get_mut(primitive);
        p.vertex_count = mesh.vertex_count();
        p.index_count = mesh.indices.len();
        p.first_vertex = mesh.positions.first().copied();
    }

    fn set_material_count(&mut self, primitive: &PrimitiveHandle, count: usize) {
        self.get_mut(primitive).material_count = count;
    }

    fn set_material(&mut self, primitive: &PrimitiveHandle, material: &String, texture: Option<&String>) {
        let p = self.get_mut(primitive);
        p.material = Some(material.clone());
        p.texture = texture.cloned();
    }

    fn clear(&mut self, primitive: &PrimitiveHandle) {
        let p = self.get_mut(primitive);
        p.vertex_count = 0;
        p.index_count = 0;
        p.material_count = 0;
        p.material = None;
        p.texture = None;
        p.first_vertex = None;
        p.clears += 1;
    }

    fn set_active(&mut self, primitive: &PrimitiveHandle, active: bool) {
        self.get_mut(primitive).active = active;
    }

    fn is_active(&self, primitive: &PrimitiveHandle) -> bool {
        self.primitive(*primitive).active
    }

    fn destroy(&mut self, primitive: PrimitiveHandle) {
        let p = self.get_mut(&primitive);
        p.alive = false;
        p.active = false;
    }

    fn contains(&self, primitive: &PrimitiveHandle) -> bool {
        self.primitive(*primitive).alive
    }

    fn enclosing_canvas(&self) -> Option<Canvas> {
        self.canvas
    }
}
