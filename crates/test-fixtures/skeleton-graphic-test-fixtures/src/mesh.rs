//! Quad mesh generator for fixture skeletons.
//!
//! Every attachment is one quad (4 vertices, 2 triangles). Consecutive
//! attachments sharing a material are batched into one submesh; the texture of
//! a submesh is `<material>.png`.

use skeleton_graphic_core::{GenerationOptions, MeshBuffer, MeshGenerator, RenderInstruction, SubmeshInstruction};

use crate::runtime::FixtureSkeleton;

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

#[derive(Clone, Debug)]
struct PosedQuad {
    corners: [[f32; 2]; 4],
}

#[derive(Debug, Default)]
pub struct QuadMeshGenerator {
    posed: Vec<Option<PosedQuad>>,
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
    white: [f32; 4],
    /// Number of `generate_instruction` calls so far.
    pub instructions_built: u32,
}

impl QuadMeshGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeshGenerator<FixtureSkeleton> for QuadMeshGenerator {
    type Material = String;
    type Texture = String;

    fn generate_instruction(
        &mut self,
        instruction: &mut RenderInstruction<String, String>,
        skeleton: &FixtureSkeleton,
        _options: &GenerationOptions,
    ) {
        self.instructions_built += 1;
        instruction.clear();
        self.posed.clear();

        for slot in 0..skeleton.slot_count() {
            let Some(attachment) = skeleton.attachment(slot) else {
                self.posed.push(None);
                continue;
            };
            self.posed.push(Some(PosedQuad {
                corners: skeleton.attachment_corners(slot, attachment),
            }));

            match instruction.submeshes.last_mut() {
                Some(last) if last.material == attachment.material => {
                    last.end_slot = slot + 1;
                    last.raw_vertex_count += 4;
                    last.raw_triangle_count += 2;
                }
                _ => instruction.submeshes.push(SubmeshInstruction {
                    material: attachment.material.clone(),
                    texture: Some(format!("{}.png", attachment.material)),
                    start_slot: slot,
                    end_slot: slot + 1,
                    raw_vertex_count: 4,
                    raw_triangle_count: 2,
                }),
            }
        }
    }

    fn begin(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    fn add_submesh(&mut self, submesh: &SubmeshInstruction<String, String>, options: &GenerationOptions) {
        for slot in submesh.start_slot..submesh.end_slot {
            let Some(Some(quad)) = self.posed.get(slot) else {
                continue;
            };
            let base = self.positions.len() as u32;
            let z = slot as f32 * options.z_spacing;
            self.positions
                .extend(quad.corners.iter().map(|[x, y]| [*x, *y, z]));
            self.uvs.extend_from_slice(&QUAD_UVS);
            self.indices
                .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        self.white = if options.pma_vertex_colors {
            [1.0, 1.0, 1.0, 1.0]
        } else {
            [1.0, 1.0, 1.0, 0.0]
        };
    }

    fn scale_vertex_data(&mut self, factor: f32) {
        for p in self.positions.iter_mut() {
            p[0] *= factor;
            p[1] *= factor;
        }
    }

    fn fill_vertex_data(&mut self, mesh: &mut MeshBuffer) {
        mesh.clear();
        mesh.positions.extend_from_slice(&self.positions);
        mesh.uvs.extend_from_slice(&self.uvs);
    }

    fn fill_triangles(&mut self, mesh: &mut MeshBuffer) {
        mesh.indices.clear();
        mesh.indices.extend_from_slice(&self.indices);
    }

    fn fill_late_vertex_data(&mut self, mesh: &mut MeshBuffer) {
        mesh.colors.clear();
        mesh.colors.resize(mesh.positions.len(), self.white);
    }
}
