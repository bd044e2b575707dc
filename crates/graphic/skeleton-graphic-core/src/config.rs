//! Persisted configuration for a skeleton graphic.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Serialized settings of one graphic. Everything an inspector edits lives
/// here except the data asset, the material override and the primitive list,
/// which the graphic holds directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicSettings {
    /// Skin applied right after the skeleton instance is created.
    pub initial_skin: Option<String>,
    /// Animation started on track 0 (live) or posed at time zero (authoring).
    pub starting_animation: Option<String>,
    pub starting_loop: bool,
    /// Multiplier applied to every delta passed to `advance`.
    pub time_scale: f32,
    /// Use the host's unscaled frame delta in `tick`.
    pub unscaled_time: bool,
    /// Hold the last rendered state; skips advance and regenerate.
    pub freeze: bool,
    /// Options handed to the mesh generator as-is.
    pub mesh: GenerationOptions,
}

impl Default for GraphicSettings {
    fn default() -> Self {
        Self {
            initial_skin: None,
            starting_animation: None,
            starting_loop: false,
            time_scale: 1.0,
            unscaled_time: true,
            freeze: false,
            mesh: GenerationOptions::default(),
        }
    }
}

impl GraphicSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn initial_skin(&self) -> Option<&str> {
        non_empty(self.initial_skin.as_deref())
    }

    pub fn starting_animation(&self) -> Option<&str> {
        non_empty(self.starting_animation.as_deref())
    }
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.is_empty())
}

/// Mesh generation options. The graphic never interprets these; they are
/// forwarded to the [`MeshGenerator`](crate::mesh::MeshGenerator).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub use_clipping: bool,
    /// Depth offset between consecutive attachments.
    pub z_spacing: f32,
    pub pma_vertex_colors: bool,
    pub tint_black: bool,
    pub calculate_tangents: bool,
    pub add_normals: bool,
    pub immutable_triangles: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            use_clipping: true,
            z_spacing: 0.0,
            pma_vertex_colors: true,
            tint_black: false,
            calculate_tangents: false,
            add_normals: false,
            immutable_triangles: false,
        }
    }
}

/// Where initialization happens. `Live` starts playback of the starting
/// animation; `Authoring` only poses the skeleton at time zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionContext {
    #[default]
    Live,
    Authoring,
}

/// Frame deltas supplied by the host loop, in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub delta: f32,
    pub unscaled_delta: f32,
}

impl FrameTime {
    pub fn new(delta: f32, unscaled_delta: f32) -> Self {
        Self {
            delta,
            unscaled_delta,
        }
    }

    /// Delta selected by the `unscaled_time` setting.
    #[inline]
    pub fn select(&self, unscaled: bool) -> f32 {
        if unscaled {
            self.unscaled_delta
        } else {
            self.delta
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_inspector_defaults() {
        let s = GraphicSettings::default();
        assert_eq!(s.time_scale, 1.0);
        assert!(s.unscaled_time);
        assert!(!s.freeze);
        assert!(s.mesh.use_clipping);
        assert!(s.mesh.pma_vertex_colors);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s = GraphicSettings::from_json(r#"{ "starting_animation": "walk", "time_scale": 2.0 }"#)
            .unwrap();
        assert_eq!(s.starting_animation(), Some("walk"));
        assert_eq!(s.time_scale, 2.0);
        assert!(s.unscaled_time);
        assert_eq!(s.mesh, GenerationOptions::default());
    }

    #[test]
    fn malformed_json_is_a_settings_error() {
        let err = GraphicSettings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::GraphicError::Settings(_)));
    }

    #[test]
    fn empty_names_read_as_absent() {
        let s = GraphicSettings {
            initial_skin: Some(String::new()),
            starting_animation: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(s.initial_skin(), None);
        assert_eq!(s.starting_animation(), None);
    }

    #[test]
    fn frame_time_selects_by_flag() {
        let t = FrameTime::new(0.5, 0.25);
        assert_eq!(t.select(false), 0.5);
        assert_eq!(t.select(true), 0.25);
    }
}
