//! Shared fixtures for skeleton graphic tests and benches.
//!
//! Skeleton definitions and settings live as JSON under the workspace
//! `fixtures/` directory and are looked up by name through `manifest.json`.
//! The crate also provides reference collaborators: a small 2D skeleton
//! runtime ([`runtime`]), a quad mesh generator ([`mesh`]) and a host that
//! records every primitive operation ([`host`]).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use skeleton_graphic_core::{GraphicSettings, SkeletonGraphic};

pub mod host;
pub mod mesh;
pub mod runtime;

pub use host::{PrimitiveHandle, RecordedPrimitive, RecordingHost};
pub use mesh::QuadMeshGenerator;
pub use runtime::{
    FixtureAnimation, FixtureAsset, FixtureSkeleton, FixtureSkeletonData, FixtureState,
    SkeletonDef,
};

/// Graphic wired to the fixture collaborators.
pub type FixtureGraphic = SkeletonGraphic<FixtureAsset, QuadMeshGenerator, PrimitiveHandle>;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    skeletons: HashMap<String, String>,
    #[serde(default)]
    settings: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod skeletons {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.skeletons.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.skeletons, "skeleton", name)?;
        read_to_string(rel)
    }

    pub fn def(name: &str) -> Result<SkeletonDef> {
        let rel = lookup(&MANIFEST.skeletons, "skeleton", name)?;
        load_json(rel)
    }

    /// Asset backed by the named skeleton.
    pub fn asset(name: &str) -> Result<FixtureAsset> {
        FixtureAsset::from_def(def(name)?)
    }
}

pub mod settings {
    use super::*;

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.settings, "settings", name)?;
        read_to_string(rel)
    }

    pub fn load(name: &str) -> Result<GraphicSettings> {
        let text = json(name)?;
        GraphicSettings::from_json(&text)
            .with_context(|| format!("failed to parse settings fixture {name}"))
    }
}

/// Uninitialized graphic over the named skeleton fixture.
pub fn graphic(skeleton: &str, settings: GraphicSettings) -> Result<FixtureGraphic> {
    graphic_with(skeleton, settings)
}

/// Same as [`graphic`] for hosts with their own primitive handle type.
pub fn graphic_with<P>(
    skeleton: &str,
    settings: GraphicSettings,
) -> Result<SkeletonGraphic<FixtureAsset, QuadMeshGenerator, P>>
where
    P: Clone + PartialEq + std::fmt::Debug,
{
    let asset = skeletons::asset(skeleton)?;
    Ok(SkeletonGraphic::new(
        Some(Arc::new(asset)),
        settings,
        QuadMeshGenerator::default(),
    ))
}
