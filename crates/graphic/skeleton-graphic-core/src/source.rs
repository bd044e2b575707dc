//! Animation source traits.
//!
//! The skeletal runtime is external; adapters implement these traits for it.
//! A [`SkeletonDataAsset`] resolves immutable [`SkeletonData`], which creates
//! posable [`Skeleton`] instances. An [`AnimationState`] advances track times
//! and writes its pose onto a skeleton.

use std::sync::Arc;

use crate::error::Result;

/// Skeleton instance type produced by an asset's skeleton data.
pub type SkeletonOf<A> = <<A as SkeletonDataAsset>::Data as SkeletonData>::Skeleton;

/// Authored asset bundling skeleton data, atlas materials and the mix
/// configuration used to build animation states.
pub trait SkeletonDataAsset {
    type Data: SkeletonData;
    type State: AnimationState<<Self::Data as SkeletonData>::Skeleton>;

    /// Resolve (loading if needed) the skeleton data; `None` when unloadable.
    fn skeleton_data(&self) -> Option<Arc<Self::Data>>;

    /// True when at least one atlas with at least one material is present.
    fn has_usable_material(&self) -> bool;

    /// Fresh animation state built from the asset's mix configuration.
    fn create_animation_state(&self) -> Option<Self::State>;
}

/// Immutable bind pose, hierarchy, skins and animations.
pub trait SkeletonData {
    type Skeleton: Skeleton;
    type Animation: Animation<Self::Skeleton>;

    fn create_skeleton(&self) -> Self::Skeleton;

    fn find_animation(&self, name: &str) -> Option<&Self::Animation>;
}

pub trait Animation<S> {
    fn name(&self) -> &str;

    /// Write this animation's values at `time` onto the skeleton's local pose.
    fn pose(&self, skeleton: &mut S, time: f32);
}

/// Mutable posed skeleton.
pub trait Skeleton {
    /// Fails with `GraphicError::SkinNotFound` when the name is unknown.
    fn set_skin(&mut self, name: &str) -> Result<()>;

    /// Advance internal timers (physics, procedural constraints).
    fn update(&mut self, delta: f32);

    /// Propagate local transforms to world space across the hierarchy.
    fn update_world_transform(&mut self);
}

/// Per-instance playback state.
pub trait AnimationState<S> {
    fn update(&mut self, delta: f32);

    /// Apply the current pose onto the skeleton's local transforms. Returns
    /// true when anything was applied.
    fn apply(&mut self, skeleton: &mut S) -> bool;

    fn set_animation(&mut self, track: usize, name: &str, looping: bool) -> Result<()>;
}
