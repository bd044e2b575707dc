//! Minimal 2D skeleton runtime used as the animation source in tests.
//!
//! Bones carry a local transform (translation, rotation in degrees, scale)
//! and a world affine `[a, b, c, d, x, y]`. Skins map slot names to quad
//! attachments; the `default` skin is the fallback for every other skin.
//! Animations are linear rotate/translate timelines in seconds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use hashbrown::HashMap;
use serde::Deserialize;

use skeleton_graphic_core::{
    Animation, AnimationState, GraphicError, Skeleton, SkeletonData, SkeletonDataAsset,
};

const DEFAULT_SKIN: &str = "default";

fn one() -> f32 {
    1.0
}

#[derive(Clone, Debug, Deserialize)]
pub struct SkeletonDef {
    pub name: String,
    #[serde(default)]
    pub materials: Vec<String>,
    pub bones: Vec<BoneDef>,
    pub slots: Vec<SlotDef>,
    #[serde(default)]
    pub skins: HashMap<String, HashMap<String, AttachmentDef>>,
    #[serde(default)]
    pub animations: Vec<AnimationDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BoneDef {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "one")]
    pub scale_x: f32,
    #[serde(default = "one")]
    pub scale_y: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SlotDef {
    pub name: String,
    pub bone: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AttachmentDef {
    pub width: f32,
    pub height: f32,
    pub material: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnimationDef {
    pub name: String,
    pub duration: f32,
    #[serde(default)]
    pub timelines: Vec<TimelineDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TimelineDef {
    pub bone: String,
    /// `[time, degrees]` keys.
    #[serde(default)]
    pub rotate: Vec<[f32; 2]>,
    /// `[time, x, y]` keys.
    #[serde(default)]
    pub translate: Vec<[f32; 3]>,
}

/// Resolved skeleton data: bone/slot names replaced by indices.
#[derive(Debug)]
pub struct FixtureSkeletonData {
    def: Arc<SkeletonDef>,
    parents: Vec<Option<usize>>,
    slot_bones: Vec<usize>,
    animations: Vec<FixtureAnimation>,
}

impl FixtureSkeletonData {
    /// Parents must be listed before their children.
    pub fn from_def(def: SkeletonDef) -> Result<Self> {
        let bone_index = |name: &str| def.bones.iter().position(|b| b.name == name);

        let mut parents = Vec::with_capacity(def.bones.len());
        for (i, bone) in def.bones.iter().enumerate() {
            let parent = match &bone.parent {
                Some(p) => {
                    let idx = bone_index(p)
                        .ok_or_else(|| anyhow!("bone '{}' has unknown parent '{p}'", bone.name))?;
                    if idx >= i {
                        return Err(anyhow!("bone '{}' listed before its parent", bone.name));
                    }
                    Some(idx)
                }
                None => None,
            };
            parents.push(parent);
        }

        let slot_bones = def
            .slots
            .iter()
            .map(|s| {
                bone_index(&s.bone)
                    .ok_or_else(|| anyhow!("slot '{}' has unknown bone '{}'", s.name, s.bone))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut animations = Vec::with_capacity(def.animations.len());
        for anim in &def.animations {
            let mut timelines = Vec::with_capacity(anim.timelines.len());
            for tl in &anim.timelines {
                let bone = bone_index(&tl.bone).ok_or_else(|| {
                    anyhow!("animation '{}' targets unknown bone '{}'", anim.name, tl.bone)
                })?;
                timelines.push((bone, tl.clone()));
            }
            animations.push(FixtureAnimation {
                name: anim.name.clone(),
                duration: anim.duration,
                timelines,
            });
        }

        Ok(Self {
            def: Arc::new(def),
            parents,
            slot_bones,
            animations,
        })
    }

    pub fn def(&self) -> &SkeletonDef {
        &self.def
    }

    fn animation_index(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|a| a.name == name)
    }
}

impl SkeletonData for FixtureSkeletonData {
    type Skeleton = FixtureSkeleton;
    type Animation = FixtureAnimation;

    fn create_skeleton(&self) -> FixtureSkeleton {
        FixtureSkeleton::new(self)
    }

    fn find_animation(&self, name: &str) -> Option<&FixtureAnimation> {
        self.animations.iter().find(|a| a.name == name)
    }
}

#[derive(Clone, Debug)]
pub struct FixtureAnimation {
    name: String,
    duration: f32,
    timelines: Vec<(usize, TimelineDef)>,
}

impl FixtureAnimation {
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

fn sample<const N: usize>(keys: &[[f32; N]], time: f32) -> Option<[f32; N]> {
    let first = keys.first()?;
    let last = keys.last()?;
    if time <= first[0] {
        return Some(*first);
    }
    if time >= last[0] {
        return Some(*last);
    }
    let seg = keys.windows(2).find(|w| time >= w[0][0] && time <= w[1][0])?;
    let (a, b) = (seg[0], seg[1]);
    let span = b[0] - a[0];
    let u = if span > 0.0 { (time - a[0]) / span } else { 0.0 };
    let mut out = a;
    for i in 1..N {
        out[i] = a[i] + (b[i] - a[i]) * u;
    }
    out[0] = time;
    Some(out)
}

impl Animation<FixtureSkeleton> for FixtureAnimation {
    fn name(&self) -> &str {
        &self.name
    }

    fn pose(&self, skeleton: &mut FixtureSkeleton, time: f32) {
        for (bone, tl) in &self.timelines {
            let setup = &skeleton.def.bones[*bone];
            let (sx, sy, sr) = (setup.x, setup.y, setup.rotation);
            let pose = &mut skeleton.bones[*bone];
            if let Some([_, degrees]) = sample(&tl.rotate, time) {
                pose.rotation = sr + degrees;
            }
            if let Some([_, x, y]) = sample(&tl.translate, time) {
                pose.x = sx + x;
                pose.y = sy + y;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BonePose {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// World affine `[a, b, c, d, x, y]`.
    pub world: [f32; 6],
}

impl BonePose {
    fn setup(def: &BoneDef) -> Self {
        Self {
            x: def.x,
            y: def.y,
            rotation: def.rotation,
            scale_x: def.scale_x,
            scale_y: def.scale_y,
            world: [1.0, 0.0, 0.0, 1.0, def.x, def.y],
        }
    }

    fn local(&self) -> [f32; 6] {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        [
            cos * self.scale_x,
            -sin * self.scale_y,
            sin * self.scale_x,
            cos * self.scale_y,
            self.x,
            self.y,
        ]
    }
}

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Posed skeleton instance.
#[derive(Clone, Debug)]
pub struct FixtureSkeleton {
    def: Arc<SkeletonDef>,
    parents: Vec<Option<usize>>,
    slot_bones: Vec<usize>,
    pub bones: Vec<BonePose>,
    skin: Option<String>,
    /// Accumulated `update` time.
    pub time: f32,
    /// Number of `update_world_transform` calls so far.
    pub world_passes: u32,
    serial: u64,
}

impl FixtureSkeleton {
    fn new(data: &FixtureSkeletonData) -> Self {
        let mut skeleton = Self {
            def: data.def.clone(),
            parents: data.parents.clone(),
            slot_bones: data.slot_bones.clone(),
            bones: data.def.bones.iter().map(BonePose::setup).collect(),
            skin: None,
            time: 0.0,
            world_passes: 0,
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
        };
        // Setup-pose world transforms; not counted as a pass.
        skeleton.propagate();
        skeleton
    }

    fn propagate(&mut self) {
        for i in 0..self.bones.len() {
            let [la, lb, lc, ld, lx, ly] = self.bones[i].local();
            let world = match self.parents[i] {
                Some(p) => {
                    let [pa, pb, pc, pd, px, py] = self.bones[p].world;
                    [
                        pa * la + pb * lc,
                        pa * lb + pb * ld,
                        pc * la + pd * lc,
                        pc * lb + pd * ld,
                        pa * lx + pb * ly + px,
                        pc * lx + pd * ly + py,
                    ]
                }
                None => [la, lb, lc, ld, lx, ly],
            };
            self.bones[i].world = world;
        }
    }

    /// Unique per constructed instance.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn skin(&self) -> Option<&str> {
        self.skin.as_deref()
    }

    pub fn bone(&self, name: &str) -> Option<&BonePose> {
        let idx = self.def.bones.iter().position(|b| b.name == name)?;
        self.bones.get(idx)
    }

    pub fn bone_mut(&mut self, name: &str) -> Option<&mut BonePose> {
        let idx = self.def.bones.iter().position(|b| b.name == name)?;
        self.bones.get_mut(idx)
    }

    pub fn slot_count(&self) -> usize {
        self.def.slots.len()
    }

    pub fn reset_to_setup_pose(&mut self) {
        for (pose, def) in self.bones.iter_mut().zip(self.def.bones.iter()) {
            let world = pose.world;
            *pose = BonePose::setup(def);
            pose.world = world;
        }
    }

    /// Attachment shown in `slot`: the active skin first, then `default`.
    pub fn attachment(&self, slot: usize) -> Option<&AttachmentDef> {
        let name = &self.def.slots.get(slot)?.name;
        self.skin
            .as_deref()
            .and_then(|skin| self.def.skins.get(skin))
            .and_then(|entries| entries.get(name))
            .or_else(|| {
                self.def
                    .skins
                    .get(DEFAULT_SKIN)
                    .and_then(|entries| entries.get(name))
            })
    }

    /// World-space corners of the attachment quad centered on the slot's bone.
    pub fn attachment_corners(&self, slot: usize, attachment: &AttachmentDef) -> [[f32; 2]; 4] {
        let [a, b, c, d, wx, wy] = self.bones[self.slot_bones[slot]].world;
        let (hw, hh) = (attachment.width * 0.5, attachment.height * 0.5);
        [[-hw, -hh], [hw, -hh], [hw, hh], [-hw, hh]].map(|[x, y]| [a * x + b * y + wx, c * x + d * y + wy])
    }
}

impl Skeleton for FixtureSkeleton {
    fn set_skin(&mut self, name: &str) -> skeleton_graphic_core::Result<()> {
        if !self.def.skins.contains_key(name) {
            return Err(GraphicError::SkinNotFound(name.to_string()));
        }
        self.skin = Some(name.to_string());
        Ok(())
    }

    fn update(&mut self, delta: f32) {
        self.time += delta;
    }

    fn update_world_transform(&mut self) {
        self.propagate();
        self.world_passes += 1;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackEntry {
    pub animation: String,
    pub looping: bool,
    pub time: f32,
    duration: f32,
}

/// Track-based playback over fixture animations.
#[derive(Debug)]
pub struct FixtureState {
    data: Arc<FixtureSkeletonData>,
    tracks: Vec<Option<TrackEntry>>,
    /// Number of `apply` calls so far.
    pub applied: u32,
}

impl FixtureState {
    pub fn new(data: Arc<FixtureSkeletonData>) -> Self {
        Self {
            data,
            tracks: Vec::new(),
            applied: 0,
        }
    }

    pub fn track(&self, index: usize) -> Option<&TrackEntry> {
        self.tracks.get(index).and_then(Option::as_ref)
    }
}

impl AnimationState<FixtureSkeleton> for FixtureState {
    fn update(&mut self, delta: f32) {
        for entry in self.tracks.iter_mut().flatten() {
            entry.time += delta;
            if !entry.looping && entry.time > entry.duration {
                entry.time = entry.duration;
            }
        }
    }

    fn apply(&mut self, skeleton: &mut FixtureSkeleton) -> bool {
        self.applied += 1;
        // An empty state leaves the pose alone.
        if self.tracks.iter().all(Option::is_none) {
            return false;
        }
        skeleton.reset_to_setup_pose();
        let mut any = false;
        for entry in self.tracks.iter().flatten() {
            let Some(idx) = self.data.animation_index(&entry.animation) else {
                continue;
            };
            let time = if entry.looping && entry.duration > 0.0 {
                entry.time % entry.duration
            } else {
                entry.time
            };
            self.data.animations[idx].pose(skeleton, time);
            any = true;
        }
        any
    }

    fn set_animation(
        &mut self,
        track: usize,
        name: &str,
        looping: bool,
    ) -> skeleton_graphic_core::Result<()> {
        let idx = self
            .data
            .animation_index(name)
            .ok_or_else(|| GraphicError::AnimationNotFound(name.to_string()))?;
        if self.tracks.len() <= track {
            self.tracks.resize(track + 1, None);
        }
        self.tracks[track] = Some(TrackEntry {
            animation: name.to_string(),
            looping,
            time: 0.0,
            duration: self.data.animations[idx].duration,
        });
        Ok(())
    }
}

/// Data asset over fixture skeleton data.
#[derive(Debug, Clone)]
pub struct FixtureAsset {
    data: Option<Arc<FixtureSkeletonData>>,
    materials: Vec<String>,
    state_available: bool,
}

impl FixtureAsset {
    pub fn from_def(def: SkeletonDef) -> Result<Self> {
        let materials = def.materials.clone();
        Ok(Self {
            data: Some(Arc::new(FixtureSkeletonData::from_def(def)?)),
            materials,
            state_available: true,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_def(serde_json::from_str(text)?)
    }

    /// Asset whose skeleton data fails to load.
    pub fn unloadable() -> Self {
        Self {
            data: None,
            materials: vec!["missing".to_string()],
            state_available: true,
        }
    }

    pub fn without_materials(mut self) -> Self {
        self.materials.clear();
        self
    }

    pub fn without_animation_state(mut self) -> Self {
        self.state_available = false;
        self
    }
}

impl SkeletonDataAsset for FixtureAsset {
    type Data = FixtureSkeletonData;
    type State = FixtureState;

    fn skeleton_data(&self) -> Option<Arc<FixtureSkeletonData>> {
        self.data.clone()
    }

    fn has_usable_material(&self) -> bool {
        !self.materials.is_empty()
    }

    fn create_animation_state(&self) -> Option<FixtureState> {
        if !self.state_available {
            return None;
        }
        self.data.clone().map(FixtureState::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> FixtureSkeletonData {
        FixtureSkeletonData::from_def(crate::skeletons::def("hero").unwrap()).unwrap()
    }

    #[test]
    fn world_transform_chains_parents() {
        let data = hero();
        let mut sk = data.create_skeleton();
        sk.update_world_transform();
        let arm = sk.bone("arm").unwrap();
        assert_eq!(arm.world[4], 5.0);
        assert_eq!(arm.world[5], 30.0);
        assert_eq!(sk.world_passes, 1);
    }

    #[test]
    fn unknown_skin_is_an_error() {
        let mut sk = hero().create_skeleton();
        let err = sk.set_skin("ghost").unwrap_err();
        assert!(matches!(err, GraphicError::SkinNotFound(name) if name == "ghost"));
        assert!(sk.skin().is_none());
    }

    #[test]
    fn skin_falls_back_to_default_entries() {
        let mut sk = hero().create_skeleton();
        assert!(sk.attachment(2).is_none());
        sk.set_skin("armored").unwrap();
        assert_eq!(sk.attachment(0).unwrap().material, "body");
        assert_eq!(sk.attachment(2).unwrap().material, "gear");
    }

    #[test]
    fn looping_track_wraps_time() {
        let data = Arc::new(hero());
        let mut state = FixtureState::new(data.clone());
        let mut sk = data.create_skeleton();
        state.set_animation(0, "wave", true).unwrap();
        state.update(1.5);
        state.apply(&mut sk);
        assert!((sk.bone("arm").unwrap().rotation - 45.0).abs() < 1e-4);
    }

    #[test]
    fn parent_must_precede_child() {
        let def: SkeletonDef = serde_json::from_str(
            r#"{ "name": "bad", "bones": [ { "name": "a", "parent": "b" }, { "name": "b" } ], "slots": [] }"#,
        )
        .unwrap();
        assert!(FixtureSkeletonData::from_def(def).is_err());
    }
}
