//! SkeletonGraphic: lifecycle, per-frame sequencing and mesh regeneration.
//!
//! Methods:
//! - initialize / clear / set_data_asset (lifecycle)
//! - advance / tick (pose), regenerate (meshes + primitive pool), refresh
//! - trim_primitives, compute_bounds, rect_fit

use std::sync::Arc;

use crate::bounds::{Bounds, RectFit};
use crate::config::{ExecutionContext, FrameTime, GraphicSettings};
use crate::error::Result;
use crate::hooks::UpdateHooks;
use crate::ids::HookId;
use crate::mesh::{MeshBuffer, MeshGenerator, RenderInstruction};
use crate::pool::PrimitivePool;
use crate::primitive::RenderPrimitiveHost;
use crate::source::{Animation, AnimationState, Skeleton, SkeletonData, SkeletonDataAsset, SkeletonOf};

/// Mesh scale used when no enclosing canvas can be resolved.
pub const DEFAULT_PIXELS_PER_UNIT: f32 = 100.0;

/// Skeleton graphic over an asset `A`, a mesh generator `G` and host
/// primitive handles `P`.
///
/// Valid (initialized) exactly while a skeleton instance exists. All per-frame
/// operations are silent no-ops on an invalid graphic.
pub struct SkeletonGraphic<A, G, P>
where
    A: SkeletonDataAsset,
    G: MeshGenerator<SkeletonOf<A>>,
{
    // Configuration
    asset: Option<Arc<A>>,
    settings: GraphicSettings,
    material: Option<G::Material>,

    // Owned pose
    data: Option<Arc<A::Data>>,
    skeleton: Option<SkeletonOf<A>>,
    state: Option<A::State>,
    generation: u64,

    // Mesh generation
    generator: G,
    instruction: RenderInstruction<G::Material, G::Texture>,
    pool: PrimitivePool<P>,

    hooks: UpdateHooks<SkeletonOf<A>>,
}

impl<A, G, P> SkeletonGraphic<A, G, P>
where
    A: SkeletonDataAsset,
    G: MeshGenerator<SkeletonOf<A>>,
    P: Clone + PartialEq + std::fmt::Debug,
{
    /// Create an uninitialized graphic. Call `initialize` before use.
    pub fn new(asset: Option<Arc<A>>, settings: GraphicSettings, generator: G) -> Self {
        Self {
            asset,
            settings,
            material: None,
            data: None,
            skeleton: None,
            state: None,
            generation: 0,
            generator,
            instruction: RenderInstruction::default(),
            pool: PrimitivePool::new(),
            hooks: UpdateHooks::default(),
        }
    }

    /// Material bound to every primitive instead of the submesh's own.
    pub fn with_material(mut self, material: G::Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Adopt primitives that already exist under the graphic's node.
    pub fn with_primitives(mut self, primitives: Vec<P>) -> Self {
        self.pool = PrimitivePool::with_primitives(primitives);
        self
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.skeleton.is_some()
    }

    // ---- accessors ----

    pub fn asset(&self) -> Option<&Arc<A>> {
        self.asset.as_ref()
    }

    pub fn settings(&self) -> &GraphicSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GraphicSettings {
        &mut self.settings
    }

    pub fn material(&self) -> Option<&G::Material> {
        self.material.as_ref()
    }

    pub fn set_material(&mut self, material: Option<G::Material>) {
        self.material = material;
    }

    pub fn skeleton_data(&self) -> Option<&Arc<A::Data>> {
        self.data.as_ref()
    }

    pub fn skeleton(&self) -> Option<&SkeletonOf<A>> {
        self.skeleton.as_ref()
    }

    pub fn skeleton_mut(&mut self) -> Option<&mut SkeletonOf<A>> {
        self.skeleton.as_mut()
    }

    pub fn animation_state(&self) -> Option<&A::State> {
        self.state.as_ref()
    }

    pub fn animation_state_mut(&mut self) -> Option<&mut A::State> {
        self.state.as_mut()
    }

    /// Number of successful initializations so far. Unchanged by no-op calls.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    pub fn instruction(&self) -> &RenderInstruction<G::Material, G::Texture> {
        &self.instruction
    }

    #[inline]
    pub fn submesh_count(&self) -> usize {
        self.instruction.submesh_count()
    }

    pub fn primitives(&self) -> &[P] {
        self.pool.primitives()
    }

    pub fn meshes(&self) -> &[MeshBuffer] {
        self.pool.meshes()
    }

    // ---- hooks ----

    pub fn hooks(&self) -> &UpdateHooks<SkeletonOf<A>> {
        &self.hooks
    }

    /// Runs after the animation state is applied, before world propagation.
    pub fn on_pose_applied<F>(&mut self, callback: F) -> HookId
    where
        F: FnMut(&mut SkeletonOf<A>) + Send + Sync + 'static,
    {
        self.hooks.on_pose_applied(callback)
    }

    /// Runs after world propagation; registering one adds a second pass.
    pub fn on_world_ready<F>(&mut self, callback: F) -> HookId
    where
        F: FnMut(&mut SkeletonOf<A>) + Send + Sync + 'static,
    {
        self.hooks.on_world_ready(callback)
    }

    pub fn on_update_complete<F>(&mut self, callback: F) -> HookId
    where
        F: FnMut(&SkeletonOf<A>) + Send + Sync + 'static,
    {
        self.hooks.on_update_complete(callback)
    }

    pub fn remove_hook(&mut self, id: HookId) -> bool {
        self.hooks.remove(id)
    }

    // ---- lifecycle ----

    /// Build skeleton and animation state from the data asset.
    ///
    /// No-op when already valid and `overwrite` is false. A missing asset,
    /// unloadable skeleton data or an asset without materials leaves the
    /// graphic uninitialized; when overwriting, the previous pose is dropped.
    /// An unknown initial skin is returned as an error and nothing is
    /// committed.
    pub fn initialize(&mut self, overwrite: bool, ctx: ExecutionContext) -> Result<()> {
        if self.is_valid() && !overwrite {
            return Ok(());
        }

        let Some(asset) = self.asset.clone() else {
            log::debug!("skeleton graphic: no data asset; staying uninitialized");
            self.release_pose();
            return Ok(());
        };
        let Some(data) = asset.skeleton_data() else {
            log::debug!("skeleton graphic: skeleton data unavailable");
            self.release_pose();
            return Ok(());
        };
        if !asset.has_usable_material() {
            log::debug!("skeleton graphic: data asset has no usable material");
            self.release_pose();
            return Ok(());
        }
        let Some(mut state) = asset.create_animation_state() else {
            log::debug!("skeleton graphic: animation state could not be created");
            self.release_pose();
            return Ok(());
        };

        let mut skeleton = data.create_skeleton();
        if let Some(skin) = self.settings.initial_skin() {
            skeleton.set_skin(skin)?;
        }

        let mut posed = false;
        if let Some(name) = self.settings.starting_animation() {
            match data.find_animation(name) {
                Some(animation) => {
                    match ctx {
                        ExecutionContext::Live => {
                            state.set_animation(0, name, self.settings.starting_loop)?
                        }
                        ExecutionContext::Authoring => animation.pose(&mut skeleton, 0.0),
                    }
                    posed = true;
                }
                None => log::debug!("skeleton graphic: starting animation '{name}' not found; skipped"),
            }
        }

        self.data = Some(data);
        self.skeleton = Some(skeleton);
        self.state = Some(state);
        self.generation += 1;
        log::debug!("skeleton graphic: initialized (generation {})", self.generation);

        if posed {
            self.step(0.0);
        }
        Ok(())
    }

    fn release_pose(&mut self) {
        self.skeleton = None;
        self.state = None;
        self.data = None;
    }

    /// Drop the pose, clear every primitive's content and release all mesh
    /// buffers. The graphic becomes invalid. Safe to call repeatedly.
    pub fn clear<H>(&mut self, host: &mut H)
    where
        H: RenderPrimitiveHost<Handle = P, Material = G::Material, Texture = G::Texture>,
    {
        self.release_pose();
        self.instruction.clear();
        self.pool.clear(host);
    }

    /// Swap the data asset. A different asset fully clears the graphic, drops
    /// the initial skin (skin names belong to the old data) and reinitializes.
    /// Meshes are rebuilt only when the graphic is not frozen.
    pub fn set_data_asset<H>(
        &mut self,
        asset: Option<Arc<A>>,
        host: &mut H,
        ctx: ExecutionContext,
    ) -> Result<()>
    where
        H: RenderPrimitiveHost<Handle = P, Material = G::Material, Texture = G::Texture>,
    {
        let same = match (&self.asset, &asset) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return Ok(());
        }

        self.asset = asset;
        self.clear(host);
        self.settings.initial_skin = None;
        self.initialize(true, ctx)?;
        if self.is_valid() {
            self.step(0.0);
            self.regenerate(host);
        }
        Ok(())
    }

    /// Drop a starting animation the current skeleton data cannot resolve.
    /// Returns true when the setting was cleared.
    pub fn sanitize_starting_animation(&mut self) -> bool {
        let Some(name) = self.settings.starting_animation() else {
            return false;
        };
        let data = match &self.data {
            Some(d) => Some(d.clone()),
            None => self.asset.as_ref().and_then(|a| a.skeleton_data()),
        };
        let Some(data) = data else {
            return false;
        };
        if data.find_animation(name).is_some() {
            return false;
        }
        self.settings.starting_animation = None;
        true
    }

    // ---- per frame ----

    /// Host frame entry: honors `freeze` and picks scaled or unscaled delta.
    pub fn tick(&mut self, time: &FrameTime) {
        if self.settings.freeze {
            return;
        }
        self.advance(time.select(self.settings.unscaled_time));
    }

    /// Advance animation by `delta` (times the time scale) and pose the
    /// skeleton. No-op when invalid or frozen.
    pub fn advance(&mut self, delta: f32) {
        if self.settings.freeze {
            return;
        }
        self.step(delta);
    }

    /// Re-apply the current pose and rebuild meshes after a settings edit.
    /// The zero-delta pose ignores `freeze`; mesh regeneration honors it.
    pub fn refresh<H>(&mut self, host: &mut H)
    where
        H: RenderPrimitiveHost<Handle = P, Material = G::Material, Texture = G::Texture>,
    {
        if !self.is_valid() {
            return;
        }
        self.step(0.0);
        self.regenerate(host);
    }

    fn step(&mut self, delta: f32) {
        let (Some(skeleton), Some(state)) = (self.skeleton.as_mut(), self.state.as_mut()) else {
            return;
        };

        let delta = delta * self.settings.time_scale;
        skeleton.update(delta);
        state.update(delta);
        state.apply(skeleton);

        if !self.hooks.pose_applied.is_empty() {
            self.hooks.pose_applied.invoke(skeleton);
        }

        skeleton.update_world_transform();

        if !self.hooks.world_ready.is_empty() {
            self.hooks.world_ready.invoke(skeleton);
            skeleton.update_world_transform();
        }

        if !self.hooks.update_complete.is_empty() {
            self.hooks.update_complete.notify(skeleton);
        }
    }

    /// Rebuild submesh geometry from the current pose and bind it to the
    /// primitive pool. No-op when invalid or frozen.
    pub fn regenerate<H>(&mut self, host: &mut H)
    where
        H: RenderPrimitiveHost<Handle = P, Material = G::Material, Texture = G::Texture>,
    {
        if self.settings.freeze {
            return;
        }
        self.rebuild_meshes(host);
    }

    fn rebuild_meshes<H>(&mut self, host: &mut H)
    where
        H: RenderPrimitiveHost<Handle = P, Material = G::Material, Texture = G::Texture>,
    {
        let Some(skeleton) = self.skeleton.as_ref() else {
            return;
        };

        let options = self.settings.mesh;
        self.generator
            .generate_instruction(&mut self.instruction, skeleton, &options);

        let submesh_count = self.instruction.submesh_count();
        self.pool.reconcile(submesh_count, host);

        let scale = host
            .enclosing_canvas()
            .map_or(DEFAULT_PIXELS_PER_UNIT, |c| c.reference_pixels_per_unit);

        let (primitives, meshes) = self.pool.entries_mut();
        for (i, submesh) in self.instruction.submeshes.iter().enumerate() {
            let mesh = &mut meshes[i];
            self.generator.begin();
            self.generator.add_submesh(submesh, &options);
            self.generator.scale_vertex_data(scale);
            self.generator.fill_vertex_data(mesh);
            self.generator.fill_triangles(mesh);
            self.generator.fill_late_vertex_data(mesh);

            let primitive = &primitives[i];
            let material = self.material.as_ref().unwrap_or(&submesh.material);
            host.set_active(primitive, true);
            host.set_mesh(primitive, mesh);
            host.set_material_count(primitive, 1);
            host.set_material(primitive, material, submesh.texture.as_ref());
        }

        self.pool.deactivate_from(submesh_count, host);
    }

    /// Destroy inactive primitives; they are recreated on demand.
    pub fn trim_primitives<H>(&mut self, host: &mut H) -> usize
    where
        H: RenderPrimitiveHost<Handle = P, Material = G::Material, Texture = G::Texture>,
    {
        self.pool.trim(host)
    }

    // ---- queries ----

    /// Union of the origin and every active submesh's bounds. Initializes
    /// (without overwrite) and regenerates first; zero-size when nothing is
    /// drawn.
    pub fn compute_bounds<H>(&mut self, host: &mut H, ctx: ExecutionContext) -> Result<Bounds>
    where
        H: RenderPrimitiveHost<Handle = P, Material = G::Material, Texture = G::Texture>,
    {
        self.initialize(false, ctx)?;
        self.rebuild_meshes(host);
        if !self.is_valid() {
            return Ok(Bounds::ZERO);
        }

        // the accumulator starts at the origin, so the origin is always inside
        let submesh_count = self.instruction.submesh_count();
        let mut bounds = Bounds::ZERO;
        for i in 0..submesh_count {
            let Some(mesh) = self.pool.mesh_mut(i) else {
                break;
            };
            bounds = bounds.union(&mesh.recalculate_bounds());
        }
        Ok(bounds)
    }

    /// Rect size and pivot that frame the current mesh bounds.
    pub fn rect_fit<H>(&mut self, host: &mut H, ctx: ExecutionContext) -> Result<RectFit>
    where
        H: RenderPrimitiveHost<Handle = P, Material = G::Material, Texture = G::Texture>,
    {
        let bounds = self.compute_bounds(host, ctx)?;
        Ok(RectFit::from_bounds(&bounds))
    }
}
