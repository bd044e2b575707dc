//! Skeleton Graphic Core (engine-agnostic)
//!
//! Binds a skeletal animation asset to a pool of UI render primitives. The
//! skeletal runtime, the mesh generator and the host renderer are collaborators
//! reached through the traits in [`source`], [`mesh`] and [`primitive`]; this
//! crate owns the per-frame state machine that keeps them in sync:
//!
//! advance (pose) → regenerate (slice into submeshes) → reconcile the primitive
//! pool → fill one mesh buffer per submesh and bind it to its primitive.

pub mod bounds;
pub mod config;
pub mod error;
pub mod graphic;
pub mod hooks;
pub mod ids;
pub mod mesh;
pub mod pool;
pub mod primitive;
pub mod source;

// Re-exports for consumers (adapters)
pub use bounds::{Bounds, RectFit};
pub use config::{ExecutionContext, FrameTime, GenerationOptions, GraphicSettings};
pub use error::{GraphicError, Result};
pub use graphic::{SkeletonGraphic, DEFAULT_PIXELS_PER_UNIT};
pub use hooks::{HookRegistry, UpdateHooks};
pub use ids::HookId;
pub use mesh::{MeshBuffer, MeshGenerator, RenderInstruction, SubmeshInstruction};
pub use pool::PrimitivePool;
pub use primitive::{Canvas, RenderPrimitiveHost};
pub use source::{Animation, AnimationState, Skeleton, SkeletonData, SkeletonDataAsset, SkeletonOf};
