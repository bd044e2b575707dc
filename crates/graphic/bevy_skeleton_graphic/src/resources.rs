use bevy::prelude::*;
use skeleton_graphic_core::ExecutionContext;

/// Context every graphic is initialized in. Editors switch this to
/// `Authoring` so starting animations are posed instead of played.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct GraphicExecution(pub ExecutionContext);
