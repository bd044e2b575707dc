//! Error type shared by the core and the collaborator traits.

use thiserror::Error;

/// Failures surfaced to the caller. Missing data assets and unresolvable
/// starting animations are not errors: those paths leave the graphic
/// uninitialized or skip the step silently.
#[derive(Debug, Error)]
pub enum GraphicError {
    #[error("skin not found: {0}")]
    SkinNotFound(String),

    #[error("animation not found: {0}")]
    AnimationNotFound(String),

    #[error("invalid graphic settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphicError>;
