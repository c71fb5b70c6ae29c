//! Error types for the contour-field core.

use thiserror::Error;

/// Errors produced while building grids, surfaces, scenes, or parameters.
///
/// The per-frame path never returns these: extraction, chaining and
/// rendering degrade to defaults instead of failing.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Width or height was zero (or overflowed) when creating a grid or surface.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A parameter was present but outside its accepted range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// Two buffers had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A scene name was not found in the registry.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// Writing a snapshot or other output failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl FieldError {
    /// Shorthand for [`FieldError::InvalidParam`].
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        FieldError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
