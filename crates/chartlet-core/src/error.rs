//! Error types for surface resolution and frame drawing.

use thiserror::Error;

/// Fatal configuration failures raised from `Canvas` construction.
///
/// A canvas that fails to construct must not be used; there is no
/// half-initialized state to recover.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither a context nor an element reference resolved to a surface.
    #[error("Please specify the id or el of the chart!")]
    MissingSurface,

    /// The resolved surface did not yield a 2d context.
    #[error("the resolved surface did not yield a 2d context")]
    MissingContext,
}

/// A failure raised by a child node's draw call.
///
/// Contained at the canvas: the frame aborts early, the error is logged,
/// and the `draw()` caller is never interrupted.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DrawError {
    message: String,
}

impl DrawError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for DrawError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for DrawError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
