use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tuple::Tuple3D;

/// Errors raised while tracing rays.
///
/// These all indicate a malformed scene. The tracer never recovers from them;
/// a single error aborts the whole render.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("ray direction has zero length")]
    ZeroDirection,

    #[error("sphere radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("ellipsoid semi-axes must be positive, got {0:?}")]
    NonPositiveAxis(Tuple3D),

    #[error("plane basis vectors are parallel or zero")]
    DegeneratePlane,

    #[error("view and up directions do not span an image plane")]
    DegenerateView,

    #[error("{kind} index {index} is out of range (mesh holds {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("shape {shape} has no material bound")]
    MissingMaterial { shape: usize },

    #[error("collision carries no usable material")]
    UnresolvedMaterial,

    #[error("texture {texture} does not exist")]
    MissingTexture { texture: usize },
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Errors raised while loading a scene and its resources.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed PPM image: {0}")]
    Ppm(String),

    #[error("malformed OBJ file {path:?}, line {line}: {reason}")]
    Obj {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid scene: {0}")]
    Invalid(String),
}

impl SceneError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> SceneError {
        SceneError::Io { path: path.into(), source }
    }
}
