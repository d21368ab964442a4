use thiserror::Error;

/// Scene construction failures.
///
/// Intersection misses and absorbed rays are not errors; these are reported
/// only while a scene is being assembled.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("cannot build a BVH over an empty object list")]
    EmptyBvh,

    #[error("object {index} ({kind}) has no bounding box and cannot be placed in a BVH")]
    MissingBoundingBox { index: usize, kind: &'static str },

    #[error("light set is empty")]
    EmptyLightSet,

    #[error("light {index} ({kind}) has no bounding box")]
    LightMissingBoundingBox { index: usize, kind: &'static str },

    #[error("light {index} ({kind}) has zero area and cannot be sampled")]
    DegenerateLight { index: usize, kind: &'static str },

    #[error("medium density must be positive and finite, got {0}")]
    InvalidDensity(f32),
}

pub type SceneResult<T> = Result<T, SceneError>;
