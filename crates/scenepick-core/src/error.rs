//! Error types for scenepick.

use thiserror::Error;

use crate::pick::NodeId;

/// The main error type for scenepick operations.
///
/// Picking itself never fails; these errors come from building and editing
/// scenes and geometry.
#[derive(Error, Debug)]
pub enum ScenePickError {
    /// A flat array does not divide evenly into records of the expected stride.
    #[error("data size mismatch: expected a multiple of {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A mesh face references a point, normal or texture coordinate that does not exist.
    #[error("face {face} references index {index}, but only {len} entries exist")]
    IndexOutOfRange {
        face: usize,
        index: i64,
        len: usize,
    },

    /// Geometry parameters are unusable (negative, non-finite, too few points).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The node id does not belong to this scene graph.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node already has a parent.
    #[error("node {0} already has a parent")]
    AlreadyParented(NodeId),

    /// Attaching the node would make it its own ancestor.
    #[error("attaching node {0} would create a cycle")]
    CycleDetected(NodeId),

    /// Children can only be attached to group nodes.
    #[error("node {0} is not a group")]
    NotAGroup(NodeId),

    /// A clip node must be detached and distinct from the node it clips.
    #[error("node {0} cannot be used as a clip")]
    InvalidClip(NodeId),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for scenepick operations.
pub type Result<T> = std::result::Result<T, ScenePickError>;
