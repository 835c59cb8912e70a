//! Error types

use crate::float_types::Real;
use crate::scene::{FragmentId, NodeId};
use nalgebra::Point3;

/// Geometry validation issues. Returned instead of storing bad input in a tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (TooFewPoints) A polygon needs at least three vertices
    #[error("(TooFewPoints) A polygon has fewer than 3 vertices at: {0}")]
    TooFewPoints(Point3<Real>),
    /// (DegeneratePolygon) The vertices do not span a plane
    #[error("(DegeneratePolygon) Vertices do not define a plane at: {0}")]
    DegeneratePolygon(Point3<Real>),
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
}

/// A colour string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("Bad Hex Number: {0}")]
    BadHex(String),
}

/// Reasons a fragment contributes no triangles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("fragment {0:?} has no position data")]
    MissingPositions(FragmentId),
    #[error("fragment {0:?} has no index data")]
    MissingIndices(FragmentId),
    #[error("fragment {fragment:?} declares a stride of {stride}, need at least 3")]
    BadStride { fragment: FragmentId, stride: usize },
    #[error("fragment {fragment:?} references vertex {vertex} beyond its position buffer")]
    IndexOutOfRange { fragment: FragmentId, vertex: usize },
    #[error("fragment {fragment:?} draw range {start}..{end} exceeds {len} indices")]
    RangeOutOfBounds {
        fragment: FragmentId,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Errors that stop the wall-floor pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The model was unloaded before the pipeline finished
    #[error("pipeline cancelled after {completed} of {total} slabs")]
    Cancelled { completed: usize, total: usize },
}

/// Errors raised by the interaction layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    #[error("no floor at index {index} (have {len})")]
    UnknownFloor { index: usize, len: usize },
    #[error("node {0:?} is not a floor of this model")]
    UnknownFloorNode(NodeId),
}
