use std::fmt;
use thiserror::Error;

/// Result type for mesh construction
pub type BuildResult<T> = Result<T, BuildError>;

/// Structural problems with the caller-supplied contour or height profile
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidContourError {
    #[error("contour needs at least 3 points, got {found}")]
    TooFewPoints { found: usize },

    #[error("contour point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("height profile has {found} heights for a {expected}-point contour")]
    HeightCountMismatch { expected: usize, found: usize },

    #[error("height {height} at vertex {index} is negative")]
    NegativeHeight { index: usize, height: f64 },

    #[error("height at vertex {index} is not finite")]
    NonFiniteHeight { index: usize },
}

/// What collapsed to zero-area geometry at a degenerate vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// The vertex coincides with the one before it
    CoincidentPoints,
    /// The vertex has zero extrusion height, flattening its side walls
    ZeroHeight,
    /// The vertex is collinear with the cap fan anchor
    Collinear,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CoincidentPoints => "coincides with the previous point",
            Self::ZeroHeight => "has zero extrusion height",
            Self::Collinear => "is collinear with its cap triangle",
        };
        f.write_str(text)
    }
}

/// Failure to build a solid from a contour
///
/// None of these are recoverable inside the builder. They point at the
/// upstream contour extraction, and no placeholder solid is ever produced
/// in their place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("invalid contour: {0}")]
    InvalidContour(#[from] InvalidContourError),

    #[error("degenerate contour: vertex {index} {kind}; re-sample the source outline")]
    DegenerateContour { index: usize, kind: Degeneracy },

    #[error(
        "cannot fan-triangulate cap: contour is concave at vertex {index}; \
         pre-segment the outline into convex parts or supply a cap triangulation"
    )]
    DegenerateCap { index: usize },

    #[error("invalid cap triangulation: {reason}")]
    InvalidCap { reason: String },
}

impl BuildError {
    pub(crate) fn invalid_cap(reason: impl Into<String>) -> Self {
        Self::InvalidCap {
            reason: reason.into(),
        }
    }

    /// Contour vertex the error points at, when there is one
    pub fn vertex_index(&self) -> Option<usize> {
        match self {
            Self::InvalidContour(InvalidContourError::NonFiniteCoordinate { index })
            | Self::InvalidContour(InvalidContourError::NegativeHeight { index, .. })
            | Self::InvalidContour(InvalidContourError::NonFiniteHeight { index })
            | Self::DegenerateContour { index, .. }
            | Self::DegenerateCap { index } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_vertex() {
        let err = BuildError::DegenerateContour {
            index: 4,
            kind: Degeneracy::CoincidentPoints,
        };
        assert_eq!(
            err.to_string(),
            "degenerate contour: vertex 4 coincides with the previous point; re-sample the source outline"
        );
        assert_eq!(err.vertex_index(), Some(4));
    }

    #[test]
    fn test_invalid_contour_converts() {
        let err: BuildError = InvalidContourError::TooFewPoints { found: 2 }.into();
        assert!(matches!(
            err,
            BuildError::InvalidContour(InvalidContourError::TooFewPoints { found: 2 })
        ));
        assert_eq!(err.vertex_index(), None);
    }
}
