pub mod json;

use anyhow::Result;

use crate::domain::{Contour, HeightProfile};

pub use json::{JsonContourFile, parse_outline};

/// An outline delivered by the image-analysis stage
#[derive(Debug, Clone)]
pub struct KeyOutline {
    pub contour: Contour,
    /// Per-vertex heights, if the source sampled them
    pub heights: Option<Vec<f64>>,
    /// Per-vertex cut depths below the blank's top face
    pub depths: Option<Vec<f64>>,
}

impl KeyOutline {
    /// Sampled heights, heights cut down from `thickness`, or a uniform
    /// blade of `thickness` when the source gave neither
    pub fn height_profile(&self, thickness: f64) -> HeightProfile {
        match (&self.heights, &self.depths) {
            (Some(heights), _) => HeightProfile::PerVertex(heights.clone()),
            (None, Some(depths)) => HeightProfile::from_depths(thickness, depths),
            (None, None) => HeightProfile::Uniform(thickness),
        }
    }
}

/// Upstream stage producing a key outline
///
/// Edge detection, outline selection and depth sampling happen behind this
/// trait; the mesh builder only sees its result.
pub trait ContourSource {
    fn load(&self) -> Result<KeyOutline>;
}
