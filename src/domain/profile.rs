/// Extrusion height for each contour vertex, in mm
#[derive(Debug, Clone, PartialEq)]
pub enum HeightProfile {
    /// One height shared by every vertex (flat top cap)
    Uniform(f64),
    /// One height per contour vertex, in contour order
    PerVertex(Vec<f64>),
}

impl HeightProfile {
    /// Blade heights from a blank thickness and per-vertex cut depths
    ///
    /// Each vertex ends up at `thickness - depth`. Depths larger than the
    /// thickness produce negative heights, which the builder rejects.
    pub fn from_depths(thickness: f64, depths: &[f64]) -> Self {
        Self::PerVertex(depths.iter().map(|d| thickness - d).collect())
    }

    /// Height at a contour vertex, if the profile defines one
    pub fn height_at(&self, index: usize) -> Option<f64> {
        match self {
            Self::Uniform(h) => Some(*h),
            Self::PerVertex(heights) => heights.get(index).copied(),
        }
    }

    /// Number of explicit heights, or `None` for a uniform profile
    pub fn explicit_len(&self) -> Option<usize> {
        match self {
            Self::Uniform(_) => None,
            Self::PerVertex(heights) => Some(heights.len()),
        }
    }

    /// Profile for the contour made of the vertices at `indices`
    ///
    /// Per-vertex heights follow their vertices; indices past the end are
    /// skipped and surface later as a count mismatch.
    pub fn select(&self, indices: &[usize]) -> Self {
        match self {
            Self::Uniform(h) => Self::Uniform(*h),
            Self::PerVertex(heights) => Self::PerVertex(
                indices
                    .iter()
                    .filter_map(|&i| heights.get(i).copied())
                    .collect(),
            ),
        }
    }

    /// Tallest height in the profile
    pub fn max_height(&self) -> f64 {
        match self {
            Self::Uniform(h) => *h,
            Self::PerVertex(heights) => heights.iter().copied().fold(0.0, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_height_everywhere() {
        let profile = HeightProfile::Uniform(2.0);
        assert_eq!(profile.height_at(0), Some(2.0));
        assert_eq!(profile.height_at(1000), Some(2.0));
        assert_eq!(profile.explicit_len(), None);
    }

    #[test]
    fn test_per_vertex_out_of_range() {
        let profile = HeightProfile::PerVertex(vec![1.0, 2.0]);
        assert_eq!(profile.height_at(1), Some(2.0));
        assert_eq!(profile.height_at(2), None);
        assert_eq!(profile.max_height(), 2.0);
    }

    #[test]
    fn test_select_follows_vertices() {
        let profile = HeightProfile::PerVertex(vec![2.0, 1.8, 1.2, 0.5]);
        assert_eq!(
            profile.select(&[0, 2, 3]),
            HeightProfile::PerVertex(vec![2.0, 1.2, 0.5])
        );
        assert_eq!(
            HeightProfile::Uniform(2.0).select(&[0, 3]),
            HeightProfile::Uniform(2.0)
        );
    }

    #[test]
    fn test_from_depths() {
        let profile = HeightProfile::from_depths(2.0, &[0.0, 0.5, 2.5]);
        assert_eq!(profile, HeightProfile::PerVertex(vec![2.0, 1.5, -0.5]));
    }
}
