use super::Mesh;
use super::error::{BuildError, BuildResult, Degeneracy, InvalidContourError};
use super::triangulation::{fan_cap, orient_cap};
use super::validation::signed_volume;
use crate::domain::{Contour, HeightProfile};

/// Default distance below which two outline points are treated as one (mm)
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Numeric settings for [`ContourExtrusionMeshBuilder`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildConfig {
    /// Lengths and areas at or below this value count as zero
    pub tolerance: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Extrudes a closed outline into a watertight solid
///
/// Vertex layout of the result: indices `[0, n)` are the bottom ring at
/// z = 0 and `[n, 2n)` the top ring at each vertex's height, both in
/// contour order. Faces are the `2n` side-wall triangles in edge order,
/// then the bottom cap, then the top cap. Every face is wound
/// counter-clockwise seen from outside, whatever the contour's direction.
///
/// The builder is stateless and can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourExtrusionMeshBuilder {
    config: BuildConfig,
}

impl ContourExtrusionMeshBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Extrude a convex outline, fan-triangulating both caps
    ///
    /// # Errors
    /// * `InvalidContour` - fewer than 3 points, non-finite coordinates or a
    ///   malformed/negative height profile
    /// * `DegenerateContour` - coincident points, zero heights or a cap
    ///   triangle collapsed by collinear points
    /// * `DegenerateCap` - the outline is concave
    pub fn build(&self, contour: &Contour, profile: &HeightProfile) -> BuildResult<Mesh> {
        let heights = self.check_inputs(contour, profile)?;
        let cap = fan_cap(contour, self.config.tolerance)?;
        Ok(self.assemble(contour, &heights, &cap))
    }

    /// Extrude an outline using a caller-supplied cap triangulation
    ///
    /// `cap` holds triples of contour indices tiling the outline, e.g. from
    /// [`ear_clip_cap`](super::triangulation::ear_clip_cap). This is the way
    /// to extrude concave silhouettes.
    pub fn build_with_cap(
        &self,
        contour: &Contour,
        profile: &HeightProfile,
        cap: &[[usize; 3]],
    ) -> BuildResult<Mesh> {
        let heights = self.check_inputs(contour, profile)?;
        let cap = orient_cap(contour, cap, self.config.tolerance)?;
        Ok(self.assemble(contour, &heights, &cap))
    }

    /// Validate the outline and resolve one height per vertex
    fn check_inputs(&self, contour: &Contour, profile: &HeightProfile) -> BuildResult<Vec<f64>> {
        let points = contour.points();
        let n = points.len();

        if n < 3 {
            return Err(InvalidContourError::TooFewPoints { found: n }.into());
        }

        if let Some(index) = points
            .iter()
            .position(|&(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(InvalidContourError::NonFiniteCoordinate { index }.into());
        }

        if let Some(found) = profile.explicit_len()
            && found != n
        {
            return Err(InvalidContourError::HeightCountMismatch { expected: n, found }.into());
        }

        let mut heights = Vec::with_capacity(n);
        for index in 0..n {
            let height = profile.height_at(index).unwrap_or(f64::NAN);
            if !height.is_finite() {
                return Err(InvalidContourError::NonFiniteHeight { index }.into());
            }
            if height < 0.0 {
                return Err(InvalidContourError::NegativeHeight { index, height }.into());
            }
            heights.push(height);
        }

        for (i, j) in contour.edges() {
            let (a, b) = (points[i], points[j]);
            if (b.0 - a.0).hypot(b.1 - a.1) <= self.config.tolerance {
                return Err(BuildError::DegenerateContour {
                    index: j,
                    kind: Degeneracy::CoincidentPoints,
                });
            }
        }

        if let Some(index) = heights.iter().position(|&h| h <= self.config.tolerance) {
            return Err(BuildError::DegenerateContour {
                index,
                kind: Degeneracy::ZeroHeight,
            });
        }

        Ok(heights)
    }

    /// Emit vertices and faces, then fix the global orientation
    ///
    /// Walls and caps are wound for a clockwise outline. A counter-clockwise
    /// outline therefore yields an inside-out solid, which the signed-volume
    /// check turns around.
    fn assemble(&self, contour: &Contour, heights: &[f64], cap: &[[usize; 3]]) -> Mesh {
        let points = contour.points();
        let n = points.len();

        let mut vertices = Vec::with_capacity(2 * n);
        vertices.extend(points.iter().map(|&(x, y)| [x, y, 0.0]));
        vertices.extend(points.iter().zip(heights).map(|(&(x, y), &h)| [x, y, h]));

        let mut faces = Vec::with_capacity(2 * n + 2 * cap.len());

        for (i, j) in contour.edges() {
            faces.push([i, n + j, j]);
            faces.push([i, n + i, n + j]);
        }

        faces.extend(cap.iter().copied());
        faces.extend(cap.iter().map(|&[a, b, c]| [n + a, n + c, n + b]));

        let mut mesh = Mesh::new(vertices, faces);
        if signed_volume(&mesh) < 0.0 {
            mesh.flip_winding();
        }
        mesh
    }
}
