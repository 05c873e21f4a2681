//! Cap triangulation for extruded outlines
//!
//! Caps are expressed as triples of contour indices. The bottom cap uses
//! them as given and the top cap mirrors them onto the top vertex block.

use std::collections::HashMap;

use earcutr::earcut;

use super::error::{BuildError, BuildResult, Degeneracy};
use crate::domain::{Contour, Point2};

/// Twice the signed area of triangle (a, b, c); positive when counter-clockwise
fn cross(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Turn direction at vertex `i`: positive for a left turn
fn turn_at(points: &[Point2], i: usize) -> f64 {
    let n = points.len();
    cross(points[(i + n - 1) % n], points[i], points[(i + 1) % n])
}

/// Fan triangulation anchored at vertex 0
///
/// Only valid for convex outlines: a reflex vertex signals
/// [`BuildError::DegenerateCap`] instead of emitting overlapping triangles.
/// A fan triangle that collapses because its vertices are collinear signals
/// [`BuildError::DegenerateContour`].
pub fn fan_cap(contour: &Contour, tolerance: f64) -> BuildResult<Vec<[usize; 3]>> {
    let points = contour.points();
    let n = points.len();

    let orientation = contour.signed_area();
    if orientation.abs() <= tolerance {
        let index = (0..n)
            .find(|&i| turn_at(points, i).abs() <= tolerance)
            .unwrap_or(0);
        return Err(BuildError::DegenerateContour {
            index,
            kind: Degeneracy::Collinear,
        });
    }
    let sign = orientation.signum();

    for i in 0..n {
        if turn_at(points, i) * sign < -tolerance {
            return Err(BuildError::DegenerateCap { index: i });
        }
    }

    let mut cap = Vec::with_capacity(n - 2);
    for i in 1..n - 1 {
        if cross(points[0], points[i], points[i + 1]).abs() / 2.0 <= tolerance {
            // In a convex outline only the neighbours of the anchor can line up with it
            let index = if i == 1 { 1 } else { i + 1 };
            return Err(BuildError::DegenerateContour {
                index,
                kind: Degeneracy::Collinear,
            });
        }
        cap.push([0, i, i + 1]);
    }

    Ok(cap)
}

/// Ear-clipping triangulation for concave outlines
///
/// The result is wound the same way as the contour and can be handed to
/// `ContourExtrusionMeshBuilder::build_with_cap`.
pub fn ear_clip_cap(contour: &Contour) -> BuildResult<Vec<[usize; 3]>> {
    if contour.len() < 3 {
        return Err(BuildError::invalid_cap("outline has fewer than 3 points"));
    }

    let mut vertices: Vec<f64> = Vec::with_capacity(contour.len() * 2);
    for &(x, y) in contour.points() {
        vertices.push(x);
        vertices.push(y);
    }

    let indices = earcut(&vertices, &[], 2)
        .map_err(|e| BuildError::invalid_cap(format!("ear clipping failed: {:?}", e)))?;

    let sign = contour.signed_area().signum();
    let points = contour.points();
    let cap = indices
        .chunks_exact(3)
        .map(|tri| {
            let mut tri = [tri[0], tri[1], tri[2]];
            if cross(points[tri[0]], points[tri[1]], points[tri[2]]) * sign < 0.0 {
                tri.swap(1, 2);
            }
            tri
        })
        .collect();

    Ok(cap)
}

/// Check a caller-supplied cap and wind it like the contour
///
/// The cap must tile the outline exactly: `n - 2` non-degenerate triangles
/// over contour indices, each boundary edge used once, each interior edge
/// twice, and a total area equal to the outline's.
pub fn orient_cap(
    contour: &Contour,
    cap: &[[usize; 3]],
    tolerance: f64,
) -> BuildResult<Vec<[usize; 3]>> {
    let points = contour.points();
    let n = points.len();

    if n < 3 {
        return Err(BuildError::invalid_cap("outline has fewer than 3 points"));
    }
    if cap.len() != n - 2 {
        return Err(BuildError::invalid_cap(format!(
            "expected {} triangles for a {}-point outline, got {}",
            n - 2,
            n,
            cap.len()
        )));
    }

    let outline_area = contour.signed_area();
    let sign = outline_area.signum();
    let mut covered = 0.0;
    let mut edge_uses: HashMap<(usize, usize), usize> = HashMap::new();
    let mut oriented = Vec::with_capacity(cap.len());

    for (t, &tri) in cap.iter().enumerate() {
        let [a, b, c] = tri;
        if a >= n || b >= n || c >= n {
            return Err(BuildError::invalid_cap(format!(
                "triangle {} references a vertex outside the {}-point outline",
                t, n
            )));
        }
        if a == b || b == c || a == c {
            return Err(BuildError::invalid_cap(format!(
                "triangle {} repeats a vertex",
                t
            )));
        }

        let doubled = cross(points[a], points[b], points[c]);
        if doubled.abs() / 2.0 <= tolerance {
            return Err(BuildError::invalid_cap(format!("triangle {} has zero area", t)));
        }
        covered += doubled.abs() / 2.0;

        for (u, v) in [(a, b), (b, c), (c, a)] {
            *edge_uses.entry((u.min(v), u.max(v))).or_default() += 1;
        }

        oriented.push(if doubled * sign < 0.0 { [a, c, b] } else { tri });
    }

    for (i, j) in contour.edges() {
        if edge_uses.remove(&(i.min(j), i.max(j))) != Some(1) {
            return Err(BuildError::invalid_cap(format!(
                "outline edge {}-{} is not covered by exactly one triangle",
                i, j
            )));
        }
    }
    if let Some((&(u, v), _)) = edge_uses.iter().find(|&(_, &count)| count != 2) {
        return Err(BuildError::invalid_cap(format!(
            "interior edge {}-{} is not shared by exactly two triangles",
            u, v
        )));
    }

    if (covered - outline_area.abs()).abs() > tolerance.max(1e-9 * outline_area.abs()) {
        return Err(BuildError::invalid_cap(format!(
            "triangles cover {:.6} but the outline encloses {:.6}",
            covered,
            outline_area.abs()
        )));
    }

    Ok(oriented)
}
