//! Mesh validation utilities
//!
//! Checks indexed meshes for 3D printing compatibility:
//! - Face indices in range and pairwise distinct
//! - Degenerate triangles (zero area)
//! - NaN/Inf coordinates
//! - Watertightness and consistent winding (edge incidence)
//! - Outward orientation (positive signed volume)

use std::collections::HashMap;

use super::Mesh;

/// Minimum area threshold for non-degenerate triangles (in square mm)
const MIN_TRIANGLE_AREA: f64 = 1e-12;

/// Edge incidence summary for an indexed mesh
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EdgeReport {
    /// Number of distinct undirected edges
    pub edges: usize,
    /// Edges used by exactly one face (holes)
    pub boundary: usize,
    /// Edges used by more than two faces
    pub non_manifold: usize,
    /// Edges traversed in the same direction by two faces
    pub inconsistent: usize,
}

impl EdgeReport {
    /// Every edge is shared by exactly two faces with opposite directions
    pub fn is_closed(&self) -> bool {
        self.boundary == 0 && self.non_manifold == 0 && self.inconsistent == 0
    }
}

/// Result of mesh validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Total number of faces validated
    pub total: usize,
    /// Faces with an index outside the vertex list
    pub out_of_range: usize,
    /// Faces that repeat a vertex index
    pub repeated_index: usize,
    /// Number of degenerate faces (zero or near-zero area)
    pub degenerate: usize,
    /// Number of vertices with invalid coordinates (NaN/Inf)
    pub invalid_coords: usize,
    /// Edge incidence of the faces that could be checked
    pub edges: EdgeReport,
    /// Signed volume; positive when normals point outward
    pub volume: f64,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Closed, outward-facing and free of degenerate or malformed faces
    pub fn is_printable(&self) -> bool {
        !self.has_issues() && self.volume > 0.0
    }

    /// Check if the mesh has any issues at all
    pub fn has_issues(&self) -> bool {
        self.out_of_range > 0
            || self.repeated_index > 0
            || self.degenerate > 0
            || self.invalid_coords > 0
            || !self.edges.is_closed()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if !self.has_issues() {
            format!(
                "Mesh valid: {} triangles, closed, volume {:.3} mm^3",
                self.total, self.volume
            )
        } else {
            format!(
                "Mesh issues: {} total, {} bad indices, {} degenerate, {} invalid coords, \
                 {} boundary edges, {} non-manifold edges, {} flipped edges",
                self.total,
                self.out_of_range + self.repeated_index,
                self.degenerate,
                self.invalid_coords,
                self.edges.boundary,
                self.edges.non_manifold,
                self.edges.inconsistent
            )
        }
    }
}

/// Validate a mesh and return a detailed report
pub fn validate_mesh(mesh: &Mesh) -> ValidationResult {
    let mut result = ValidationResult {
        total: mesh.faces.len(),
        ..Default::default()
    };

    result.invalid_coords = mesh
        .vertices
        .iter()
        .filter(|v| v.iter().any(|c| !c.is_finite()))
        .count();
    if result.invalid_coords > 0 {
        result.warnings.push(format!(
            "{} vertices have NaN/Inf coordinates",
            result.invalid_coords
        ));
    }

    let vertex_count = mesh.vertices.len();
    let mut well_formed = Vec::with_capacity(mesh.faces.len());

    for (i, &face) in mesh.faces.iter().enumerate() {
        if face.iter().any(|&v| v >= vertex_count) {
            result.out_of_range += 1;
            result
                .warnings
                .push(format!("Face {} references a missing vertex", i));
            continue;
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            result.repeated_index += 1;
            result
                .warnings
                .push(format!("Face {} repeats a vertex index", i));
            continue;
        }
        if triangle_area(&mesh.face_positions(face)) < MIN_TRIANGLE_AREA {
            result.degenerate += 1;
        }
        well_formed.push(face);
    }

    if result.degenerate > 0 {
        result.warnings.push(format!(
            "{} degenerate triangles detected",
            result.degenerate
        ));
    }

    result.edges = edge_report_for(&well_formed);
    if !result.edges.is_closed() {
        result.warnings.push(format!(
            "Mesh is not watertight: {} boundary, {} non-manifold, {} flipped edges",
            result.edges.boundary, result.edges.non_manifold, result.edges.inconsistent
        ));
    }

    if result.out_of_range == 0 {
        result.volume = signed_volume(mesh);
        if result.volume <= 0.0 {
            result
                .warnings
                .push(format!("Signed volume {:.6} is not positive", result.volume));
        }
    }

    result
}

/// Count how each undirected edge is used by the faces
pub fn edge_report(mesh: &Mesh) -> EdgeReport {
    edge_report_for(&mesh.faces)
}

fn edge_report_for(faces: &[[usize; 3]]) -> EdgeReport {
    // (min, max) -> (faces using it, faces traversing it min -> max)
    let mut uses: HashMap<(usize, usize), (usize, usize)> = HashMap::new();

    for face in faces {
        for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
            let entry = uses.entry((a.min(b), a.max(b))).or_default();
            entry.0 += 1;
            if a < b {
                entry.1 += 1;
            }
        }
    }

    let mut report = EdgeReport {
        edges: uses.len(),
        ..Default::default()
    };
    for &(count, forward) in uses.values() {
        match count {
            1 => report.boundary += 1,
            2 if forward != 1 => report.inconsistent += 1,
            2 => {}
            _ => report.non_manifold += 1,
        }
    }
    report
}

/// Signed volume enclosed by the mesh
///
/// Sum of the signed volumes of the tetrahedra formed by each face and the
/// origin. Positive when faces are wound counter-clockwise seen from outside.
pub fn signed_volume(mesh: &Mesh) -> f64 {
    mesh.faces
        .iter()
        .map(|&face| {
            let [a, b, c] = mesh.face_positions(face);
            dot(a, cross(b, c))
        })
        .sum::<f64>()
        / 6.0
}

/// Total area of all faces
pub fn surface_area(mesh: &Mesh) -> f64 {
    mesh.faces
        .iter()
        .map(|&face| triangle_area(&mesh.face_positions(face)))
        .sum()
}

/// Calculate the area of a triangle from its vertices
pub fn triangle_area(vertices: &[[f64; 3]; 3]) -> f64 {
    let [v0, v1, v2] = *vertices;
    let edge_a = sub(v1, v0);
    let edge_b = sub(v2, v0);
    let c = cross(edge_a, edge_b);
    0.5 * dot(c, c).sqrt()
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit tetrahedron with outward-facing faces
    fn tetrahedron() -> Mesh {
        Mesh::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    #[test]
    fn test_tetrahedron_volume() {
        let mesh = tetrahedron();
        assert!((signed_volume(&mesh) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_flipped_tetrahedron_volume_negative() {
        let mut mesh = tetrahedron();
        mesh.flip_winding();
        assert!((signed_volume(&mesh) + 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let report = edge_report(&tetrahedron());
        assert_eq!(report.edges, 6);
        assert!(report.is_closed());
    }

    #[test]
    fn test_open_mesh_has_boundary() {
        let mut mesh = tetrahedron();
        mesh.faces.pop();
        let report = edge_report(&mesh);
        assert_eq!(report.boundary, 3);
        assert!(!report.is_closed());
    }

    #[test]
    fn test_single_flipped_face_is_inconsistent() {
        let mut mesh = tetrahedron();
        mesh.faces[3].swap(1, 2);
        let report = edge_report(&mesh);
        assert_eq!(report.inconsistent, 3);
    }

    #[test]
    fn test_validate_mesh_printable() {
        let result = validate_mesh(&tetrahedron());
        assert_eq!(result.total, 4);
        assert!(result.is_printable());
        assert!(result.warnings.is_empty());
        assert!(result.summary().starts_with("Mesh valid"));
    }

    #[test]
    fn test_validate_mesh_bad_faces() {
        let mut mesh = tetrahedron();
        mesh.faces.push([0, 0, 1]);
        mesh.faces.push([0, 1, 9]);
        let result = validate_mesh(&mesh);

        assert_eq!(result.repeated_index, 1);
        assert_eq!(result.out_of_range, 1);
        assert!(!result.is_printable());
    }

    #[test]
    fn test_validate_mesh_nan() {
        let mut mesh = tetrahedron();
        mesh.vertices[3] = [f64::NAN, 0.0, 1.0];
        let result = validate_mesh(&mesh);
        assert_eq!(result.invalid_coords, 1);
        assert!(!result.is_printable());
    }

    #[test]
    fn test_degenerate_triangle_coincident() {
        let area = triangle_area(&[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        assert!(area < MIN_TRIANGLE_AREA);
    }

    #[test]
    fn test_triangle_area() {
        let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let area = triangle_area(&vertices);
        assert!((area - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_surface_area_tetrahedron() {
        let expected = 1.5 + 3.0_f64.sqrt() / 2.0;
        assert!((surface_area(&tetrahedron()) - expected).abs() < 1e-12);
    }
}
