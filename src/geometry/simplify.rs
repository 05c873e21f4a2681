use geo::{LineString, SimplifyIdx};

use crate::domain::Contour;

/// Indices of the outline points kept by Ramer-Douglas-Peucker
///
/// Dense edge-detector output shrinks to its corners, and collinear points
/// that would flatten cap triangles go away. Runs over the closed ring and
/// returns ascending indices into `contour`.
///
/// Every point is kept when `epsilon` is not positive, the outline is too
/// short to simplify, or fewer than 3 points would survive.
pub fn simplify_indices(contour: &Contour, epsilon: f64) -> Vec<usize> {
    let n = contour.len();
    let all = || (0..n).collect::<Vec<usize>>();
    if epsilon <= 0.0 || n < 4 {
        return all();
    }

    let mut ring: LineString<f64> = contour
        .points()
        .iter()
        .map(|&(x, y)| geo::coord! { x: x, y: y })
        .collect();
    ring.close();

    // The closing coordinate at index n is point 0 again
    let kept: Vec<usize> = ring
        .simplify_idx(&epsilon)
        .into_iter()
        .filter(|&i| i < n)
        .collect();
    if kept.len() < 3 {
        return all();
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_short_outline_untouched() {
        let contour = Contour::new(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(simplify_indices(&contour, 1.0), vec![0, 1, 2]);
    }

    #[test]
    fn test_simplify_zero_epsilon_untouched() {
        let contour = Contour::new(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0)]);
        assert_eq!(simplify_indices(&contour, 0.0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_simplify_removes_edge_points() {
        // A 10x2 blade traced one unit at a time along the long edges
        let mut points: Vec<(f64, f64)> = (0..=10).map(|x| (x as f64, 0.0)).collect();
        points.extend((0..=10).rev().map(|x| (x as f64, 2.0)));
        let contour = Contour::new(points);

        let kept = simplify_indices(&contour, 0.01);
        let simplified = Contour::new(kept.iter().map(|&i| contour.points()[i]).collect());
        assert_eq!(kept, vec![0, 10, 11, 21]);
        assert!((simplified.signed_area() - contour.signed_area()).abs() < 1e-9);
    }

    #[test]
    fn test_simplify_indices_point_into_input() {
        let contour = Contour::new(vec![
            (0.0, 0.0),
            (5.0, 0.0),
            (10.0, 0.0),
            (10.0, 2.0),
            (0.0, 2.0),
        ]);
        assert_eq!(simplify_indices(&contour, 0.01), vec![0, 2, 3, 4]);
        assert_eq!(simplify_indices(&contour, 0.0), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_simplify_keeps_minimum() {
        let contour = Contour::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 0.01), (0.0, 0.01)]);
        assert!(simplify_indices(&contour, 10.0).len() >= 3);
    }
}
