use geo::{Area, LineString, Polygon};

/// A 2D point on a key outline, in mm (or source pixels before fitting)
pub type Point2 = (f64, f64);

/// Closed polygonal outline of a key silhouette
///
/// Points are stored in boundary traversal order. The closing edge from the
/// last point back to the first is implicit, so the first point is never
/// repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2>,
}

impl Contour {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges as (start, end) index pairs, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (i, (i + 1) % n))
    }

    /// Shoelace signed area: positive for counter-clockwise outlines
    pub fn signed_area(&self) -> f64 {
        self.to_polygon().signed_area()
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Same outline traversed in the opposite direction
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    pub(crate) fn to_polygon(&self) -> Polygon<f64> {
        let ring: LineString<f64> = self
            .points
            .iter()
            .map(|&(x, y)| geo::coord! { x: x, y: y })
            .collect();
        Polygon::new(ring, vec![])
    }
}

impl From<Vec<Point2>> for Contour {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}
