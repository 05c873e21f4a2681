use crate::domain::{Contour, Point2};

/// Axis-aligned bounding box of an outline
#[derive(Debug, Clone)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from a set of points
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut min_x = f64::MAX;
        let mut max_x = f64::MIN;
        let mut min_y = f64::MAX;
        let mut max_y = f64::MIN;

        for &(x, y) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        Some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Longest side of the box
    pub fn extent(&self) -> f64 {
        self.width().max(self.height())
    }
}

/// Maps outline coordinates (e.g. image pixels) to physical millimetres
#[derive(Debug, Clone)]
pub struct Scaler {
    /// Scale factor: mm per source unit
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Scaler {
    /// Scale so the longest side of `bounds` measures `target_mm`
    ///
    /// The minimum corner of the box lands on the origin. Degenerate bounds
    /// keep a scale of 1.
    pub fn fit_length(bounds: &Bounds, target_mm: f64) -> Self {
        let extent = bounds.extent();
        let scale = if extent > 0.0 {
            target_mm / extent
        } else {
            1.0
        };

        Self {
            scale,
            offset_x: -bounds.min_x * scale,
            offset_y: -bounds.min_y * scale,
        }
    }

    /// Scale a point from source units to mm
    pub fn scale(&self, x: f64, y: f64) -> Point2 {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    /// Get the scale factor (mm per source unit)
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }
}

/// Resize an outline so its longest side equals `length_mm`
///
/// Replaces fixed pixel-to-mm factors: the physical key length comes from
/// configuration and the outline is stretched uniformly to match.
pub fn fit_to_length(contour: &Contour, length_mm: f64) -> Contour {
    let Some(bounds) = Bounds::from_points(contour.points()) else {
        return contour.clone();
    };
    let scaler = Scaler::fit_length(&bounds, length_mm);

    Contour::new(
        contour
            .points()
            .iter()
            .map(|&(x, y)| scaler.scale(x, y))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let points = vec![(0.0, 0.0), (1000.0, 2000.0), (500.0, 1000.0)];
        let bounds = Bounds::from_points(&points).unwrap();

        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.max_x, 1000.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(bounds.max_y, 2000.0);
        assert_eq!(bounds.extent(), 2000.0);
    }

    #[test]
    fn test_bounds_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_scaler() {
        let bounds = Bounds {
            min_x: 100.0,
            max_x: 600.0,
            min_y: 200.0,
            max_y: 300.0,
        };

        // 500 px across should become a 50 mm key
        let scaler = Scaler::fit_length(&bounds, 50.0);
        assert!((scaler.scale_factor() - 0.1).abs() < 1e-12);

        let (x, y) = scaler.scale(100.0, 200.0);
        assert!(x.abs() < 1e-12 && y.abs() < 1e-12);
        let (x, y) = scaler.scale(600.0, 300.0);
        assert!((x - 50.0).abs() < 1e-9);
        assert!((y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_length_preserves_aspect() {
        let contour = Contour::new(vec![(10.0, 10.0), (510.0, 10.0), (510.0, 110.0), (10.0, 110.0)]);
        let fitted = fit_to_length(&contour, 50.0);

        let bounds = Bounds::from_points(fitted.points()).unwrap();
        assert!((bounds.width() - 50.0).abs() < 1e-9);
        assert!((bounds.height() - 10.0).abs() < 1e-9);
        assert!(bounds.min_x.abs() < 1e-9);
        // Uniform scaling keeps the orientation
        assert!(fitted.signed_area() > 0.0);
    }
}
