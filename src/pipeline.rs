use crate::config::{CapStrategy, KeyDimensions};
use crate::domain::{Contour, HeightProfile};
use crate::geometry::{fit_to_length, simplify_indices};
use crate::mesh::{
    BuildConfig, BuildResult, ContourExtrusionMeshBuilder, InvalidContourError, Mesh,
    ear_clip_cap,
};
use crate::source::KeyOutline;

/// Settings for turning an outline into a printable key
#[derive(Debug, Clone)]
pub struct KeyPipeline {
    pub dimensions: KeyDimensions,
    /// Resize the outline to `dimensions.length_mm`
    pub fit: bool,
    /// Simplification tolerance in source units; 0 keeps every point
    pub simplify: f64,
    pub cap: CapStrategy,
    pub build: BuildConfig,
}

impl Default for KeyPipeline {
    fn default() -> Self {
        Self {
            dimensions: KeyDimensions::default(),
            fit: true,
            simplify: 0.0,
            cap: CapStrategy::default(),
            build: BuildConfig::default(),
        }
    }
}

/// Everything produced for one key
#[derive(Debug, Clone)]
pub struct KeyModel {
    /// Outline as extruded, after simplification and fitting
    pub contour: Contour,
    pub profile: HeightProfile,
    pub mesh: Mesh,
}

impl KeyPipeline {
    /// Simplify, fit and extrude an outline
    ///
    /// Sampled heights stay attached to their vertices: a point dropped by
    /// simplification takes its height with it.
    pub fn run(&self, outline: &KeyOutline) -> BuildResult<KeyModel> {
        let profile = outline.height_profile(self.dimensions.thickness_mm);
        if let Some(found) = profile.explicit_len()
            && found != outline.contour.len()
        {
            return Err(InvalidContourError::HeightCountMismatch {
                expected: outline.contour.len(),
                found,
            }
            .into());
        }

        let kept = simplify_indices(&outline.contour, self.simplify);
        let points = outline.contour.points();
        let mut contour = Contour::new(kept.iter().map(|&i| points[i]).collect());
        let profile = profile.select(&kept);

        if self.fit {
            contour = fit_to_length(&contour, self.dimensions.length_mm);
        }

        let builder = ContourExtrusionMeshBuilder::new(self.build);
        let mesh = match self.cap {
            CapStrategy::Fan => builder.build(&contour, &profile)?,
            CapStrategy::EarClip => {
                let cap = ear_clip_cap(&contour)?;
                builder.build_with_cap(&contour, &profile, &cap)?
            }
        };

        Ok(KeyModel {
            contour,
            profile,
            mesh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{BuildError, signed_volume, validate_mesh};

    fn pixel_blade() -> KeyOutline {
        // 500 x 100 px outline with a notch cut into the top edge
        KeyOutline {
            contour: Contour::new(vec![
                (0.0, 0.0),
                (500.0, 0.0),
                (500.0, 100.0),
                (300.0, 100.0),
                (250.0, 60.0),
                (200.0, 100.0),
                (0.0, 100.0),
            ]),
            heights: None,
            depths: None,
        }
    }

    #[test]
    fn test_fan_rejects_notched_blade() {
        let err = KeyPipeline::default().run(&pixel_blade()).unwrap_err();
        assert_eq!(err, BuildError::DegenerateCap { index: 4 });
    }

    #[test]
    fn test_ear_clip_fits_and_extrudes() {
        let pipeline = KeyPipeline {
            cap: CapStrategy::EarClip,
            ..Default::default()
        };
        let model = pipeline.run(&pixel_blade()).unwrap();

        // 500 px -> 50 mm, so 1 px = 0.1 mm; notch area 100 * 40 / 2 px^2
        let area_mm2 = (500.0 * 100.0 - 2000.0) * 0.01;
        let expected = area_mm2 * pipeline.dimensions.thickness_mm;
        assert!((signed_volume(&model.mesh) - expected).abs() < 1e-6);
        assert!(validate_mesh(&model.mesh).is_printable());
        assert_eq!(model.profile, HeightProfile::Uniform(2.0));
    }

    #[test]
    fn test_sampled_heights_kept_without_simplification() {
        let outline = KeyOutline {
            contour: Contour::new(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 2.0), (0.0, 2.0)]),
            heights: Some(vec![2.0, 2.0, 1.5, 1.5]),
            depths: None,
        };
        let pipeline = KeyPipeline {
            fit: false,
            ..Default::default()
        };
        let model = pipeline.run(&outline).unwrap();
        assert_eq!(model.profile, HeightProfile::PerVertex(vec![2.0, 2.0, 1.5, 1.5]));
        assert!((signed_volume(&model.mesh) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_simplification_keeps_sampled_heights() {
        // The midpoint of the bottom edge is redundant; the cut along the top stays
        let outline = KeyOutline {
            contour: Contour::new(vec![
                (0.0, 0.0),
                (5.0, 0.0),
                (10.0, 0.0),
                (10.0, 2.0),
                (0.0, 2.0),
            ]),
            heights: Some(vec![2.0, 2.0, 2.0, 0.5, 0.5]),
            depths: None,
        };
        let pipeline = KeyPipeline {
            fit: false,
            simplify: 0.01,
            ..Default::default()
        };
        let model = pipeline.run(&outline).unwrap();
        assert_eq!(model.contour.len(), 4);
        assert_eq!(model.profile, HeightProfile::PerVertex(vec![2.0, 2.0, 0.5, 0.5]));
        assert!((signed_volume(&model.mesh) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_cut_depths_become_heights() {
        let outline = KeyOutline {
            contour: Contour::new(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 2.0), (0.0, 2.0)]),
            heights: None,
            depths: Some(vec![0.0, 0.0, 0.5, 0.5]),
        };
        let pipeline = KeyPipeline {
            fit: false,
            ..Default::default()
        };
        let model = pipeline.run(&outline).unwrap();
        assert_eq!(model.profile, HeightProfile::PerVertex(vec![2.0, 2.0, 1.5, 1.5]));
        assert!((signed_volume(&model.mesh) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_height_count_checked_before_simplifying() {
        let outline = KeyOutline {
            contour: Contour::new(vec![
                (0.0, 0.0),
                (5.0, 0.0),
                (10.0, 0.0),
                (10.0, 2.0),
                (0.0, 2.0),
            ]),
            heights: Some(vec![2.0; 6]),
            depths: None,
        };
        let pipeline = KeyPipeline {
            fit: false,
            simplify: 0.01,
            ..Default::default()
        };
        let err = pipeline.run(&outline).unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidContour(InvalidContourError::HeightCountMismatch {
                expected: 5,
                found: 6
            })
        );
    }
}
