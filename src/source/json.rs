use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::PathBuf;

use super::{ContourSource, KeyOutline};
use crate::domain::Contour;

/// Raw outline document written by the image-analysis stage
#[derive(Debug, Deserialize)]
struct OutlineDocument {
    points: Vec<[f64; 2]>,
    #[serde(default)]
    heights: Option<Vec<f64>>,
    #[serde(default)]
    depths: Option<Vec<f64>>,
}

/// Outline stored as JSON: `{"points": [[x, y], ...], "heights": [...]}`
///
/// Either `heights` or `depths` (cut depth below the blank's top face) may
/// be given, one value per point. A closing point equal to the first is
/// dropped, and its value must repeat the first one.
#[derive(Debug, Clone)]
pub struct JsonContourFile {
    path: PathBuf,
}

impl JsonContourFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContourSource for JsonContourFile {
    fn load(&self) -> Result<KeyOutline> {
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read outline file: {}", self.path.display()))?;
        parse_outline(&contents)
            .with_context(|| format!("Failed to parse outline file: {}", self.path.display()))
    }
}

/// Parse an outline document from a JSON string
pub fn parse_outline(json: &str) -> Result<KeyOutline> {
    let doc: OutlineDocument = serde_json::from_str(json).context("Invalid outline JSON")?;

    let mut points: Vec<(f64, f64)> = doc.points.iter().map(|&[x, y]| (x, y)).collect();
    let mut heights = doc.heights;
    let mut depths = doc.depths;

    if heights.is_some() && depths.is_some() {
        bail!("Outline gives both heights and depths; use one");
    }

    for (name, values) in [("heights", &heights), ("depths", &depths)] {
        if let Some(v) = values
            && v.len() != points.len()
        {
            bail!("Outline has {} points but {} {}", points.len(), v.len(), name);
        }
    }

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
        for (name, values) in [("height", &mut heights), ("depth", &mut depths)] {
            if let Some(v) = values {
                let closing = v.pop();
                if closing != v.first().copied() {
                    bail!(
                        "Closing point repeats the first point but its {} {} differs from {}",
                        name,
                        closing.unwrap_or(f64::NAN),
                        v.first().copied().unwrap_or(f64::NAN)
                    );
                }
            }
        }
    }

    Ok(KeyOutline {
        contour: Contour::new(points),
        heights,
        depths,
    })
}
