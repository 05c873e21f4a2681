use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::{Contour, HeightProfile};
use crate::geometry::Bounds;
use crate::mesh::extrusion::DEFAULT_TOLERANCE;

/// Default physical dimensions of a key blank, in mm.
///
/// These only seed [`KeyDimensions`]; everything downstream receives the
/// dimensions explicitly so a config file or CLI flag can replace them.
pub mod blank {
    /// Blade length along the longest axis of the outline
    pub const LENGTH: f64 = 50.0;
    /// Blade width across the bitting
    pub const WIDTH: f64 = 10.0;
    /// Blank thickness, used as the extrusion height when no heights are sampled
    pub const THICKNESS: f64 = 2.0;
    /// Deepest cut a bitting may reach
    pub const MAX_CUT_DEPTH: f64 = 2.5;
}

/// Output encoding for the STL file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// How the top and bottom caps are triangulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CapStrategy {
    /// Fan from the first vertex; concave outlines are rejected
    #[default]
    Fan,
    /// Ear clipping; handles concave outlines
    EarClip,
}

fn default_length() -> f64 {
    blank::LENGTH
}
fn default_width() -> f64 {
    blank::WIDTH
}
fn default_thickness() -> f64 {
    blank::THICKNESS
}
fn default_max_cut_depth() -> f64 {
    blank::MAX_CUT_DEPTH
}
fn default_fit() -> bool {
    true
}
fn default_simplify() -> f64 {
    0.0
}
fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// Physical dimensions of the key being reproduced, in mm
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct KeyDimensions {
    #[serde(default = "default_length")]
    pub length_mm: f64,
    #[serde(default = "default_width")]
    pub width_mm: f64,
    #[serde(default = "default_thickness")]
    pub thickness_mm: f64,
    #[serde(default = "default_max_cut_depth")]
    pub max_cut_depth_mm: f64,
}

impl Default for KeyDimensions {
    fn default() -> Self {
        Self {
            length_mm: default_length(),
            width_mm: default_width(),
            thickness_mm: default_thickness(),
            max_cut_depth_mm: default_max_cut_depth(),
        }
    }
}

impl KeyDimensions {
    /// Reject dimensions no printer could produce
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("length_mm", self.length_mm),
            ("width_mm", self.width_mm),
            ("thickness_mm", self.thickness_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("Key {} must be a positive number, got {}", name, value);
            }
        }
        if !self.max_cut_depth_mm.is_finite() || self.max_cut_depth_mm < 0.0 {
            bail!(
                "Key max_cut_depth_mm must not be negative, got {}",
                self.max_cut_depth_mm
            );
        }
        Ok(())
    }

    /// Warnings for an outline that does not fit this blank
    ///
    /// Cuts deeper than `max_cut_depth_mm`, a blade taller than the blank or
    /// an outline wider than `width_mm` still build, but the printed key will
    /// not match the physical one.
    pub fn fit_warnings(&self, contour: &Contour, profile: &HeightProfile) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(bounds) = Bounds::from_points(contour.points()) {
            let across = bounds.width().min(bounds.height());
            if across > self.width_mm + WARN_SLACK {
                warnings.push(format!(
                    "Outline is {:.2}mm across, wider than the {:.2}mm blank",
                    across, self.width_mm
                ));
            }
        }

        if profile.max_height() > self.thickness_mm + WARN_SLACK {
            warnings.push(format!(
                "Tallest vertex is {:.2}mm, thicker than the {:.2}mm blank",
                profile.max_height(),
                self.thickness_mm
            ));
        }

        let floor = self.thickness_mm - self.max_cut_depth_mm;
        if let HeightProfile::PerVertex(heights) = profile {
            let too_deep = heights.iter().filter(|&&h| h < floor - WARN_SLACK).count();
            if too_deep > 0 {
                warnings.push(format!(
                    "{} vertices are cut deeper than {:.2}mm",
                    too_deep, self.max_cut_depth_mm
                ));
            }
        }

        warnings
    }
}

/// Measurement slack before a dimension mismatch is reported (mm)
const WARN_SLACK: f64 = 1e-6;

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<StlFormat>,
    #[serde(default)]
    pub cap: Option<CapStrategy>,
    #[serde(default)]
    pub key: KeyDimensions,
    #[serde(default = "default_fit")]
    pub fit: bool,
    #[serde(default = "default_simplify")]
    pub simplify: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub verify: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            output: None,
            format: None,
            cap: None,
            key: KeyDimensions::default(),
            fit: default_fit(),
            simplify: default_simplify(),
            tolerance: default_tolerance(),
            verbose: false,
            verify: false,
        }
    }
}

impl FileConfig {
    /// Load the first config file found in the standard locations
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

/// Reject a tolerance that is negative or not a number
pub fn check_tolerance(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("{} must be zero or positive, got {}", name, value);
    }
    Ok(())
}

/// Where to write the STL for `input`
///
/// Defaults to the input with an `.stl` extension, or `<stem>_key.stl` when
/// the input already is an STL file. The input is never overwritten.
pub fn resolve_output_path(input: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
    let output = output.unwrap_or_else(|| {
        let path = input.with_extension("stl");
        if path == input {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            input.with_file_name(format!("{}_key.stl", stem))
        } else {
            path
        }
    });
    if output == input {
        bail!("Output path {:?} would overwrite the input outline", output);
    }
    Ok(output)
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("key2stl.toml"));
    paths.push(PathBuf::from(".key2stl.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("key2stl").join("config.toml"));
        paths.push(config_dir.join("key2stl.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".key2stl.toml"));
        paths.push(home.join(".config").join("key2stl").join("config.toml"));
    }

    paths
}
