use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

use key2stl::config::{
    CapStrategy, FileConfig, KeyDimensions, StlFormat, check_tolerance, resolve_output_path,
};
use key2stl::mesh::stl::estimate_stl_size;
use key2stl::mesh::{BuildConfig, read_back, signed_volume, validate_mesh, write_stl, write_stl_ascii};
use key2stl::source::{ContourSource, JsonContourFile};
use key2stl::KeyPipeline;

/// Extrude a key outline into a watertight, 3D-printable STL solid
///
/// The outline comes from an image-analysis step as JSON:
///   {"points": [[x, y], ...], "heights": [h, ...]}
/// where "heights" is optional (the blank thickness is used without it).
/// "depths" may be given instead: cut depths below the blank's top face.
///
/// Examples:
///   # Extrude a convex blank outline to blank.stl
///   key2stl blank.json
///
///   # Notched blade traced in pixels, 55 mm long, verified after writing
///   key2stl house_key.json --cap ear-clip --length 55 --verify
///
///   # Outline already in mm, ASCII output
///   key2stl blade_mm.json --no-fit --format ascii -o blade.stl
#[derive(Parser, Debug)]
#[command(name = "key2stl")]
#[command(version, about, long_about = None)]
struct Args {
    /// Outline JSON file
    input: PathBuf,

    /// Output STL file path (defaults to the input name with .stl)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Path to config file (optional, auto-searches key2stl.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// STL encoding
    #[arg(long)]
    format: Option<StlFormat>,

    /// Cap triangulation: fan (convex outlines only) or ear-clip
    #[arg(long)]
    cap: Option<CapStrategy>,

    /// Key length in mm; the outline's longest side is scaled to it
    #[arg(long)]
    length: Option<f64>,

    /// Blank thickness in mm, used when the outline has no heights
    #[arg(long)]
    thickness: Option<f64>,

    /// Outline simplification tolerance in source units (0 = off)
    #[arg(long)]
    simplify: Option<f64>,

    /// Keep outline coordinates as they are (already in mm)
    #[arg(long)]
    no_fit: bool,

    /// Read the written file back and check it is watertight
    #[arg(long)]
    verify: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) => FileConfig::from_path(config_path)?,
        None => FileConfig::load().unwrap_or_default(),
    };

    let dimensions = KeyDimensions {
        length_mm: args.length.unwrap_or(file_config.key.length_mm),
        thickness_mm: args.thickness.unwrap_or(file_config.key.thickness_mm),
        ..file_config.key
    };
    dimensions.validate()?;

    let simplify = args.simplify.unwrap_or(file_config.simplify);
    check_tolerance("--simplify", simplify)?;
    check_tolerance("Config tolerance", file_config.tolerance)?;

    let pipeline = KeyPipeline {
        dimensions,
        fit: file_config.fit && !args.no_fit,
        simplify,
        cap: args.cap.or(file_config.cap).unwrap_or_default(),
        build: BuildConfig {
            tolerance: file_config.tolerance,
        },
    };
    let format = args.format.or(file_config.format).unwrap_or_default();
    let verbose = args.verbose || file_config.verbose;
    let verify = args.verify || file_config.verify;

    let output_path = resolve_output_path(
        &args.input,
        args.output.clone().or_else(|| file_config.output.clone()),
    )?;

    println!("key2stl - Key Outline STL Generator");
    println!("===================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Input: {}", args.input.display());
        println!("  Key length: {}mm", dimensions.length_mm);
        println!("  Key width: {}mm", dimensions.width_mm);
        println!("  Blank thickness: {}mm", dimensions.thickness_mm);
        println!("  Max cut depth: {}mm", dimensions.max_cut_depth_mm);
        println!("  Fit to length: {}", if pipeline.fit { "yes" } else { "no" });
        println!("  Simplify tolerance: {}", pipeline.simplify);
        println!("  Cap triangulation: {:?}", pipeline.cap);
        println!("  Tolerance: {:e}", pipeline.build.tolerance);
        println!("  Format: {:?}", format);
        println!("  Output: {}", output_path.display());
        println!();
    }

    let spinner = create_spinner("Loading outline...");
    let start = Instant::now();
    let outline = JsonContourFile::new(&args.input).load()?;
    spinner.finish_with_message(format!(
        "Loaded {} outline points{} [{:.1}s]",
        outline.contour.len(),
        if outline.heights.is_some() {
            " with sampled heights"
        } else if outline.depths.is_some() {
            " with cut depths"
        } else {
            ""
        },
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Extruding outline...");
    let start = Instant::now();
    let model = pipeline.run(&outline).context("Failed to build key mesh")?;
    spinner.finish_with_message(format!(
        "Built {} vertices, {} triangles from {} outline points [{:.1}s]",
        model.mesh.vertex_count(),
        model.mesh.face_count(),
        model.contour.len(),
        start.elapsed().as_secs_f32()
    ));

    for warning in dimensions.fit_warnings(&model.contour, &model.profile) {
        eprintln!("Warning: {}", warning);
    }

    let report = validate_mesh(&model.mesh);
    if verbose {
        println!("  {}", report.summary());
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
    if !report.is_printable() {
        bail!("Refusing to write a mesh that is not printable: {}", report.summary());
    }

    let spinner = create_spinner("Writing STL file...");
    let start = Instant::now();
    let triangles = model.mesh.triangles();
    match format {
        StlFormat::Binary => write_stl(&output_path, &triangles)?,
        StlFormat::Ascii => write_stl_ascii(&output_path, &solid_name(&args.input), &triangles)?,
    }
    let file_size = std::fs::metadata(&output_path)
        .map(|m| m.len() as usize)
        .unwrap_or_else(|_| estimate_stl_size(triangles.len()));
    spinner.finish_with_message(format!(
        "Wrote {} triangles ({:.1} KB) [{:.1}s]",
        triangles.len(),
        file_size as f64 / 1024.0,
        start.elapsed().as_secs_f32()
    ));

    if verify {
        let spinner = create_spinner("Verifying written file...");
        let start = Instant::now();
        let restored = read_back(&output_path)?;
        let restored_report = validate_mesh(&restored);
        if !restored_report.is_printable() {
            spinner.abandon_with_message("Verification failed".to_string());
            bail!("Written STL is not printable: {}", restored_report.summary());
        }
        spinner.finish_with_message(format!(
            "Verified {} triangles, volume {:.2} mm^3 [{:.1}s]",
            restored.face_count(),
            signed_volume(&restored),
            start.elapsed().as_secs_f32()
        ));
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_path.display());
    println!("Volume: {:.2} mm^3", report.volume);

    Ok(())
}

/// Solid name for ASCII output, taken from the input file stem
fn solid_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().replace(char::is_whitespace, "_"))
        .unwrap_or_else(|| "key".to_string())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
