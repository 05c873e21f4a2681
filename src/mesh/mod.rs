pub mod builder;
pub mod error;
pub mod extrusion;
pub mod stl;
pub mod triangulation;
pub mod validation;

pub use builder::{Mesh, Triangle};
pub use error::{BuildError, BuildResult, Degeneracy, InvalidContourError};
pub use extrusion::{BuildConfig, ContourExtrusionMeshBuilder};
pub use stl::{read_back, write_stl, write_stl_ascii};
pub use triangulation::{ear_clip_cap, fan_cap};
pub use validation::{EdgeReport, ValidationResult, signed_volume, validate_mesh};
