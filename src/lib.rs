//! key2stl - Extrude key outlines into watertight, 3D-printable STL solids

pub mod config;
pub mod domain;
pub mod geometry;
pub mod mesh;
pub mod pipeline;
pub mod source;

pub use domain::{Contour, HeightProfile};
pub use mesh::{BuildError, ContourExtrusionMeshBuilder, Mesh};
pub use pipeline::{KeyModel, KeyPipeline};
