pub mod contour;
pub mod profile;

pub use contour::{Contour, Point2};
pub use profile::HeightProfile;
