pub mod scaling;
pub mod simplify;

pub use scaling::{Bounds, Scaler, fit_to_length};
pub use simplify::simplify_indices;
