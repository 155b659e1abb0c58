pub mod dimensions;
pub mod mode;
pub mod profile;
pub mod thread;
pub mod topo;

pub use dimensions::*;
pub use mode::*;
pub use profile::*;
pub use thread::*;
pub use topo::*;

/// Absolute tolerance (length units) for comparing host-returned coordinates and radii.
pub const NEAR_ZERO: f64 = 1e-6;

/// `|a - b| < tol`.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}
