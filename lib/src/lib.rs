//! GFT Library
//!
//! Time-frequency decomposition of discrete signals with the general Fourier
//! family transform, a generalisation of the Stockwell (S) transform.
//! Supports fully redundant and dyadic frequency sampling, and regridding of
//! the irregular dyadic output onto a uniform time-frequency grid.

pub mod error;
pub mod gft;
pub mod interpolation;
pub mod sampling;
pub mod signal;
pub mod utils;
pub mod window;

pub use error::GftError;
pub use gft::{forward_transform, Coords, GftAnalyzer, GftConfig, GftOutput};
pub use interpolation::{interpolate, InterpolatedGrid, InterpolationConfig, InterpolationKind};
pub use num_complex::Complex64;
pub use sampling::Sampling;
pub use signal::{Axis, Signal};
pub use window::Window;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
///
/// Sets up logging when the `env_logger` feature is enabled.
pub fn init() {
    #[cfg(feature = "env_logger")]
    {
        let _ = env_logger::try_init();
    }
}

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, GftError>;
