//! General Fourier family transform
//!
//! The transform splits the spectrum of a signal into bands, windows each
//! band in the frequency domain and brings it back to the time domain. The
//! number of bins in a band sets how many time samples its voice gets, so
//! the dyadic scheme trades frequency resolution for time resolution as the
//! frequency grows.

pub mod analyzer;
pub mod core;

pub use analyzer::{forward_transform, GftAnalyzer};
pub use self::core::{Coords, GftConfig, GftOutput, SampleLayout, Voice};
