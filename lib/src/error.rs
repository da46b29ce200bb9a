use std::{error, fmt};

/// Errors raised by the transform and the interpolation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GftError {
    /// The signal or an argument cannot be processed as given.
    InvalidInput {
        /// Explaining why the input was rejected.
        reason: String,
    },
    /// A sampling scheme name that is not known.
    UnsupportedSamplingScheme {
        /// The name that was asked for.
        name: String,
    },
    /// A window name that is not known.
    UnsupportedWindow {
        /// The name that was asked for.
        name: String,
    },
    /// Too few samples along an axis for the requested interpolation kind.
    InterpolationDomainError {
        /// Axis being interpolated, `"time"` or `"frequency"`.
        axis: &'static str,
        /// Number of samples available.
        samples: usize,
        /// Minimum number of samples the kind needs.
        required: usize,
    },
    /// Lengths or shapes that must agree do not.
    ShapeMismatch {
        /// Explaining which shapes disagree.
        reason: String,
    },
    /// The FFT backend refused a buffer.
    Fft {
        /// Message reported by the backend.
        reason: String,
    },
}

impl GftError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        GftError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn shape_mismatch(reason: impl Into<String>) -> Self {
        GftError::ShapeMismatch {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GftError::InvalidInput { reason } => write!(f, "Invalid input: {reason}"),
            GftError::UnsupportedSamplingScheme { name } => {
                write!(f, "Unsupported sampling scheme `{name}` (expected `full` or `dyadic`)")
            }
            GftError::UnsupportedWindow { name } => {
                write!(f, "Unsupported window `{name}` (expected `gaussian`)")
            }
            GftError::InterpolationDomainError {
                axis,
                samples,
                required,
            } => write!(
                f,
                "Cannot interpolate along {axis}: {samples} sample(s) available, at least {required} required"
            ),
            GftError::ShapeMismatch { reason } => write!(f, "Shape mismatch: {reason}"),
            GftError::Fft { reason } => write!(f, "FFT error: {reason}"),
        }
    }
}

impl error::Error for GftError {}
