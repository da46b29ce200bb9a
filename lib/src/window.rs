//! Window functions for the transform
//!
//! Two kinds of windows are involved: the frequency-domain analysis window
//! that localises each voice (Gaussian by default), and the Hann taper that
//! optionally softens both edges of the signal before analysis.

use crate::error::GftError;
use crate::Result;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Frequency-domain window evaluated for a length `n` and a voice centre `f`
pub type WindowFn = fn(usize, f64) -> Vec<f64>;

/// Analysis window applied to every non-DC band
#[derive(Clone, Copy, Default)]
pub enum Window {
    /// Gaussian window of the classic Stockwell transform
    #[default]
    Gaussian,
    /// User-supplied window spectrum, must return `n` values in FFT order
    Custom(WindowFn),
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Window {
    type Err = GftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" => Ok(Window::Gaussian),
            _ => Err(GftError::UnsupportedWindow {
                name: s.to_string(),
            }),
        }
    }
}

impl Window {
    /// Get the name of the window
    pub fn name(&self) -> &'static str {
        match self {
            Window::Gaussian => "gaussian",
            Window::Custom(_) => "custom",
        }
    }

    /// Evaluate the window spectrum for a signal of length `n` and centre `f`
    pub fn spectrum(&self, n: usize, f: f64) -> Result<Vec<f64>> {
        let win = match self {
            Window::Gaussian => gaussian_ft(n, f)?,
            Window::Custom(func) => func(n, f),
        };
        if win.len() != n {
            return Err(GftError::shape_mismatch(format!(
                "{} window returned {} values for a length {} signal",
                self.name(),
                win.len(),
                n
            )));
        }
        Ok(win)
    }
}

/// Integer frequency of every FFT bin, in FFT order
///
/// `[0, 1, ..., ceil(n/2) - 1, -floor(n/2), ..., -1]`
pub fn fft_frequencies(n: usize) -> Vec<i64> {
    let n_i = n as i64;
    let positive = (n_i + 1) / 2;
    (0..n_i)
        .map(|i| if i < positive { i } else { i - n_i })
        .collect()
}

/// Fourier transform of a Gaussian window whose width scales with `1 / f`
pub fn gaussian_ft(n: usize, f: f64) -> Result<Vec<f64>> {
    if f == 0.0 {
        return Err(GftError::invalid_input(
            "gaussian window is undefined for centre frequency 0",
        ));
    }
    let scale = -2.0 * PI * PI / (f * f);
    Ok(fft_frequencies(n)
        .into_iter()
        .map(|x| {
            let x = x as f64;
            (x * x * scale).exp()
        })
        .collect())
}

/// Symmetric Hann window of `size` points
pub fn hanning(size: usize) -> Vec<f64> {
    match size {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => (0..size)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / (size - 1) as f64).cos())
            .collect(),
    }
}

/// Length of the edge taper for a signal of `n` samples: 10% of the
/// signal, rounded up to an even count
pub fn taper_length(n: usize) -> usize {
    let len = n / 10;
    if len % 2 != 0 {
        len + 1
    } else {
        len
    }
}

/// Multiply the first and last half-taper of `channel` by the rising and
/// falling halves of a Hann window
pub fn apply_edge_taper<T>(channel: &mut [T])
where
    T: std::ops::MulAssign<f64>,
{
    let n = channel.len();
    let hann_len = taper_length(n);
    let half = hann_len / 2;
    if half == 0 || half > n {
        return;
    }

    let hann = hanning(hann_len);
    for i in 0..half {
        channel[i] *= hann[i];
        channel[n - half + i] *= hann[hann_len - half + i];
    }
}
