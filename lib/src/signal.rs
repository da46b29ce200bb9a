//! Input signals and the conditioning applied before the transform
//!
//! A [`Signal`] holds one or two dimensional, real or complex samples.
//! The transform runs along one axis; the other axis is carried along as
//! independent channels. Conditioning (constant detrend, analytic signal)
//! operates on one channel at a time.

use crate::error::GftError;
use crate::Result;
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};

/// Axis of a [`Signal`] along which the transform is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Axis 0: for a 2-D signal every column is a channel
    First,
    /// The last axis: for a 2-D signal every row is a channel
    #[default]
    Last,
}

/// Shape of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single sequence of `n` samples
    OneD(usize),
    /// `rows x cols` samples stored row-major
    TwoD(usize, usize),
}

/// A real or complex valued signal, one or two dimensional
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<Complex64>,
    shape: Shape,
}

impl Signal {
    /// Create a 1-D signal from real samples
    pub fn from_real(samples: &[f64]) -> Self {
        Self {
            samples: samples.iter().map(|&x| Complex64::new(x, 0.0)).collect(),
            shape: Shape::OneD(samples.len()),
        }
    }

    /// Create a 1-D signal from complex samples
    pub fn from_complex(samples: Vec<Complex64>) -> Self {
        let n = samples.len();
        Self {
            samples,
            shape: Shape::OneD(n),
        }
    }

    /// Create a 2-D signal from real rows
    pub fn from_real_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let complex_rows: Vec<Vec<Complex64>> = rows
            .iter()
            .map(|row| row.iter().map(|&x| Complex64::new(x, 0.0)).collect())
            .collect();
        Self::from_complex_rows(complex_rows)
    }

    /// Create a 2-D signal from complex rows, all of equal length
    pub fn from_complex_rows(rows: Vec<Vec<Complex64>>) -> Result<Self> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, |row| row.len());

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != num_cols {
                return Err(GftError::shape_mismatch(format!(
                    "row {} has {} samples, expected {}",
                    idx,
                    row.len(),
                    num_cols
                )));
            }
        }

        Ok(Self {
            samples: rows.into_iter().flatten().collect(),
            shape: Shape::TwoD(num_rows, num_cols),
        })
    }

    /// Shape of the signal
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Total number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when every imaginary part is exactly zero
    pub fn is_real(&self) -> bool {
        self.samples.iter().all(|s| s.im == 0.0)
    }

    /// Number of samples along the transform axis
    pub fn axis_len(&self, axis: Axis) -> usize {
        match (self.shape, axis) {
            (Shape::OneD(n), _) => n,
            (Shape::TwoD(rows, _), Axis::First) => rows,
            (Shape::TwoD(_, cols), Axis::Last) => cols,
        }
    }

    /// Split the signal into channels that each run along `axis`
    pub fn channels(&self, axis: Axis) -> Vec<Vec<Complex64>> {
        match (self.shape, axis) {
            (Shape::OneD(_), _) => vec![self.samples.clone()],
            (Shape::TwoD(_, cols), Axis::Last) => {
                if cols == 0 {
                    return Vec::new();
                }
                self.samples.chunks(cols).map(|row| row.to_vec()).collect()
            }
            (Shape::TwoD(rows, cols), Axis::First) => (0..cols)
                .map(|col| (0..rows).map(|row| self.samples[row * cols + col]).collect())
                .collect(),
        }
    }
}

/// Remove the constant offset of a channel, returning the removed mean
pub fn detrend_constant(channel: &mut [Complex64]) -> Complex64 {
    if channel.is_empty() {
        return Complex64::new(0.0, 0.0);
    }
    let mean = channel.iter().sum::<Complex64>() / channel.len() as f64;
    for sample in channel.iter_mut() {
        *sample -= mean;
    }
    mean
}

/// Analytic signal of the real part of `channel` (Hilbert transform)
///
/// Positive frequencies are doubled, negative ones suppressed; DC and, for
/// even lengths, the Nyquist bin are kept as they are.
pub fn analytic_signal(
    channel: &[Complex64],
    real_planner: &mut RealFftPlanner<f64>,
    planner: &mut FftPlanner<f64>,
) -> Result<Vec<Complex64>> {
    let n = channel.len();
    if n == 0 {
        return Err(GftError::invalid_input("cannot build analytic signal of empty channel"));
    }

    let r2c = real_planner.plan_fft_forward(n);
    let mut input: Vec<f64> = channel.iter().map(|s| s.re).collect();
    let mut half_spectrum = r2c.make_output_vec();
    r2c.process(&mut input, &mut half_spectrum)
        .map_err(|e| GftError::Fft {
            reason: e.to_string(),
        })?;

    let mut spectrum = vec![Complex64::new(0.0, 0.0); n];
    spectrum[0] = half_spectrum[0];
    for k in 1..(n + 1) / 2 {
        spectrum[k] = half_spectrum[k] * 2.0;
    }
    if n % 2 == 0 {
        spectrum[n / 2] = half_spectrum[n / 2];
    }

    let ifft = planner.plan_fft_inverse(n);
    ifft.process(&mut spectrum);
    let scale = 1.0 / n as f64;
    for sample in spectrum.iter_mut() {
        *sample *= scale;
    }

    Ok(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_channels_follow_axis() {
        let signal =
            Signal::from_real_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(signal.shape(), Shape::TwoD(2, 3));

        let rows = signal.channels(Axis::Last);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].re, 4.0);
        assert_eq!(signal.axis_len(Axis::Last), 3);

        let cols = signal.channels(Axis::First);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[2].iter().map(|s| s.re).collect::<Vec<_>>(), vec![3.0, 6.0]);
        assert_eq!(signal.axis_len(Axis::First), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = Signal::from_real_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(GftError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_is_real() {
        assert!(Signal::from_real(&[1.0, -2.0]).is_real());
        let complex = Signal::from_complex(vec![Complex64::new(1.0, 0.5)]);
        assert!(!complex.is_real());
    }

    #[test]
    fn test_detrend_constant() {
        let mut channel: Vec<Complex64> = [3.0, 4.0, 5.0]
            .iter()
            .map(|&x| Complex64::new(x, 0.0))
            .collect();
        let mean = detrend_constant(&mut channel);
        assert!((mean.re - 4.0).abs() < 1e-12);
        assert!(channel.iter().sum::<Complex64>().norm() < 1e-12);
    }

    #[test]
    fn test_analytic_signal_of_cosine() {
        let n = 64;
        let channel: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new((2.0 * PI * 5.0 * i as f64 / n as f64).cos(), 0.0))
            .collect();

        let mut real_planner = RealFftPlanner::new();
        let mut planner = FftPlanner::new();
        let analytic = analytic_signal(&channel, &mut real_planner, &mut planner).unwrap();

        // cos -> cos + i sin, so the envelope is flat and the real part is kept
        for (i, value) in analytic.iter().enumerate() {
            assert!((value.norm() - 1.0).abs() < 1e-10, "envelope at {}", i);
            assert!((value.re - channel[i].re).abs() < 1e-10);
            let expected_im = (2.0 * PI * 5.0 * i as f64 / n as f64).sin();
            assert!((value.im - expected_im).abs() < 1e-10);
        }
    }

    #[test]
    fn test_analytic_signal_odd_length() {
        let channel: Vec<Complex64> = [1.0, 0.0, -1.0, 0.5, 2.0]
            .iter()
            .map(|&x| Complex64::new(x, 0.0))
            .collect();
        let mut real_planner = RealFftPlanner::new();
        let mut planner = FftPlanner::new();
        let analytic = analytic_signal(&channel, &mut real_planner, &mut planner).unwrap();
        for (a, c) in analytic.iter().zip(channel.iter()) {
            assert!((a.re - c.re).abs() < 1e-10);
        }
    }
}
