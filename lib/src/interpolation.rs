//! Regridding of transform results onto a uniform time-frequency grid
//!
//! Every band of a transform has its own time axis. Interpolation first
//! resamples each band along time onto a shared time axis, then resamples
//! every time column across the band centres onto a uniform frequency axis.

use crate::error::GftError;
use crate::gft::Coords;
use crate::Result;
use num_complex::Complex64;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// 1-D interpolation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationKind {
    /// Value of the closest sample; ties go to the lower sample
    #[default]
    Nearest,
    /// Straight line between the two neighbouring samples
    Linear,
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for InterpolationKind {
    type Err = GftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(InterpolationKind::Nearest),
            "linear" => Ok(InterpolationKind::Linear),
            _ => Err(GftError::invalid_input(format!(
                "unknown interpolation kind `{}` (expected `nearest` or `linear`)",
                s
            ))),
        }
    }
}

impl InterpolationKind {
    pub fn name(&self) -> &'static str {
        match self {
            InterpolationKind::Nearest => "nearest",
            InterpolationKind::Linear => "linear",
        }
    }

    /// Minimum number of samples the kind needs
    pub fn min_samples(&self) -> usize {
        match self {
            InterpolationKind::Nearest => 1,
            InterpolationKind::Linear => 2,
        }
    }
}

/// Interpolant over strictly increasing sample positions
///
/// Queries outside the sampled range are clamped to the first or last
/// sample, never extrapolated.
#[derive(Debug, Clone)]
pub struct Interpolant {
    x: Vec<f64>,
    y: Vec<Complex64>,
    kind: InterpolationKind,
    midpoints: Vec<f64>,
}

impl Interpolant {
    /// Build an interpolant from `(x, y)` sample pairs
    pub fn new(x: Vec<f64>, y: Vec<Complex64>, kind: InterpolationKind) -> Result<Self> {
        Self::along("x", x, y, kind)
    }

    fn along(
        axis: &'static str,
        x: Vec<f64>,
        y: Vec<Complex64>,
        kind: InterpolationKind,
    ) -> Result<Self> {
        if x.len() != y.len() {
            return Err(GftError::shape_mismatch(format!(
                "{} positions but {} values along {}",
                x.len(),
                y.len(),
                axis
            )));
        }
        if x.len() < kind.min_samples() {
            return Err(GftError::InterpolationDomainError {
                axis,
                samples: x.len(),
                required: kind.min_samples(),
            });
        }
        if x.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(GftError::invalid_input(format!(
                "sample positions along {} must be strictly increasing",
                axis
            )));
        }

        let midpoints = match kind {
            InterpolationKind::Nearest => x.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect(),
            InterpolationKind::Linear => Vec::new(),
        };

        Ok(Self {
            x,
            y,
            kind,
            midpoints,
        })
    }

    /// Evaluate at `xq`
    pub fn eval(&self, xq: f64) -> Complex64 {
        let last = self.x.len() - 1;
        let xq = xq.clamp(self.x[0], self.x[last]);

        match self.kind {
            InterpolationKind::Nearest => {
                let idx = self.midpoints.partition_point(|&m| m < xq);
                self.y[idx]
            }
            InterpolationKind::Linear => {
                let i = self.x.partition_point(|&v| v < xq).min(last);
                if self.x[i] == xq || i == 0 {
                    return self.y[i];
                }
                let (x0, x1) = (self.x[i - 1], self.x[i]);
                let t = (xq - x0) / (x1 - x0);
                self.y[i - 1] + (self.y[i] - self.y[i - 1]) * t
            }
        }
    }

    /// Evaluate at every point of `xs`
    pub fn eval_many(&self, xs: &[f64]) -> Vec<Complex64> {
        xs.iter().map(|&xq| self.eval(xq)).collect()
    }
}

/// `num` evenly spaced values from `start` to `stop` inclusive
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// Requested output of [`interpolate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationConfig {
    /// Number of frequency rows
    pub freq_bins: usize,
    /// Number of time columns
    pub time_bins: usize,
    /// Length of the transformed signal
    pub data_len: usize,
    /// Interpolation along time
    pub time_kind: InterpolationKind,
    /// Interpolation across frequencies
    pub freq_kind: InterpolationKind,
}

impl InterpolationConfig {
    /// Create a configuration with nearest-neighbour interpolation on both axes
    pub fn new(freq_bins: usize, time_bins: usize, data_len: usize) -> Result<Self> {
        if freq_bins == 0 || time_bins == 0 {
            return Err(GftError::shape_mismatch(format!(
                "output shape must be positive, got {}x{}",
                freq_bins, time_bins
            )));
        }
        if data_len == 0 {
            return Err(GftError::invalid_input("data length must be positive"));
        }
        Ok(Self {
            freq_bins,
            time_bins,
            data_len,
            time_kind: InterpolationKind::Nearest,
            freq_kind: InterpolationKind::Nearest,
        })
    }

    /// One column per datapoint and one row per non-negative frequency bin
    pub fn for_signal(data_len: usize) -> Result<Self> {
        Self::new(data_len / 2 + 1, data_len, data_len)
    }

    pub fn with_kinds(mut self, time_kind: InterpolationKind, freq_kind: InterpolationKind) -> Self {
        self.time_kind = time_kind;
        self.freq_kind = freq_kind;
        self
    }

    /// `(frequency rows, time columns)`
    pub fn output_shape(&self) -> (usize, usize) {
        (self.freq_bins, self.time_bins)
    }
}

/// Transform result resampled onto a uniform grid
#[derive(Debug, Clone)]
pub struct InterpolatedGrid {
    /// Time of every column, in datapoints
    pub times: Vec<f64>,
    /// Frequency of every row, in FFT bins
    pub freqs: Vec<f64>,
    /// Complex values, `values[frequency][time]`
    pub values: Vec<Vec<Complex64>>,
}

impl InterpolatedGrid {
    /// `(frequency rows, time columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.freqs.len(), self.times.len())
    }

    /// Magnitude of every grid value
    pub fn magnitudes(&self) -> Vec<Vec<f64>> {
        self.values
            .iter()
            .map(|row| row.iter().map(|v| v.norm()).collect())
            .collect()
    }

    /// Convert magnitudes to decibels relative to `reference`
    pub fn to_db(&self, reference: f64) -> Vec<Vec<f64>> {
        let min_db = -100.0; // Floor value for very small magnitudes

        self.values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| {
                        let mag = v.norm();
                        if mag > 0.0 {
                            (20.0 * (mag / reference).log10()).max(min_db)
                        } else {
                            min_db
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Contiguous samples that share one frequency
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrequencyRun {
    freq: f64,
    start: usize,
    end: usize,
}

/// Split coordinates into runs of equal frequency, in order of appearance
fn frequency_runs(coords: &Coords) -> Result<Vec<FrequencyRun>> {
    let mut runs: Vec<FrequencyRun> = Vec::new();
    let mut seen = HashSet::new();

    for (i, &freq) in coords.freqs.iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.freq == freq => run.end = i + 1,
            _ => {
                if !seen.insert(freq.to_bits()) {
                    return Err(GftError::invalid_input(format!(
                        "samples of frequency {} are not contiguous",
                        freq
                    )));
                }
                runs.push(FrequencyRun {
                    freq,
                    start: i,
                    end: i + 1,
                });
            }
        }
    }

    Ok(runs)
}

/// Resample every frequency run onto `target_times`
///
/// Each run is padded with copies of its first and last sample at `t = 0`
/// and `t = data_len` so that the whole target range is covered.
fn time_rows(
    coords: &Coords,
    values: &[Complex64],
    runs: &[FrequencyRun],
    target_times: &[f64],
    data_len: f64,
    kind: InterpolationKind,
) -> Result<Vec<Vec<Complex64>>> {
    runs.iter()
        .map(|run| {
            let mut x = coords.times[run.start..run.end].to_vec();
            let mut y = values[run.start..run.end].to_vec();

            if x.len() == 1 && kind == InterpolationKind::Linear {
                log::warn!(
                    "Band at frequency {} has a single sample, linear interpolation along time is flat",
                    run.freq
                );
            }

            if x[0] != 0.0 {
                x.insert(0, 0.0);
                y.insert(0, y[0]);
            }
            if x[x.len() - 1] != data_len {
                x.push(data_len);
                y.push(y[y.len() - 1]);
            }

            Ok(Interpolant::along("time", x, y, kind)?.eval_many(target_times))
        })
        .collect()
}

/// Interpolate a transform result onto a uniform `(frequency, time)` grid
///
/// `values` holds the samples of one channel matching `coords`. The time
/// axis spans `[0, data_len]`; the frequency axis spans
/// `[0, data_len / 2]`, or `[-data_len / 2, data_len / 2]` when negative
/// frequencies are present.
pub fn interpolate(
    coords: &Coords,
    values: &[Complex64],
    output_shape: (usize, usize),
    data_len: usize,
    time_kind: InterpolationKind,
    freq_kind: InterpolationKind,
) -> Result<InterpolatedGrid> {
    let (freq_bins, time_bins) = output_shape;

    if coords.freqs.len() != coords.times.len() || coords.len() != values.len() {
        return Err(GftError::shape_mismatch(format!(
            "{} frequencies, {} times and {} values",
            coords.freqs.len(),
            coords.times.len(),
            values.len()
        )));
    }
    if freq_bins == 0 || time_bins == 0 {
        return Err(GftError::shape_mismatch(format!(
            "output shape must be positive, got {}x{}",
            freq_bins, time_bins
        )));
    }
    if values.is_empty() {
        return Err(GftError::invalid_input("nothing to interpolate"));
    }
    if data_len == 0 {
        return Err(GftError::invalid_input("data length must be positive"));
    }

    let runs = frequency_runs(coords)?;
    if runs.len() < freq_kind.min_samples() {
        return Err(GftError::InterpolationDomainError {
            axis: "frequency",
            samples: runs.len(),
            required: freq_kind.min_samples(),
        });
    }

    log::info!(
        "Interpolating {} samples in {} bands onto {}x{} grid ({} time, {} frequency)",
        values.len(),
        runs.len(),
        freq_bins,
        time_bins,
        time_kind,
        freq_kind
    );

    let mut order: Vec<usize> = (0..runs.len()).collect();
    order.sort_by(|&a, &b| runs[a].freq.total_cmp(&runs[b].freq));
    let sorted_freqs: Vec<f64> = order.iter().map(|&k| runs[k].freq).collect();

    let target_times = linspace(0.0, data_len as f64, time_bins);
    let half = (data_len / 2) as f64;
    let target_freqs = if sorted_freqs[0] >= 0.0 {
        linspace(0.0, half, freq_bins)
    } else {
        linspace(-half, half, freq_bins)
    };

    let rows = time_rows(
        coords,
        values,
        &runs,
        &target_times,
        data_len as f64,
        time_kind,
    )?;

    let mut grid = vec![vec![Complex64::new(0.0, 0.0); time_bins]; freq_bins];
    for t in 0..time_bins {
        let column: Vec<Complex64> = order.iter().map(|&k| rows[k][t]).collect();
        let interpolant = Interpolant::along("frequency", sorted_freqs.clone(), column, freq_kind)?;
        for (f, &freq) in target_freqs.iter().enumerate() {
            grid[f][t] = interpolant.eval(freq);
        }
    }

    Ok(InterpolatedGrid {
        times: target_times,
        freqs: target_freqs,
        values: grid,
    })
}
