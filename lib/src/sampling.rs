//! Frequency sampling schemes
//!
//! A sampling scheme partitions the FFT bin axis of a length `n` signal into
//! bands. Each band is analysed on its own and yields one voice whose time
//! resolution equals the number of bins the band covers.

use crate::error::GftError;
use crate::window::fft_frequencies;
use crate::Result;
use std::fmt;
use std::str::FromStr;

/// One analysis band, in FFT bin units
///
/// A band covers the bins `start <= f < end`. When `start > end` the band
/// wraps past Nyquist and covers `end <= f < start` of the mirrored axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Centre frequency; the window is centred here and all samples of the
    /// band carry this frequency
    pub centre: i64,
    /// First bin of the band
    pub start: i64,
    /// Bin past the end of the band
    pub end: i64,
}

impl Band {
    pub fn new(centre: i64, start: i64, end: i64) -> Self {
        Self { centre, start, end }
    }

    /// The band reflected around zero frequency
    pub fn mirrored(&self) -> Self {
        Self {
            centre: -self.centre,
            start: -self.start,
            end: -self.end,
        }
    }

    /// Whether a bin with frequency `freq`, measured relative to the band
    /// centre after circular alignment, falls inside the band
    pub fn contains(&self, freq: i64) -> bool {
        if self.start > self.end {
            freq < self.start && freq >= self.end
        } else {
            freq >= self.start && freq < self.end
        }
    }
}

/// How the frequency axis is sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Every FFT bin is its own band: the redundant S transform
    #[default]
    Full,
    /// Octave bands of doubling width: the fast, non-redundant transform
    Dyadic,
}

impl fmt::Display for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Sampling {
    type Err = GftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Sampling::Full),
            "dyadic" => Ok(Sampling::Dyadic),
            _ => Err(GftError::UnsupportedSamplingScheme {
                name: s.to_string(),
            }),
        }
    }
}

impl Sampling {
    /// Get all available sampling schemes
    pub fn all() -> &'static [Sampling] {
        &[Sampling::Full, Sampling::Dyadic]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Sampling::Full => "full",
            Sampling::Dyadic => "dyadic",
        }
    }

    /// Raw bands of the scheme for a length `n` signal
    pub fn bands(&self, n: usize) -> Result<Vec<Band>> {
        match self {
            Sampling::Full => full_sampling(n),
            Sampling::Dyadic => dyadic(n),
        }
    }

    /// Band layout used by the transform, ascending by centre
    ///
    /// Without negative frequencies the negative centres of the full scheme
    /// are dropped. With negative frequencies, a scheme that only produced
    /// non-negative centres is mirrored: every band except the one centred
    /// at zero gets a negated twin.
    pub fn layout(&self, n: usize, keep_negative: bool) -> Result<Vec<Band>> {
        let mut bands = self.bands(n)?;

        if !keep_negative && *self == Sampling::Full {
            bands.retain(|band| band.centre >= 0);
        } else if keep_negative && bands.iter().all(|band| band.centre >= 0) {
            let mirrored: Vec<Band> = bands
                .iter()
                .filter(|band| band.centre != 0)
                .map(Band::mirrored)
                .collect();
            bands.extend(mirrored);
        }

        bands.sort_by_key(|band| band.centre);
        Ok(bands)
    }
}

fn ensure_length(n: usize) -> Result<()> {
    if n == 0 {
        return Err(GftError::invalid_input(
            "signal length must be positive to build a sampling scheme",
        ));
    }
    Ok(())
}

/// Dyadic bands: widths 1, 1, 2, 4, 8, ... up to just under Nyquist
pub fn dyadic(n: usize) -> Result<Vec<Band>> {
    ensure_length(n)?;
    let n_i = n as i64;

    // ceil(log2(n)) without going through floating point
    let levels = n.next_power_of_two().trailing_zeros() as i64;

    let mut starts = vec![0_i64];
    starts.extend((0..(levels - 1).max(0)).map(|k| 1_i64 << k));

    Ok(starts
        .into_iter()
        .map(|start| {
            let (centre, width) = if start < 2 {
                (start + 1, 1)
            } else {
                ((1.5 * start as f64 + 1.0) as i64, start)
            };
            Band::new(centre, start, (start + width).min(n_i))
        })
        .collect())
}

/// One band per FFT bin, sorted from the most negative to the most
/// positive frequency
pub fn full_sampling(n: usize) -> Result<Vec<Band>> {
    ensure_length(n)?;
    let mut centres = fft_frequencies(n);
    centres.sort_unstable();

    let min = centres[0];
    let max = centres[centres.len() - 1];

    Ok(centres
        .into_iter()
        .map(|centre| Band::new(centre, min - 1, max + 1))
        .collect())
}
