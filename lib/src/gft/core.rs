//! Core types and structures for the general Fourier family transform

use crate::error::GftError;
use crate::interpolation::{interpolate, InterpolatedGrid, InterpolationConfig};
use crate::sampling::{Band, Sampling};
use crate::signal::Axis;
use crate::window::Window;
use crate::Result;
use num_complex::Complex64;

/// Configuration for the forward transform
#[derive(Debug, Clone, Copy)]
pub struct GftConfig {
    /// Frequency-domain analysis window
    pub window: Window,
    /// Axis of the signal to transform
    pub axis: Axis,
    /// Frequency sampling scheme
    pub sampling: Sampling,
    /// Also analyse negative frequencies
    pub keep_negative_frequencies: bool,
    /// Taper the first and last 5% of the signal with half Hann windows
    pub taper: bool,
}

impl Default for GftConfig {
    fn default() -> Self {
        Self {
            window: Window::Gaussian,
            axis: Axis::Last,
            sampling: Sampling::Full,
            keep_negative_frequencies: false,
            taper: true,
        }
    }
}

impl GftConfig {
    pub fn new(sampling: Sampling) -> Self {
        Self {
            sampling,
            ..Self::default()
        }
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_negative_frequencies(mut self, keep: bool) -> Self {
        self.keep_negative_frequencies = keep;
        self
    }

    pub fn with_taper(mut self, taper: bool) -> Self {
        self.taper = taper;
        self
    }
}

/// The samples produced by one band
#[derive(Debug, Clone)]
pub struct Voice {
    /// Band the voice was computed for
    pub band: Band,
    /// Time location of each sample, in datapoints
    pub times: Vec<f64>,
    /// Samples per channel: `samples[channel][time]`
    pub samples: Vec<Vec<Complex64>>,
}

impl Voice {
    /// Number of time samples of the voice
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// (frequency, time) coordinate of every transform sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coords {
    /// Frequency bin of each sample
    pub freqs: Vec<f64>,
    /// Time location of each sample, in datapoints
    pub times: Vec<f64>,
}

impl Coords {
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }
}

/// Orientation of [`GftOutput::values`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// `values[channel][sample]`, used when the last axis was transformed
    ChannelMajor,
    /// `values[sample][channel]`, used when axis 0 of a 2-D signal was
    /// transformed
    SampleMajor,
}

/// Result of a forward transform
#[derive(Debug, Clone)]
pub struct GftOutput {
    /// Coordinates of every sample, in band order
    pub coords: Coords,
    /// Complex transform samples, oriented per `layout`
    pub values: Vec<Vec<Complex64>>,
    /// Orientation of `values`
    pub layout: SampleLayout,
    /// Length of the transformed axis
    pub signal_len: usize,
    voices: Vec<Voice>,
    num_channels: usize,
}

impl GftOutput {
    /// Flatten per-band voices into the coordinate list and sample arrays
    pub(crate) fn from_voices(
        voices: Vec<Voice>,
        layout: SampleLayout,
        signal_len: usize,
        num_channels: usize,
    ) -> Self {
        let total: usize = voices.iter().map(Voice::len).sum();

        let mut coords = Coords {
            freqs: Vec::with_capacity(total),
            times: Vec::with_capacity(total),
        };
        let mut channel_major: Vec<Vec<Complex64>> = vec![Vec::with_capacity(total); num_channels];

        for voice in &voices {
            coords
                .freqs
                .extend(std::iter::repeat(voice.band.centre as f64).take(voice.len()));
            coords.times.extend_from_slice(&voice.times);
            for (channel, samples) in channel_major.iter_mut().zip(voice.samples.iter()) {
                channel.extend_from_slice(samples);
            }
        }

        let values = match layout {
            SampleLayout::ChannelMajor => channel_major,
            SampleLayout::SampleMajor => (0..total)
                .map(|i| channel_major.iter().map(|channel| channel[i]).collect())
                .collect(),
        };

        Self {
            coords,
            values,
            layout,
            signal_len,
            voices,
            num_channels,
        }
    }

    /// Total number of samples per channel
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Per-band voices in band order
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Band centres in band order
    pub fn centres(&self) -> Vec<i64> {
        self.voices.iter().map(|voice| voice.band.centre).collect()
    }

    /// All samples of one channel, in band order
    pub fn channel(&self, channel: usize) -> Result<Vec<Complex64>> {
        self.check_channel(channel)?;
        Ok(match self.layout {
            SampleLayout::ChannelMajor => self.values[channel].clone(),
            SampleLayout::SampleMajor => self.values.iter().map(|row| row[channel]).collect(),
        })
    }

    /// Reshape a fully sampled result into one row per band
    ///
    /// Only valid when every band carries one sample per datapoint, which is
    /// the case for full sampling: no interpolation is needed.
    pub fn to_regular_grid(&self, channel: usize) -> Result<Vec<Vec<Complex64>>> {
        self.check_channel(channel)?;
        self.voices
            .iter()
            .map(|voice| {
                if voice.len() != self.signal_len {
                    return Err(GftError::shape_mismatch(format!(
                        "band centred at {} has {} samples, a regular grid needs {}",
                        voice.band.centre,
                        voice.len(),
                        self.signal_len
                    )));
                }
                Ok(voice.samples[channel].clone())
            })
            .collect()
    }

    /// Interpolate one channel onto a uniform time-frequency grid
    pub fn interpolate(
        &self,
        channel: usize,
        config: &InterpolationConfig,
    ) -> Result<InterpolatedGrid> {
        let values = self.channel(channel)?;
        interpolate(
            &self.coords,
            &values,
            config.output_shape(),
            config.data_len,
            config.time_kind,
            config.freq_kind,
        )
    }

    fn check_channel(&self, channel: usize) -> Result<()> {
        if channel >= self.num_channels {
            return Err(GftError::invalid_input(format!(
                "channel {} out of range, result has {} channel(s)",
                channel, self.num_channels
            )));
        }
        Ok(())
    }
}
