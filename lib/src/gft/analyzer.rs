//! Forward transform implementation

use super::core::{GftConfig, GftOutput, SampleLayout, Voice};
use crate::error::GftError;
use crate::sampling::{Band, Sampling};
use crate::signal::{analytic_signal, detrend_constant, Axis, Shape, Signal};
use crate::window::{apply_edge_taper, fft_frequencies, Window};
use crate::Result;
use num_complex::Complex64;
use realfft::RealFftPlanner;
use rustfft::{Fft, FftPlanner};

/// Analyzer computing the general Fourier family transform of signals
pub struct GftAnalyzer {
    config: GftConfig,
    fft_planner: FftPlanner<f64>,
    real_planner: RealFftPlanner<f64>,
}

impl GftAnalyzer {
    /// Create a new analyzer
    pub fn new(config: GftConfig) -> Self {
        Self {
            config,
            fft_planner: FftPlanner::new(),
            real_planner: RealFftPlanner::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &GftConfig {
        &self.config
    }

    /// Transform `signal` along the configured axis
    pub fn analyze(&mut self, signal: &Signal) -> Result<GftOutput> {
        let axis = self.config.axis;
        let n = signal.axis_len(axis);
        if signal.is_empty() || n == 0 {
            return Err(GftError::invalid_input("signal is empty"));
        }

        let mut channels = signal.channels(axis);
        let num_channels = channels.len();

        log::info!(
            "Performing GFT: {} channel(s) of {} samples, {} sampling, {} window",
            num_channels,
            n,
            self.config.sampling,
            self.config.window
        );

        let means: Vec<Complex64> = channels
            .iter_mut()
            .map(|channel| detrend_constant(channel))
            .collect();

        if self.config.taper {
            for channel in channels.iter_mut() {
                apply_edge_taper(channel);
            }
        }

        if !self.config.keep_negative_frequencies && signal.is_real() {
            log::debug!("Replacing real input with its analytic signal");
            channels = channels
                .iter()
                .map(|channel| {
                    analytic_signal(channel, &mut self.real_planner, &mut self.fft_planner)
                })
                .collect::<Result<Vec<_>>>()?;
        }

        let bands = self
            .config
            .sampling
            .layout(n, self.config.keep_negative_frequencies)?;

        let fft = self.fft_planner.plan_fft_forward(n);
        let spectra: Vec<Vec<Complex64>> = channels
            .into_iter()
            .map(|mut channel| {
                fft.process(&mut channel);
                channel
            })
            .collect();

        let freqs = fft_frequencies(n);
        let mut voices = Vec::with_capacity(bands.len());
        for band in &bands {
            let voice = self.voice(band, &freqs, &spectra, &means)?;
            if voice.is_empty() {
                log::debug!(
                    "Band centred at {} covers no bins of a length {} signal, skipping",
                    band.centre,
                    n
                );
                continue;
            }
            voices.push(voice);
        }

        let layout = match (signal.shape(), axis) {
            (Shape::TwoD(..), Axis::First) => SampleLayout::SampleMajor,
            _ => SampleLayout::ChannelMajor,
        };
        let output = GftOutput::from_voices(voices, layout, n, num_channels);

        log::info!(
            "GFT complete: {} bands, {} samples per channel",
            output.voices().len(),
            output.len()
        );

        Ok(output)
    }

    /// Compute the voice of one band for every channel
    fn voice(
        &mut self,
        band: &Band,
        freqs: &[i64],
        spectra: &[Vec<Complex64>],
        means: &[Complex64],
    ) -> Result<Voice> {
        let n = freqs.len();
        let centre = band.centre;

        // Align the band centre with index 0, then select the pass-band
        let shifted = |i: usize| (i as i64 + centre).rem_euclid(n as i64) as usize;
        let indices: Vec<usize> = (0..n).filter(|&i| band.contains(freqs[shifted(i)])).collect();
        let len = indices.len();

        log::debug!(
            "Band centre {} [{}, {}): {} samples",
            centre,
            band.start,
            band.end,
            len
        );

        let samples = if len == 0 {
            vec![Vec::new(); spectra.len()]
        } else if centre == 0 {
            // The zero-frequency voice carries the DC level of each channel
            means.iter().map(|&mean| vec![mean; len]).collect()
        } else {
            let win = self.config.window.spectrum(n, centre as f64)?;
            let ifft = self.fft_planner.plan_fft_inverse(len);
            let scale = 1.0 / len as f64;

            spectra
                .iter()
                .map(|spectrum| {
                    let mut alpha: Vec<Complex64> = indices
                        .iter()
                        .map(|&i| spectrum[shifted(i)] * win[i])
                        .collect();
                    ifft.process(&mut alpha);
                    for value in alpha.iter_mut() {
                        *value *= scale;
                    }
                    alpha
                })
                .collect()
        };

        let step = n as f64 / len.max(1) as f64;
        let times = (0..len).map(|j| (j as f64 + 0.5) * step).collect();

        Ok(Voice {
            band: *band,
            times,
            samples,
        })
    }
}

/// Compute the general Fourier family transform of `signal`
///
/// Returns the coordinates and samples of every band. A fully sampled
/// result can be reshaped into a regular grid with
/// [`GftOutput::to_regular_grid`]; a dyadic one should be regridded with
/// [`crate::interpolation::interpolate`].
pub fn forward_transform(
    signal: &Signal,
    window: Window,
    axis: Axis,
    sampling: Sampling,
    keep_negative_frequencies: bool,
    taper: bool,
) -> Result<GftOutput> {
    let config = GftConfig {
        window,
        axis,
        sampling,
        keep_negative_frequencies,
        taper,
    };
    GftAnalyzer::new(config).analyze(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;
    use std::f64::consts::PI;

    fn random_signal(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.random::<f64>()).collect()
    }

    fn sine(n: usize, freq: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / n as f64).sin())
            .collect()
    }

    #[test]
    fn test_full_sampling_reshapes_to_square_grid() {
        let n = 32;
        let signal = Signal::from_real(&random_signal(n, 7));
        let output =
            forward_transform(&signal, Window::Gaussian, Axis::Last, Sampling::Full, true, true)
                .unwrap();

        assert_eq!(output.len(), n * n);
        let grid = output.to_regular_grid(0).unwrap();
        assert_eq!(grid.len(), n);
        assert!(grid.iter().all(|row| row.len() == n));

        // every (frequency, time) pair occurs exactly once
        let mut seen = HashMap::new();
        for (f, t) in output.coords.freqs.iter().zip(output.coords.times.iter()) {
            *seen.entry((*f as i64, (*t * 2.0) as i64)).or_insert(0) += 1;
        }
        assert_eq!(seen.len(), n * n);
        assert!(seen.values().all(|&count| count == 1));
    }

    #[test]
    fn test_dyadic_sample_count_matches_length() {
        for &n in &[64_usize, 256, 1024] {
            let signal = Signal::from_real(&random_signal(n, n as u64));
            let output = forward_transform(
                &signal,
                Window::Gaussian,
                Axis::Last,
                Sampling::Dyadic,
                true,
                false,
            )
            .unwrap();

            assert_eq!(output.len(), n);
            let log2 = (n as f64).log2() as usize;
            assert_eq!(output.voices().len(), 2 * log2);
        }
    }

    #[test]
    fn test_dyadic_positive_only_covers_half() {
        let n = 128;
        let signal = Signal::from_real(&random_signal(n, 3));
        let output =
            forward_transform(&signal, Window::Gaussian, Axis::Last, Sampling::Dyadic, false, true)
                .unwrap();
        assert_eq!(output.len(), n / 2);
        assert_eq!(output.centres(), vec![1, 2, 4, 7, 13, 25, 49]);

        // time resolution grows with frequency
        let lens: Vec<usize> = output.voices().iter().map(Voice::len).collect();
        assert_eq!(lens, vec![1, 1, 2, 4, 8, 16, 32]);
    }

    #[test]
    fn test_dc_band_equals_mean() {
        let n = 64;
        let samples: Vec<f64> = random_signal(n, 11).iter().map(|x| x + 3.5).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let signal = Signal::from_real(&samples);

        let output =
            forward_transform(&signal, Window::Gaussian, Axis::Last, Sampling::Full, false, true)
                .unwrap();
        let dc = &output.voices()[0];
        assert_eq!(dc.band.centre, 0);
        assert_eq!(dc.len(), n);
        for value in &dc.samples[0] {
            assert!((value.re - mean).abs() < 1e-12);
            assert!(value.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_signal() {
        let signal = Signal::from_real(&vec![1.0; 128]);
        let output =
            forward_transform(&signal, Window::Gaussian, Axis::Last, Sampling::Full, true, false)
                .unwrap();

        for voice in output.voices() {
            for value in &voice.samples[0] {
                if voice.band.centre == 0 {
                    assert!((value.re - 1.0).abs() < 1e-12);
                } else {
                    assert!(value.norm() < 1e-10, "band {} not empty", voice.band.centre);
                }
            }
        }
    }

    #[test]
    fn test_negative_frequencies_are_mirrored() {
        let n = 256;
        let signal = Signal::from_real(&random_signal(n, 5));
        for &sampling in Sampling::all() {
            let output =
                forward_transform(&signal, Window::Gaussian, Axis::Last, sampling, true, true)
                    .unwrap();
            let counts: HashMap<i64, usize> = output
                .voices()
                .iter()
                .map(|voice| (voice.band.centre, voice.len()))
                .collect();

            for (&centre, &count) in &counts {
                if centre == 0 {
                    continue;
                }
                // the most negative full-sampling bin is Nyquist and has no twin
                if sampling == Sampling::Full && centre == -(n as i64) / 2 {
                    continue;
                }
                assert_eq!(counts.get(&-centre), Some(&count), "centre {}", centre);
            }

            // bands are contiguous and ascending
            let centres = output.centres();
            assert!(centres.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_pure_tone_peaks_at_its_frequency() {
        let n = 128;
        let signal = Signal::from_real(&sine(n, 16.0));
        let output =
            forward_transform(&signal, Window::Gaussian, Axis::Last, Sampling::Full, false, false)
                .unwrap();
        let grid = output.to_regular_grid(0).unwrap();

        // analytic tone of unit amplitude
        for value in &grid[16] {
            assert!((value.norm() - 1.0).abs() < 1e-6);
        }
        assert!(grid[50].iter().all(|v| v.norm() < 1e-3));
    }

    #[test]
    fn test_time_coordinates_are_bin_centres() {
        let n = 64;
        let signal = Signal::from_real(&random_signal(n, 9));
        let output =
            forward_transform(&signal, Window::Gaussian, Axis::Last, Sampling::Dyadic, false, true)
                .unwrap();
        for voice in output.voices() {
            let step = n as f64 / voice.len() as f64;
            assert!((voice.times[0] - step / 2.0).abs() < 1e-12);
            assert!((voice.times[voice.len() - 1] - (n as f64 - step / 2.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_multichannel_axis_handling() {
        let n = 32;
        let a = random_signal(n, 1);
        let b = random_signal(n, 2);

        let rows = Signal::from_real_rows(&[a.clone(), b.clone()]).unwrap();
        let by_rows =
            forward_transform(&rows, Window::Gaussian, Axis::Last, Sampling::Dyadic, false, true)
                .unwrap();
        assert_eq!(by_rows.layout, SampleLayout::ChannelMajor);
        assert_eq!(by_rows.values.len(), 2);

        let columns: Vec<Vec<f64>> = (0..n).map(|i| vec![a[i], b[i]]).collect();
        let cols = Signal::from_real_rows(&columns).unwrap();
        let by_cols =
            forward_transform(&cols, Window::Gaussian, Axis::First, Sampling::Dyadic, false, true)
                .unwrap();
        assert_eq!(by_cols.layout, SampleLayout::SampleMajor);
        assert_eq!(by_cols.values.len(), by_cols.len());
        assert_eq!(by_cols.values[0].len(), 2);

        let single =
            forward_transform(&Signal::from_real(&b), Window::Gaussian, Axis::Last, Sampling::Dyadic, false, true)
                .unwrap();
        for (x, y) in by_cols.channel(1).unwrap().iter().zip(single.values[0].iter()) {
            assert!((x - y).norm() < 1e-12);
        }
        for (x, y) in by_rows.channel(1).unwrap().iter().zip(single.values[0].iter()) {
            assert!((x - y).norm() < 1e-12);
        }
    }

    #[test]
    fn test_complex_input_skips_analytic_signal() {
        let n = 64;
        let tone: Vec<Complex64> = (0..n)
            .map(|i| Complex64::from_polar(1.0, -2.0 * PI * 8.0 * i as f64 / n as f64))
            .collect();
        let output = forward_transform(
            &Signal::from_complex(tone),
            Window::Gaussian,
            Axis::Last,
            Sampling::Full,
            true,
            false,
        )
        .unwrap();
        let grid = output.to_regular_grid(0).unwrap();
        // centres run from -32, so -8 is row 24
        assert!(grid[24].iter().all(|v| (v.norm() - 1.0).abs() < 1e-6));
        assert!(grid[40].iter().all(|v| v.norm() < 1e-6));
    }

    #[test]
    fn test_empty_signal_rejected() {
        let result = forward_transform(
            &Signal::from_real(&[]),
            Window::Gaussian,
            Axis::Last,
            Sampling::Dyadic,
            false,
            true,
        );
        assert!(matches!(result, Err(GftError::InvalidInput { .. })));
    }

    #[test]
    fn test_analyzer_is_reusable() {
        let mut analyzer = GftAnalyzer::new(GftConfig::new(Sampling::Dyadic));
        let first = analyzer.analyze(&Signal::from_real(&random_signal(64, 1))).unwrap();
        let second = analyzer.analyze(&Signal::from_real(&random_signal(100, 2))).unwrap();
        assert_eq!(first.signal_len, 64);
        assert_eq!(second.signal_len, 100);
        assert_eq!(analyzer.config().sampling, Sampling::Dyadic);
    }
}
