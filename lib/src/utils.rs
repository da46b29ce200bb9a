//! Utility functions for formatting transform results
//!
//! Provides summaries and CSV rendering used by client applications.

use crate::gft::GftOutput;
use crate::interpolation::InterpolatedGrid;
use std::fmt::Write;

/// Format a time-frequency resolution pair for display
pub fn format_resolution(samples: usize, signal_len: usize) -> String {
    if samples == 0 {
        return "no samples".to_string();
    }
    format!(
        "{} samples, {:.2} datapoints apart",
        samples,
        signal_len as f64 / samples as f64
    )
}

/// Get a band-by-band summary of a transform result
pub fn analysis_summary(output: &GftOutput) -> String {
    let mut summary = String::new();

    let _ = writeln!(
        summary,
        "GFT: {} channel(s), {} datapoints, {} bands, {} samples per channel",
        output.num_channels(),
        output.signal_len,
        output.voices().len(),
        output.len()
    );
    summary.push_str("Bands:\n");
    for voice in output.voices() {
        let _ = writeln!(
            summary,
            "  centre {:>6}  bins [{:>6}, {:>6})  {}",
            voice.band.centre,
            voice.band.start,
            voice.band.end,
            format_resolution(voice.len(), output.signal_len)
        );
    }

    summary
}

/// Render the coordinates and magnitudes of one channel as CSV
pub fn coords_csv(output: &GftOutput, channel: &[num_complex::Complex64]) -> String {
    let mut csv = String::from("frequency,time,real,imag,magnitude\n");
    for ((freq, time), value) in output
        .coords
        .freqs
        .iter()
        .zip(output.coords.times.iter())
        .zip(channel.iter())
    {
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            freq,
            time,
            value.re,
            value.im,
            value.norm()
        );
    }
    csv
}

/// Render grid magnitudes as CSV, one row per frequency
///
/// The header row holds the times, the first column the frequencies.
pub fn grid_csv(grid: &InterpolatedGrid, use_db: bool) -> String {
    let rows = if use_db {
        grid.to_db(1.0)
    } else {
        grid.magnitudes()
    };

    let mut csv = String::from("frequency");
    for time in &grid.times {
        let _ = write!(csv, ",{}", time);
    }
    csv.push('\n');

    for (freq, row) in grid.freqs.iter().zip(rows.iter()) {
        let _ = write!(csv, "{}", freq);
        for value in row {
            let _ = write!(csv, ",{}", value);
        }
        csv.push('\n');
    }
    csv
}
