//! GFT command-line tool
//!
//! Reads a signal from a text file (or stdin), computes its general Fourier
//! family transform and prints a band summary, the raw coordinate list, or
//! the magnitudes interpolated onto a uniform grid.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};
use gft_lib::{
    utils, Axis, GftAnalyzer, GftConfig, InterpolationConfig, InterpolationKind, Sampling, Signal,
    Window,
};

/// What to print after the transform
#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputMode {
    Summary,
    Coords,
    Grid,
}

fn build_command() -> Command {
    Command::new("gft")
        .version(gft_lib::VERSION)
        .about("General Fourier family (S) transform of a signal")
        .arg(
            Arg::new("input")
                .help("Text file with one channel per line; reads stdin when omitted or '-'")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("sampling")
                .long("sampling")
                .short('s')
                .help("Frequency sampling scheme (full, dyadic)")
                .value_name("SCHEME")
                .default_value("dyadic"),
        )
        .arg(
            Arg::new("window")
                .long("window")
                .short('w')
                .help("Analysis window (gaussian)")
                .value_name("WINDOW")
                .default_value("gaussian"),
        )
        .arg(
            Arg::new("negative")
                .long("negative")
                .short('n')
                .help("Also analyse negative frequencies")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-taper")
                .long("no-taper")
                .help("Do not taper the signal edges with a Hann window")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("columns")
                .long("columns")
                .help("Each line is one time point and channels run across columns")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("What to print (summary, coords, grid)")
                .value_name("MODE")
                .default_value("summary"),
        )
        .arg(
            Arg::new("shape")
                .long("shape")
                .help("Grid shape as FREQSxTIMES (default: N/2+1 x N)")
                .value_name("FxT"),
        )
        .arg(
            Arg::new("kind-time")
                .long("kind-time")
                .help("Interpolation along time (nearest, linear)")
                .value_name("KIND")
                .default_value("nearest"),
        )
        .arg(
            Arg::new("kind-freq")
                .long("kind-freq")
                .help("Interpolation across frequency (nearest, linear)")
                .value_name("KIND")
                .default_value("nearest"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .help("Print grid magnitudes in decibels")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("channel")
                .long("channel")
                .short('c')
                .help("Channel to print for coords and grid output")
                .value_name("INDEX")
                .value_parser(clap::value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug)")
                .action(ArgAction::Count),
        )
}

fn parse_output_mode(value: &str) -> Result<OutputMode, String> {
    match value {
        "summary" => Ok(OutputMode::Summary),
        "coords" => Ok(OutputMode::Coords),
        "grid" => Ok(OutputMode::Grid),
        _ => Err(format!(
            "Invalid output mode: {} (expected summary, coords or grid)",
            value
        )),
    }
}

fn parse_shape(value: &str) -> Result<(usize, usize), String> {
    let (freqs, times) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Invalid grid shape: {} (expected FxT)", value))?;
    let freqs = freqs
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("Invalid frequency count {}: {}", freqs, e))?;
    let times = times
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("Invalid time count {}: {}", times, e))?;
    Ok((freqs, times))
}

/// Parse whitespace or comma separated samples, one row per non-empty line
fn parse_rows(text: &str) -> Result<Vec<Vec<f64>>, String> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|(line_idx, line)| {
            line.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<f64>().map_err(|e| {
                        format!("Line {}: invalid sample '{}': {}", line_idx + 1, token, e)
                    })
                })
                .collect()
        })
        .collect()
}

fn read_input(path: Option<&String>) -> Result<String, Box<dyn Error>> {
    let mut text = String::new();
    match path.map(String::as_str) {
        None | Some("-") => {
            io::stdin().read_to_string(&mut text)?;
        }
        Some(path) => {
            text = fs::read_to_string(path)?;
        }
    }
    Ok(text)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let sampling: Sampling = matches
        .get_one::<String>("sampling")
        .map_or(Ok(Sampling::Dyadic), |s| s.parse())?;
    let window: Window = matches
        .get_one::<String>("window")
        .map_or(Ok(Window::Gaussian), |s| s.parse())?;
    let time_kind: InterpolationKind = matches
        .get_one::<String>("kind-time")
        .map_or(Ok(InterpolationKind::Nearest), |s| s.parse())?;
    let freq_kind: InterpolationKind = matches
        .get_one::<String>("kind-freq")
        .map_or(Ok(InterpolationKind::Nearest), |s| s.parse())?;
    let mode = matches
        .get_one::<String>("output")
        .map_or(Ok(OutputMode::Summary), |s| parse_output_mode(s))?;
    let channel = matches.get_one::<usize>("channel").copied().unwrap_or(0);

    let rows = parse_rows(&read_input(matches.get_one::<String>("input"))?)?;
    if rows.is_empty() {
        return Err("No samples found in input".into());
    }
    log::info!("Read {} row(s) of samples", rows.len());

    let (signal, axis) = if matches.get_flag("columns") {
        (Signal::from_real_rows(&rows)?, Axis::First)
    } else if rows.len() == 1 {
        (Signal::from_real(&rows[0]), Axis::Last)
    } else {
        (Signal::from_real_rows(&rows)?, Axis::Last)
    };

    let config = GftConfig::new(sampling)
        .with_window(window)
        .with_axis(axis)
        .with_negative_frequencies(matches.get_flag("negative"))
        .with_taper(!matches.get_flag("no-taper"));

    let mut analyzer = GftAnalyzer::new(config);
    let output = analyzer.analyze(&signal)?;
    let data_len = output.signal_len;

    match mode {
        OutputMode::Summary => print!("{}", utils::analysis_summary(&output)),
        OutputMode::Coords => {
            let values = output.channel(channel)?;
            print!("{}", utils::coords_csv(&output, &values));
        }
        OutputMode::Grid => {
            let interp_config = match matches.get_one::<String>("shape") {
                Some(shape) => {
                    let (freqs, times) = parse_shape(shape)?;
                    InterpolationConfig::new(freqs, times, data_len)?
                }
                None => InterpolationConfig::for_signal(data_len)?,
            }
            .with_kinds(time_kind, freq_kind);

            let grid = output.interpolate(channel, &interp_config)?;
            print!("{}", utils::grid_csv(&grid, matches.get_flag("db")));
        }
    }

    Ok(())
}

fn main() {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows("1 2 3\n\n# comment\n4,5, 6\n").unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert!(parse_rows("1 two 3").is_err());
    }

    #[test]
    fn test_parse_shape() {
        assert_eq!(parse_shape("65x128").unwrap(), (65, 128));
        assert_eq!(parse_shape("3X4").unwrap(), (3, 4));
        assert!(parse_shape("65").is_err());
        assert!(parse_shape("ax4").is_err());
    }

    #[test]
    fn test_parse_output_mode() {
        assert_eq!(parse_output_mode("grid").unwrap(), OutputMode::Grid);
        assert!(parse_output_mode("plot").is_err());
    }

    #[test]
    fn test_command_defaults() {
        let matches = build_command().get_matches_from(["gft", "signal.txt", "-n"]);
        assert_eq!(matches.get_one::<String>("input").unwrap(), "signal.txt");
        assert_eq!(matches.get_one::<String>("sampling").unwrap(), "dyadic");
        assert!(matches.get_flag("negative"));
        assert!(!matches.get_flag("no-taper"));
        assert_eq!(*matches.get_one::<usize>("channel").unwrap(), 0);
    }
}
