use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use fir_tuner::{CoefficientSeries, DesignParameters, TunerState};

#[derive(Parser, Debug)]
#[command(name = "fir_tuner")]
#[command(about = "Design a windowed-sinc FIR filter and print its taps and response", long_about = None)]
struct Args {
    /// TOML file with design parameters (mode, window, n, fs, fp, fc)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Filter response: lowpass, highpass, bandpass
    #[arg(short = 'm', long)]
    mode: Option<String>,

    /// Window: blackman, hamming, rectangular
    #[arg(short = 'w', long)]
    window: Option<String>,

    /// Tap count exponent (2^n taps)
    #[arg(short = 'n', long = "taps-exponent")]
    taps_exponent: Option<String>,

    /// Sample rate in Hz
    #[arg(long)]
    fs: Option<String>,

    /// Cutoff frequency (half-bandwidth for bandpass) in Hz
    #[arg(long)]
    fp: Option<String>,

    /// Bandpass centre frequency in Hz
    #[arg(long)]
    fc: Option<String>,

    /// Spectrum zero-padding factor
    #[arg(long, default_value = "4")]
    oversampling: usize,

    /// Also print the magnitude response up to Nyquist (always on for json)
    #[arg(short = 's', long)]
    spectrum: bool,

    /// Raise spectrum bins below this level (dB), e.g. -120
    #[arg(long, allow_hyphen_values = true)]
    floor_db: Option<f64>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Serialize)]
struct SpectrumReport {
    frequencies_khz: Vec<f64>,
    magnitude_db: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    parameters: &'a DesignParameters,
    group_delay_samples: f64,
    coefficients: &'a CoefficientSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    spectrum: Option<SpectrumReport>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let parameters = build_parameters(&args)?;
    log::info!(
        "designing {} filter: {} taps, {} window, fs={} Hz",
        parameters.filter_type(),
        parameters.tap_count(),
        parameters.window_type(),
        parameters.sample_rate_hz()
    );

    let mut tuner = TunerState::new(parameters)?;
    if args.oversampling != tuner.oversampling() {
        tuner.set_oversampling(args.oversampling)?;
        tuner.recompute()?;
    }

    let spectrum = wants_spectrum(&args).then(|| spectrum_report(&tuner, args.floor_db));

    match args.format {
        OutputFormat::Text => print_text(&tuner, spectrum.as_ref()),
        OutputFormat::Csv => print_csv(&tuner, spectrum.as_ref()),
        OutputFormat::Json => {
            let report = Report {
                parameters: tuner.parameters(),
                group_delay_samples: tuner.coefficients().group_delay_samples(),
                coefficients: tuner.coefficients(),
                spectrum,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// JSON reports always carry the spectrum; text and csv only with `-s`
fn wants_spectrum(args: &Args) -> bool {
    args.spectrum || matches!(args.format, OutputFormat::Json)
}

/// Defaults, then the config file, then command-line flags
fn build_parameters(args: &Args) -> Result<DesignParameters> {
    let base = match &args.config {
        Some(path) => load_toml_config(path)?,
        None => DesignParameters::default(),
    };

    let overrides: Vec<(&str, &str)> = [
        ("mode", &args.mode),
        ("window", &args.window),
        ("n", &args.taps_exponent),
        ("fs", &args.fs),
        ("fp", &args.fp),
        ("fc", &args.fc),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    .collect();

    base.with_parameters(&overrides)
        .context("Invalid design parameters")
}

fn load_toml_config(path: &Path) -> Result<DesignParameters> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    let parameters: DesignParameters =
        toml::from_str(&content).context("Failed to parse config file")?;
    parameters.validate().context("Invalid parameters in config file")?;
    Ok(parameters)
}

fn spectrum_report(tuner: &TunerState, floor_db: Option<f64>) -> SpectrumReport {
    let spectrum = tuner.spectrum();
    let n = spectrum.nyquist_len();
    let magnitude = match floor_db {
        Some(floor) => spectrum.clamped_magnitude_db(floor),
        None => spectrum.magnitude_db.clone(),
    };

    SpectrumReport {
        frequencies_khz: spectrum.frequencies_khz[..n].to_vec(),
        magnitude_db: magnitude[..n].to_vec(),
    }
}

fn print_text(tuner: &TunerState, spectrum: Option<&SpectrumReport>) {
    print!("{}", tuner.coefficient_listing());

    if let Some(spectrum) = spectrum {
        println!();
        for (f, m) in spectrum.frequencies_khz.iter().zip(&spectrum.magnitude_db) {
            println!("{:>10.4} kHz  {:>9.3} dB", f, m);
        }
    }
}

fn print_csv(tuner: &TunerState, spectrum: Option<&SpectrumReport>) {
    println!("index,coefficient");
    for (k, h) in tuner.coefficients().as_slice().iter().enumerate() {
        println!("{},{:.10}", k, h);
    }

    if let Some(spectrum) = spectrum {
        println!();
        println!("freq_khz,magnitude_db");
        for (f, m) in spectrum.frequencies_khz.iter().zip(&spectrum.magnitude_db) {
            println!("{:.6},{:.6}", f, m);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir_tuner::FilterType;

    #[test]
    fn test_json_always_includes_spectrum() {
        let json = Args::parse_from(["fir_tuner", "--format", "json"]);
        assert!(wants_spectrum(&json));

        let text = Args::parse_from(["fir_tuner"]);
        assert!(!wants_spectrum(&text));

        let csv = Args::parse_from(["fir_tuner", "-f", "csv", "-s"]);
        assert!(wants_spectrum(&csv));
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("fir_tuner_test_{}.toml", std::process::id()));
        fs::write(&path, "mode = \"highpass\"\nn = 6\nfs = 16000\n").unwrap();

        let args = Args::parse_from([
            "fir_tuner",
            "--config",
            path.to_str().unwrap(),
            "--fp",
            "2000",
        ]);
        let parameters = build_parameters(&args);
        fs::remove_file(&path).unwrap();

        let parameters = parameters.unwrap();
        assert_eq!(parameters.filter_type(), FilterType::Highpass);
        assert_eq!(parameters.tap_count(), 64);
        assert_eq!(parameters.sample_rate_hz(), 16_000.0);
        assert_eq!(parameters.passband_freq_hz(), 2_000.0);
    }
}
