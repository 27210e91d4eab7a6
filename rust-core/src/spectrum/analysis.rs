//! Frequency-magnitude response of a coefficient series
//!
//! The series is zero-padded to `oversampling * N` points before the transform
//! so the plotted response is smoother than N bins would give.

use super::fft::FftEngine;
use crate::error::{Result, TunerError};
use serde::Serialize;

/// Default zero-padding factor
pub const DEFAULT_OVERSAMPLING: usize = 4;

/// Largest accepted zero-padding factor
pub const MAX_OVERSAMPLING: usize = 16;

/// Largest transform the analyzer will plan (2^24 points)
pub const MAX_FFT_SIZE: usize = 1 << 24;

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Transform length as a multiple of the tap count
    pub oversampling: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            oversampling: DEFAULT_OVERSAMPLING,
            sample_rate: 44_100.0,
        }
    }
}

/// Frequency axis in kHz and magnitude in dB, one entry per FFT bin
///
/// Covers the full 0..fs range including the mirror image above Nyquist.
/// Bins with zero magnitude hold -inf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumSeries {
    pub frequencies_khz: Vec<f64>,
    pub magnitude_db: Vec<f64>,
    #[serde(skip)]
    sample_rate: f64,
}

impl SpectrumSeries {
    pub fn len(&self) -> usize {
        self.frequencies_khz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies_khz.is_empty()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of leading bins at or below fs/2
    pub fn nyquist_len(&self) -> usize {
        let nyquist_khz = self.sample_rate / 2.0 / 1000.0;
        self.frequencies_khz
            .iter()
            .take_while(|&&f| f <= nyquist_khz)
            .count()
    }

    /// Bins in [0, fs/2], the range a plot normally shows
    pub fn up_to_nyquist(&self) -> (&[f64], &[f64]) {
        let n = self.nyquist_len();
        (&self.frequencies_khz[..n], &self.magnitude_db[..n])
    }

    /// Magnitude with NaN, -inf and other bins below `floor_db` raised to it
    pub fn clamped_magnitude_db(&self, floor_db: f64) -> Vec<f64> {
        self.magnitude_db
            .iter()
            .map(|&m| if m.is_nan() { floor_db } else { m.max(floor_db) })
            .collect()
    }
}

/// Evaluates coefficient series through a cached FFT plan
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft_engine: Option<FftEngine>,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        validate_config(&config)?;
        Ok(Self {
            config,
            fft_engine: None,
        })
    }

    /// Zero-pad, transform and convert to dB
    ///
    /// # Arguments
    /// * `coefficients` - Filter taps h[0..N-1], N > 0
    ///
    /// # Returns
    /// Spectrum with `oversampling * N` bins
    pub fn analyze(&mut self, coefficients: &[f64]) -> Result<SpectrumSeries> {
        if coefficients.is_empty() {
            return Err(TunerError::InvalidInput(
                "cannot analyze an empty coefficient series".into(),
            ));
        }

        let fft_size = self
            .config
            .oversampling
            .checked_mul(coefficients.len())
            .filter(|&size| size <= MAX_FFT_SIZE)
            .ok_or_else(|| {
                TunerError::InvalidInput(format!(
                    "{} taps at {}x oversampling exceeds the {}-point FFT limit",
                    coefficients.len(),
                    self.config.oversampling,
                    MAX_FFT_SIZE
                ))
            })?;
        let engine = self.engine_for(fft_size)?;
        let magnitude = engine.compute_magnitude(coefficients)?;

        let fs = self.config.sample_rate;
        let frequencies_khz = (0..fft_size)
            .map(|i| i as f64 / fft_size as f64 * fs / 1000.0)
            .collect();
        let magnitude_db = magnitude.iter().map(|&m| 20.0 * m.log10()).collect();

        Ok(SpectrumSeries {
            frequencies_khz,
            magnitude_db,
            sample_rate: fs,
        })
    }

    /// Update configuration
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<()> {
        validate_config(&config)?;
        self.config = config;
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn engine_for(&mut self, fft_size: usize) -> Result<&mut FftEngine> {
        let needs_new_fft = self
            .fft_engine
            .as_ref()
            .map_or(true, |e| e.fft_size() != fft_size);

        if needs_new_fft {
            self.fft_engine = Some(FftEngine::new(fft_size)?);
        }

        self.fft_engine
            .as_mut()
            .ok_or_else(|| TunerError::Transform("FFT engine missing".into()))
    }
}

fn validate_config(config: &AnalyzerConfig) -> Result<()> {
    if !(1..=MAX_OVERSAMPLING).contains(&config.oversampling) {
        return Err(TunerError::InvalidInput(format!(
            "oversampling factor must be in 1..={}, got {}",
            MAX_OVERSAMPLING, config.oversampling
        )));
    }
    if !(config.sample_rate.is_finite() && config.sample_rate > 0.0) {
        return Err(TunerError::InvalidInput(format!(
            "sample rate must be positive, got {}",
            config.sample_rate
        )));
    }
    Ok(())
}
