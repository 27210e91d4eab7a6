//! Design parameters as an immutable, validated value
//!
//! Every `with_*` method returns a new value and validates the whole set, so a
//! rejected update never leaves a half-applied parameter set behind.

use crate::error::{Result, TunerError};
use crate::filters::{FilterType, WindowType};
use serde::{Deserialize, Serialize};

/// Largest accepted tap count exponent (2^20 taps)
pub const MAX_TAP_COUNT_EXPONENT: u32 = 20;

/// Full parameter set for one filter design
///
/// Field names in serialized form follow the tuner's short parameter names
/// (`mode`, `window`, `n`, `fs`, `fp`, `fc`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignParameters {
    #[serde(rename = "mode")]
    filter_type: FilterType,

    #[serde(rename = "window")]
    window_type: WindowType,

    /// Tap count is 2^n
    #[serde(rename = "n")]
    tap_count_exponent: u32,

    #[serde(rename = "fs")]
    sample_rate_hz: f64,

    /// Cutoff for lowpass/highpass, half-bandwidth for bandpass
    #[serde(rename = "fp")]
    passband_freq_hz: f64,

    /// Bandpass centre frequency
    #[serde(rename = "fc")]
    center_freq_hz: f64,
}

impl Default for DesignParameters {
    fn default() -> Self {
        Self {
            filter_type: FilterType::Lowpass,
            window_type: WindowType::Blackman,
            tap_count_exponent: 7,
            sample_rate_hz: 44_100.0,
            passband_freq_hz: 4_000.0,
            center_freq_hz: 10_000.0,
        }
    }
}

impl DesignParameters {
    /// Build a complete parameter set in one step
    pub fn new(
        filter_type: FilterType,
        window_type: WindowType,
        tap_count_exponent: u32,
        sample_rate_hz: f64,
        passband_freq_hz: f64,
        center_freq_hz: f64,
    ) -> Result<Self> {
        let parameters = Self {
            filter_type,
            window_type,
            tap_count_exponent,
            sample_rate_hz,
            passband_freq_hz,
            center_freq_hz,
        };
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    pub fn tap_count_exponent(&self) -> u32 {
        self.tap_count_exponent
    }

    /// Number of taps, 2^n
    pub fn tap_count(&self) -> usize {
        1usize << self.tap_count_exponent
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn passband_freq_hz(&self) -> f64 {
        self.passband_freq_hz
    }

    pub fn center_freq_hz(&self) -> f64 {
        self.center_freq_hz
    }

    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate_hz / 2.0
    }

    /// Switching to bandpass brings the centre frequency under validation
    pub fn with_filter_type(&self, filter_type: FilterType) -> Result<Self> {
        self.checked(Self {
            filter_type,
            ..self.clone()
        })
    }

    pub fn with_window_type(&self, window_type: WindowType) -> Self {
        Self {
            window_type,
            ..self.clone()
        }
    }

    pub fn with_tap_count_exponent(&self, tap_count_exponent: u32) -> Result<Self> {
        self.checked(Self {
            tap_count_exponent,
            ..self.clone()
        })
    }

    pub fn with_sample_rate(&self, sample_rate_hz: f64) -> Result<Self> {
        self.checked(Self {
            sample_rate_hz,
            ..self.clone()
        })
    }

    pub fn with_passband_freq(&self, passband_freq_hz: f64) -> Result<Self> {
        self.checked(Self {
            passband_freq_hz,
            ..self.clone()
        })
    }

    pub fn with_center_freq(&self, center_freq_hz: f64) -> Result<Self> {
        self.checked(Self {
            center_freq_hz,
            ..self.clone()
        })
    }

    /// Apply one textual update by short parameter name
    ///
    /// Names: `mode`, `window`, `n`, `fs`, `fp`, `fc`.
    pub fn with_parameter(&self, name: &str, value: &str) -> Result<Self> {
        self.with_parameters(&[(name, value)])
    }

    /// Apply several textual updates and validate only the final result
    ///
    /// Lets a caller move the sample rate and the frequencies that depend on it
    /// in one step. Any unknown name or unparsable value rejects the whole batch.
    pub fn with_parameters(&self, updates: &[(&str, &str)]) -> Result<Self> {
        let mut next = self.clone();
        for (name, value) in updates {
            next.assign(name, value)?;
        }
        self.checked(next)
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<()> {
        match name.trim() {
            "mode" => self.filter_type = value.parse()?,
            "window" => self.window_type = value.parse()?,
            "n" => self.tap_count_exponent = parse_exponent(value)?,
            "fs" => self.sample_rate_hz = parse_frequency(name, value)?,
            "fp" => self.passband_freq_hz = parse_frequency(name, value)?,
            "fc" => self.center_freq_hz = parse_frequency(name, value)?,
            other => {
                return Err(TunerError::InvalidConfiguration(format!(
                    "Unknown parameter: {}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Check the numeric domain of every field
    ///
    /// The sample rate must be positive, the passband frequency must lie
    /// strictly inside (0, fs/2) and the exponent must be in 1..=20. The centre
    /// frequency is only checked for bandpass designs, the one mode that uses it.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TAP_COUNT_EXPONENT).contains(&self.tap_count_exponent) {
            return Err(TunerError::InvalidInput(format!(
                "tap count exponent must be in 1..={}, got {}",
                MAX_TAP_COUNT_EXPONENT, self.tap_count_exponent
            )));
        }

        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(TunerError::InvalidInput(format!(
                "sample rate must be positive, got {}",
                self.sample_rate_hz
            )));
        }

        let nyquist = self.nyquist_hz();
        check_below_nyquist("passband frequency", self.passband_freq_hz, nyquist)?;
        if self.filter_type == FilterType::Bandpass {
            check_below_nyquist("center frequency", self.center_freq_hz, nyquist)?;
        }

        Ok(())
    }

    fn checked(&self, candidate: Self) -> Result<Self> {
        candidate.validate()?;
        Ok(candidate)
    }
}

fn check_below_nyquist(what: &str, freq: f64, nyquist: f64) -> Result<()> {
    if freq.is_finite() && freq > 0.0 && freq < nyquist {
        Ok(())
    } else {
        Err(TunerError::InvalidInput(format!(
            "{} must be in (0, {}) Hz, got {}",
            what, nyquist, freq
        )))
    }
}

/// Parse a tap count exponent, accepting integral reals such as "7.0"
pub fn parse_exponent(value: &str) -> Result<u32> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u32>() {
        return Ok(n);
    }

    match value.parse::<f64>() {
        Ok(x) if x.is_finite() && x.fract() == 0.0 && x >= 0.0 && x <= u32::MAX as f64 => {
            Ok(x as u32)
        }
        _ => Err(TunerError::InvalidInput(format!(
            "tap count exponent must be a non-negative integer, got {:?}",
            value
        ))),
    }
}

/// Parse a frequency or sample rate in Hz
pub fn parse_frequency(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| TunerError::InvalidInput(format!("{} must be a number, got {:?}", name, value)))
}
