//! Window functions for tapering windowed-sinc designs

use crate::error::TunerError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(N-1)) + 0.08*cos(4πn/(N-1))
    /// Sidelobe attenuation: ~74 dB
    Blackman,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(N-1))
    /// Sidelobe attenuation: ~53 dB
    Hamming,

    /// Rectangular window (no tapering)
    Rectangular,
}

impl WindowType {
    pub const ALL: [WindowType; 3] = [
        WindowType::Blackman,
        WindowType::Hamming,
        WindowType::Rectangular,
    ];

    /// Lowercase tag used by configuration files and setters
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Blackman => "blackman",
            WindowType::Hamming => "hamming",
            WindowType::Rectangular => "rectangular",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = TunerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowType::ALL
            .into_iter()
            .find(|w| w.name() == s.trim())
            .ok_or_else(|| TunerError::InvalidConfiguration(format!("Unknown window: {}", s)))
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (N), at least 2 for the tapered windows
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..N-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    // A single tap has no span to taper over
    if length < 2 {
        return vec![1.0; length];
    }

    let m = length as f64;
    let mut window = Vec::with_capacity(length);

    match window_type {
        WindowType::Blackman => {
            for n in 0..length {
                let angle1 = 2.0 * PI * n as f64 / (m - 1.0);
                let angle2 = 4.0 * PI * n as f64 / (m - 1.0);
                // Endpoints land a rounding error below zero
                window.push((0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos()).max(0.0));
            }
        }

        WindowType::Hamming => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.54 - 0.46 * angle.cos());
            }
        }

        WindowType::Rectangular => {
            window.resize(length, 1.0);
        }
    }

    window
}

/// Taper coefficients in place with the given window
///
/// Rectangular is the multiplicative identity and leaves `coefficients` untouched.
pub fn apply_window(coefficients: &mut [f64], window_type: WindowType) {
    if window_type == WindowType::Rectangular {
        return;
    }

    let window = generate_window(window_type, coefficients.len());
    for (c, w) in coefficients.iter_mut().zip(window.iter()) {
        *c *= w;
    }
}
