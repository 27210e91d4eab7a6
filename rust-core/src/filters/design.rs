//! FIR filter design using the windowed-sinc method
//!
//! All three responses derive from one ideal lowpass kernel centred on tap N/2
//! (group delay N/2 samples). The raw kernels below are unwindowed; `synthesize`
//! applies the selected window.
//!
//! Cutoff and carrier frequencies are expected inside (0, fs/2). Values outside
//! that range are not rejected here and produce aliased designs.

use super::windows::{apply_window, WindowType};
use crate::error::{Result, TunerError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Below this magnitude sinc(x) is taken as its limit 1.0
const SINC_EPSILON: f64 = 1e-6;

/// Filter response enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Lowpass,
    Highpass,
    Bandpass,
}

impl FilterType {
    pub const ALL: [FilterType; 3] = [
        FilterType::Lowpass,
        FilterType::Highpass,
        FilterType::Bandpass,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterType::Lowpass => "lowpass",
            FilterType::Highpass => "highpass",
            FilterType::Bandpass => "bandpass",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterType {
    type Err = TunerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FilterType::ALL
            .into_iter()
            .find(|t| t.name() == s.trim())
            .ok_or_else(|| TunerError::InvalidConfiguration(format!("Unknown mode: {}", s)))
    }
}

/// sin(x)/x with the removable singularity at zero filled in
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x.abs() > SINC_EPSILON {
        x.sin() / x
    } else {
        1.0
    }
}

/// Index of the centre tap, floor(N/2)
#[inline]
pub fn center_index(num: usize) -> usize {
    num / 2
}

/// Ideal lowpass impulse response
///
/// h[k] = 2F * sinc(2πF(k - N/2)) with F = fp/fs
///
/// # Arguments
/// * `num` - Tap count N
/// * `fp` - Cutoff frequency in Hz
/// * `fs` - Sample rate in Hz
pub fn lpf(num: usize, fp: f64, fs: f64) -> Vec<f64> {
    let f = fp / fs;
    let center = center_index(num) as f64;

    (0..num)
        .map(|k| {
            let n = k as f64 - center;
            2.0 * f * sinc(2.0 * PI * f * n)
        })
        .collect()
}

/// Highpass by spectral inversion of the lowpass kernel
///
/// Every lowpass tap is negated and a unit impulse is added at the centre tap.
///
/// # Errors
/// `InternalInvariantViolation` when N is zero or odd: the lowpass kernel is then
/// not centred on a whole tap and there is no sample to carry the impulse.
pub fn hpf(num: usize, fp: f64, fs: f64) -> Result<Vec<f64>> {
    if num == 0 || num % 2 != 0 {
        return Err(TunerError::InternalInvariantViolation(format!(
            "no centre tap for highpass of length {}",
            num
        )));
    }

    let mut fir = lpf(num, fp, fs);
    for h in fir.iter_mut() {
        *h = -*h;
    }
    fir[center_index(num)] += 1.0;

    Ok(fir)
}

/// Bandpass by modulating a lowpass prototype up to the carrier
///
/// h[k] = lpf[k] * 2cos(2π fc k / fs)
///
/// # Arguments
/// * `num` - Tap count N
/// * `fp` - Half-bandwidth of the passband in Hz
/// * `fc` - Centre (carrier) frequency in Hz
/// * `fs` - Sample rate in Hz
pub fn bpf(num: usize, fp: f64, fc: f64, fs: f64) -> Vec<f64> {
    let mut fir = lpf(num, fp, fs);
    for (k, h) in fir.iter_mut().enumerate() {
        *h *= (2.0 * PI * fc * k as f64 / fs).cos() * 2.0;
    }
    fir
}

/// Design a windowed FIR filter
///
/// # Arguments
/// * `filter_type` - Response shape
/// * `window_type` - Taper applied after synthesis
/// * `num` - Tap count N
/// * `fp` - Cutoff (lowpass/highpass) or half-bandwidth (bandpass) in Hz
/// * `fc` - Centre frequency in Hz, used only for bandpass
/// * `fs` - Sample rate in Hz
///
/// # Returns
/// Vector of filter coefficients h[n] for n = 0..N-1
pub fn synthesize(
    filter_type: FilterType,
    window_type: WindowType,
    num: usize,
    fp: f64,
    fc: f64,
    fs: f64,
) -> Result<Vec<f64>> {
    let mut fir = match filter_type {
        FilterType::Lowpass => lpf(num, fp, fs),
        FilterType::Highpass => hpf(num, fp, fs)?,
        FilterType::Bandpass => bpf(num, fp, fc, fs),
    };

    apply_window(&mut fir, window_type);

    Ok(fir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::windows::generate_window;

    const FS: f64 = 44_100.0;

    #[test]
    fn test_sinc_limit() {
        assert_eq!(sinc(0.0), 1.0);
        assert_eq!(sinc(1e-7), 1.0);
        assert!((sinc(PI)).abs() < 1e-15);
        assert!((sinc(PI / 2.0) - 2.0 / PI).abs() < 1e-15);
    }

    #[test]
    fn test_lowpass_center_tap() {
        for num in [2, 8, 64, 128, 1024] {
            let h = lpf(num, 4000.0, FS);
            assert_eq!(h.len(), num);

            let expected = 2.0 * 4000.0 / FS;
            assert!((h[center_index(num)] - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn test_lowpass_symmetric_about_center() {
        let num = 128;
        let h = lpf(num, 4000.0, FS);
        let c = center_index(num);

        // Tap 0 has no mirror partner for even lengths
        for d in 1..c {
            assert!((h[c - d] - h[c + d]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_lowpass_dc_gain_near_unity() {
        let mut h = lpf(1024, 4000.0, FS);
        apply_window(&mut h, WindowType::Blackman);

        let sum: f64 = h.iter().sum();
        assert!((sum - 1.0).abs() < 0.01, "DC gain too far from 1: {}", sum);
    }

    #[test]
    fn test_highpass_is_spectral_inversion() {
        let num = 128;
        let lp = lpf(num, 4000.0, FS);
        let hp = hpf(num, 4000.0, FS).unwrap();
        let c = center_index(num);

        assert!((hp[c] - (1.0 - lp[c])).abs() < 1e-15);
        for k in (0..num).filter(|&k| k != c) {
            assert_eq!(hp[k], -lp[k]);
        }
    }

    #[test]
    fn test_highpass_rejects_lengths_without_center_tap() {
        assert!(matches!(
            hpf(0, 4000.0, FS),
            Err(TunerError::InternalInvariantViolation(_))
        ));
        assert!(matches!(
            hpf(127, 4000.0, FS),
            Err(TunerError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn test_bandpass_modulates_prototype() {
        let num = 64;
        let (fp, fc) = (1000.0, 10_000.0);
        let lp = lpf(num, fp, FS);
        let bp = bpf(num, fp, fc, FS);

        for k in 0..num {
            let expected = lp[k] * 2.0 * (2.0 * PI * fc * k as f64 / FS).cos();
            assert!((bp[k] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bandpass_dc_gain_small() {
        let h = synthesize(
            FilterType::Bandpass,
            WindowType::Blackman,
            512,
            1000.0,
            10_000.0,
            FS,
        )
        .unwrap();

        let sum: f64 = h.iter().sum();
        assert!(sum.abs() < 0.05, "DC gain too large: {}", sum);
    }

    #[test]
    fn test_synthesize_applies_window() {
        let num = 128;
        let raw = lpf(num, 4000.0, FS);
        let window = generate_window(WindowType::Hamming, num);
        let h = synthesize(
            FilterType::Lowpass,
            WindowType::Hamming,
            num,
            4000.0,
            10_000.0,
            FS,
        )
        .unwrap();

        for k in 0..num {
            assert_eq!(h[k], raw[k] * window[k]);
        }
    }

    #[test]
    fn test_parse_mode_names() {
        assert_eq!("lowpass".parse::<FilterType>(), Ok(FilterType::Lowpass));
        assert_eq!("highpass".parse::<FilterType>(), Ok(FilterType::Highpass));
        assert_eq!("bandpass".parse::<FilterType>(), Ok(FilterType::Bandpass));

        assert!(matches!(
            "notch".parse::<FilterType>(),
            Err(TunerError::InvalidConfiguration(_))
        ));
    }
}
