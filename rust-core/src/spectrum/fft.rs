//! FFT engine using realfft for real-valued coefficient series
//!
//! Produces the full 0..fs spectrum. The upper half is rebuilt from the real
//! transform by conjugate symmetry, X[N-k] = conj(X[k]).

use crate::error::{Result, TunerError};
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (non-negative frequencies)
    output_buffer: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples), must be non-zero
    pub fn new(fft_size: usize) -> Result<Self> {
        if fft_size == 0 {
            return Err(TunerError::InvalidInput("FFT size must be non-zero".into()));
        }

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        log::debug!("planned {}-point real FFT", fft_size);

        Ok(Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        })
    }

    /// Compute the full complex spectrum X[k] for k = 0..fft_size-1
    ///
    /// # Arguments
    /// * `signal` - Input signal, zero-padded on the right (truncated if longer)
    pub fn compute_spectrum(&mut self, signal: &[f64]) -> Result<Vec<Complex<f64>>> {
        let copy_len = signal.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.input_buffer[copy_len..].fill(0.0);

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| TunerError::Transform(e.to_string()))?;

        let half = self.output_buffer.len();
        let mut spectrum = Vec::with_capacity(self.fft_size);
        spectrum.extend_from_slice(&self.output_buffer);
        for k in half..self.fft_size {
            spectrum.push(self.output_buffer[self.fft_size - k].conj());
        }

        Ok(spectrum)
    }

    /// Compute |X[k]| over the full spectrum
    pub fn compute_magnitude(&mut self, signal: &[f64]) -> Result<Vec<f64>> {
        Ok(self
            .compute_spectrum(signal)?
            .iter()
            .map(|c| c.norm())
            .collect())
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}
