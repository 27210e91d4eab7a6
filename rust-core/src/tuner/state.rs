//! Tuner state: current parameters plus the coefficient and spectrum series
//! derived from them
//!
//! One `TunerState` belongs to one caller at a time. Share it across threads
//! behind a `Mutex`; there is no internal locking.

use super::params::DesignParameters;
use crate::error::Result;
use crate::filters::{synthesize, CoefficientSeries, FilterType, WindowType};
use crate::spectrum::{AnalyzerConfig, SpectrumAnalyzer, SpectrumSeries, DEFAULT_OVERSAMPLING};
use serde::Serialize;

/// Coefficients and their frequency response, always produced together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Design {
    pub coefficients: CoefficientSeries,
    pub spectrum: SpectrumSeries,
}

/// Synthesize the windowed coefficient series for a parameter set
pub fn synthesize_coefficients(parameters: &DesignParameters) -> Result<CoefficientSeries> {
    let taps = synthesize(
        parameters.filter_type(),
        parameters.window_type(),
        parameters.tap_count(),
        parameters.passband_freq_hz(),
        parameters.center_freq_hz(),
        parameters.sample_rate_hz(),
    )?;
    Ok(CoefficientSeries::new(taps))
}

/// Design a filter and evaluate its response with the default 4x zero-padding
pub fn design(parameters: &DesignParameters) -> Result<Design> {
    let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig {
        oversampling: DEFAULT_OVERSAMPLING,
        sample_rate: parameters.sample_rate_hz(),
    })?;
    design_with(parameters, &mut analyzer)
}

fn design_with(parameters: &DesignParameters, analyzer: &mut SpectrumAnalyzer) -> Result<Design> {
    parameters.validate()?;

    let coefficients = synthesize_coefficients(parameters)?;

    if analyzer.config().sample_rate != parameters.sample_rate_hz() {
        analyzer.update_config(AnalyzerConfig {
            sample_rate: parameters.sample_rate_hz(),
            ..analyzer.config().clone()
        })?;
    }
    let spectrum = analyzer.analyze(coefficients.as_slice())?;

    Ok(Design {
        coefficients,
        spectrum,
    })
}

/// Holds the current design parameters and the last computed design
pub struct TunerState {
    parameters: DesignParameters,
    analyzer: SpectrumAnalyzer,
    design: Design,
    stale: bool,
}

impl TunerState {
    /// Validate `parameters` and compute the initial design
    pub fn new(parameters: DesignParameters) -> Result<Self> {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig {
            oversampling: DEFAULT_OVERSAMPLING,
            sample_rate: parameters.sample_rate_hz(),
        })?;
        let design = design_with(&parameters, &mut analyzer)?;

        Ok(Self {
            parameters,
            analyzer,
            design,
            stale: false,
        })
    }

    pub fn parameters(&self) -> &DesignParameters {
        &self.parameters
    }

    /// Last computed design
    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn coefficients(&self) -> &CoefficientSeries {
        &self.design.coefficients
    }

    pub fn spectrum(&self) -> &SpectrumSeries {
        &self.design.spectrum
    }

    /// True when parameters changed since the last `recompute`
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) -> Result<()> {
        let next = self.parameters.with_filter_type(filter_type)?;
        self.accept(next);
        Ok(())
    }

    pub fn set_window_type(&mut self, window_type: WindowType) {
        let next = self.parameters.with_window_type(window_type);
        self.accept(next);
    }

    pub fn set_tap_count_exponent(&mut self, tap_count_exponent: u32) -> Result<()> {
        let next = self.parameters.with_tap_count_exponent(tap_count_exponent)?;
        self.accept(next);
        Ok(())
    }

    pub fn set_sample_rate(&mut self, sample_rate_hz: f64) -> Result<()> {
        let next = self.parameters.with_sample_rate(sample_rate_hz)?;
        self.accept(next);
        Ok(())
    }

    pub fn set_passband_freq(&mut self, passband_freq_hz: f64) -> Result<()> {
        let next = self.parameters.with_passband_freq(passband_freq_hz)?;
        self.accept(next);
        Ok(())
    }

    pub fn set_center_freq(&mut self, center_freq_hz: f64) -> Result<()> {
        let next = self.parameters.with_center_freq(center_freq_hz)?;
        self.accept(next);
        Ok(())
    }

    /// Textual setter by short name (`mode`, `window`, `n`, `fs`, `fp`, `fc`)
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        let next = self.parameters.with_parameter(name, value)?;
        self.accept(next);
        Ok(())
    }

    /// Textual batch update, validated once after all fields are applied
    pub fn set_parameters(&mut self, updates: &[(&str, &str)]) -> Result<()> {
        let next = self.parameters.with_parameters(updates)?;
        self.accept(next);
        Ok(())
    }

    /// Swap in a whole parameter set at once
    ///
    /// Use this when several fields must change together, e.g. lowering the
    /// sample rate along with the frequencies that would otherwise exceed Nyquist.
    pub fn replace_parameters(&mut self, parameters: DesignParameters) -> Result<()> {
        parameters.validate()?;
        self.accept(parameters);
        Ok(())
    }

    pub fn oversampling(&self) -> usize {
        self.analyzer.config().oversampling
    }

    /// Change the spectrum zero-padding factor
    pub fn set_oversampling(&mut self, oversampling: usize) -> Result<()> {
        if oversampling == self.oversampling() {
            return Ok(());
        }
        self.analyzer.update_config(AnalyzerConfig {
            oversampling,
            ..self.analyzer.config().clone()
        })?;
        self.stale = true;
        Ok(())
    }

    /// Re-derive coefficients and spectrum from the current parameters
    ///
    /// Both series are replaced together; on error the previous design stays.
    pub fn recompute(&mut self) -> Result<()> {
        let design = design_with(&self.parameters, &mut self.analyzer)?;

        log::debug!(
            "recomputed {} filter: {} taps, {} window, {} spectrum bins",
            self.parameters.filter_type(),
            design.coefficients.len(),
            self.parameters.window_type(),
            design.spectrum.len()
        );

        self.design = design;
        self.stale = false;
        Ok(())
    }

    /// Diagnostic listing of the current coefficients, one tap per line
    pub fn coefficient_listing(&self) -> String {
        self.design.coefficients.to_string()
    }

    fn accept(&mut self, next: DesignParameters) {
        if next != self.parameters {
            log::trace!("parameters updated: {:?}", next);
            self.parameters = next;
            self.stale = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TunerError;
    use crate::filters::{generate_window, lpf};

    fn default_state() -> TunerState {
        TunerState::new(DesignParameters::default()).unwrap()
    }

    #[test]
    fn test_initial_design() {
        let state = default_state();

        assert_eq!(state.coefficients().len(), 128);
        assert_eq!(state.spectrum().len(), 512);
        assert!(!state.is_stale());
    }

    #[test]
    fn test_default_lowpass_center_tap() {
        let state = default_state();
        let window = generate_window(WindowType::Blackman, 128);
        let raw = 2.0 * 4000.0 / 44_100.0;

        assert!((state.coefficients()[64] - raw * window[64]).abs() < 1e-15);
    }

    #[test]
    fn test_setters_mark_stale_until_recompute() {
        let mut state = default_state();
        let before = state.design().clone();

        state.set_filter_type(FilterType::Highpass).unwrap();
        assert!(state.is_stale());
        assert_eq!(state.design(), &before);

        state.recompute().unwrap();
        assert!(!state.is_stale());
        assert_ne!(state.design(), &before);
    }

    #[test]
    fn test_unchanged_value_does_not_mark_stale() {
        let mut state = default_state();
        state.set_window_type(WindowType::Blackman);
        state.set_passband_freq(4_000.0).unwrap();
        assert!(!state.is_stale());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut state = default_state();
        state.set_parameter("mode", "bandpass").unwrap();
        state.recompute().unwrap();
        let first = state.design().clone();

        state.recompute().unwrap();
        assert_eq!(state.design(), &first);
    }

    #[test]
    fn test_rejected_setter_leaves_state_unchanged() {
        let mut state = default_state();
        let before = state.parameters().clone();

        assert!(matches!(
            state.set_parameter("mode", "notch"),
            Err(TunerError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            state.set_tap_count_exponent(0),
            Err(TunerError::InvalidInput(_))
        ));
        assert!(matches!(
            state.set_sample_rate(6_000.0),
            Err(TunerError::InvalidInput(_))
        ));

        assert_eq!(state.parameters(), &before);
        assert!(!state.is_stale());
    }

    #[test]
    fn test_low_sample_rate_lowpass_ignores_center_freq() {
        let mut state = default_state();
        state.set_sample_rate(16_000.0).unwrap();
        state.recompute().unwrap();
        assert_eq!(state.spectrum().sample_rate(), 16_000.0);

        // Default fc=10 kHz is above the 8 kHz Nyquist, so bandpass is refused
        let before = state.parameters().clone();
        assert!(matches!(
            state.set_filter_type(FilterType::Bandpass),
            Err(TunerError::InvalidInput(_))
        ));
        assert_eq!(state.parameters(), &before);
        assert!(!state.is_stale());

        state
            .set_parameters(&[("mode", "bandpass"), ("fc", "5000")])
            .unwrap();
        assert_eq!(state.parameters().filter_type(), FilterType::Bandpass);
    }

    #[test]
    fn test_replace_parameters_changes_fields_together() {
        let mut state = default_state();
        let low_rate = DesignParameters::new(
            FilterType::Lowpass,
            WindowType::Hamming,
            5,
            8_000.0,
            1_000.0,
            2_000.0,
        )
        .unwrap();

        state.replace_parameters(low_rate).unwrap();
        state.recompute().unwrap();

        assert_eq!(state.coefficients().len(), 32);
        assert_eq!(state.spectrum().sample_rate(), 8_000.0);
        assert!((state.spectrum().frequencies_khz[1] - 8.0 / 128.0).abs() < 1e-12);
    }

    #[test]
    fn test_oversampling_changes_spectrum_length() {
        let mut state = default_state();
        state.set_oversampling(8).unwrap();
        assert!(state.is_stale());

        state.recompute().unwrap();
        assert_eq!(state.spectrum().len(), 1024);

        assert!(matches!(state.set_oversampling(0), Err(TunerError::InvalidInput(_))));
        assert!(matches!(
            state.set_oversampling(usize::MAX / 64),
            Err(TunerError::InvalidInput(_))
        ));
        assert_eq!(state.oversampling(), 8);
        assert!(!state.is_stale());

        state.recompute().unwrap();
        assert_eq!(state.spectrum().len(), 1024);
    }

    #[test]
    fn test_design_matches_state() {
        let params = DesignParameters::default()
            .with_filter_type(FilterType::Highpass)
            .unwrap()
            .with_window_type(WindowType::Rectangular);
        let d = design(&params).unwrap();

        let lp = lpf(128, 4000.0, 44_100.0);
        assert!((d.coefficients[64] - (1.0 - lp[64])).abs() < 1e-15);

        let mut state = default_state();
        state.replace_parameters(params).unwrap();
        state.recompute().unwrap();
        assert_eq!(state.design(), &d);
    }

    #[test]
    fn test_listing_has_one_line_per_tap() {
        let state = default_state();
        let listing = state.coefficient_listing();
        assert_eq!(listing.lines().count(), 128);
        assert!(listing.starts_with("[   0]: "));
    }
}
