//! Curve constants and sampling domain
//!
//! Defaults reproduce the illustrative chart. Every value can be overridden
//! with a `PUMP_*` environment variable (a `.env` file is loaded first).

use tracing::debug;

use crate::utils::ChartError;

/// Upper bound on samples in one sweep
pub const MAX_SAMPLES: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct CurveConfig {
    /// Time at which the rise hands over to the dump
    pub pivot: f64,
    pub rise_floor: f64,
    pub rise_height: f64,
    /// Denominator of the Gaussian exponent
    pub rise_spread: f64,
    /// Price at the pivot on the dump side
    pub dump_start: f64,
    pub dump_slope: f64,
    pub wave_amplitude: f64,
    pub wave_frequency: f64,
    pub jitter_amplitude: f64,
    pub domain_start: f64,
    pub domain_end: f64,
    pub step: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        CurveConfig {
            pivot: 5.0,
            rise_floor: 5.0,
            rise_height: 90.0,
            rise_spread: 2.0,
            dump_start: 100.0,
            dump_slope: 70.0,
            wave_amplitude: 2.0,
            wave_frequency: 3.0,
            jitter_amplitude: 2.0,
            domain_start: 0.0,
            domain_end: 9.5,
            step: 0.01,
        }
    }
}

impl CurveConfig {
    /// Defaults overridden by whatever `PUMP_*` variables are set
    pub fn from_env() -> Result<Self, ChartError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads through `lookup`, so callers can supply a map
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChartError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CurveConfig::default();

        let fields: [(&str, &mut f64); 12] = [
            ("PUMP_PIVOT", &mut config.pivot),
            ("PUMP_RISE_FLOOR", &mut config.rise_floor),
            ("PUMP_RISE_HEIGHT", &mut config.rise_height),
            ("PUMP_RISE_SPREAD", &mut config.rise_spread),
            ("PUMP_DUMP_START", &mut config.dump_start),
            ("PUMP_DUMP_SLOPE", &mut config.dump_slope),
            ("PUMP_WAVE_AMPLITUDE", &mut config.wave_amplitude),
            ("PUMP_WAVE_FREQUENCY", &mut config.wave_frequency),
            ("PUMP_JITTER_AMPLITUDE", &mut config.jitter_amplitude),
            ("PUMP_DOMAIN_START", &mut config.domain_start),
            ("PUMP_DOMAIN_END", &mut config.domain_end),
            ("PUMP_STEP", &mut config.step),
        ];

        for (key, slot) in fields {
            if let Some(raw) = lookup(key) {
                *slot = raw.trim().parse::<f64>().map_err(|e| {
                    ChartError::Config(format!("{} must be a number, got '{}': {}", key, raw, e))
                })?;
                debug!("{} overridden: {}", key, slot);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        let values = [
            self.pivot,
            self.rise_floor,
            self.rise_height,
            self.rise_spread,
            self.dump_start,
            self.dump_slope,
            self.wave_amplitude,
            self.wave_frequency,
            self.jitter_amplitude,
            self.domain_start,
            self.domain_end,
            self.step,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ChartError::Config("all curve parameters must be finite".to_string()));
        }
        if self.step <= 0.0 {
            return Err(ChartError::Config(format!("step must be positive, got {}", self.step)));
        }
        if self.domain_end <= self.domain_start {
            return Err(ChartError::Config(format!(
                "domain end ({}) must be greater than domain start ({})",
                self.domain_end, self.domain_start
            )));
        }
        let intervals = (self.domain_end - self.domain_start) / self.step;
        if intervals >= MAX_SAMPLES as f64 {
            return Err(ChartError::Config(format!(
                "step {} over [{}, {}] needs more than {} samples",
                self.step, self.domain_start, self.domain_end, MAX_SAMPLES
            )));
        }
        if self.rise_spread <= 0.0 {
            return Err(ChartError::Config(format!(
                "rise spread must be positive, got {}",
                self.rise_spread
            )));
        }
        if self.wave_amplitude < 0.0 || self.jitter_amplitude < 0.0 {
            return Err(ChartError::Config("noise amplitudes cannot be negative".to_string()));
        }
        Ok(())
    }

    /// Number of samples one sweep over the domain produces
    pub fn sample_count(&self) -> usize {
        let steps = ((self.domain_end - self.domain_start) / self.step + 1e-9).floor() as usize;
        let last = self.domain_start + steps as f64 * self.step;
        if self.domain_end - last > 1e-9 {
            steps.saturating_add(2)
        } else {
            steps.saturating_add(1)
        }
    }
}
