use chrono::Utc;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::CurveConfig;
use crate::models::{Phase, PricePoint, PriceSeries};

/// Source of the per-evaluation random part of the noise, in `[-1, 1]`
pub trait Jitter {
    fn draw(&mut self) -> f64;
}

/// Uniform draws from any `rand` generator
pub struct UniformJitter<R: Rng> {
    rng: R,
}

impl<R: Rng> UniformJitter<R> {
    pub fn new(rng: R) -> Self {
        UniformJitter { rng }
    }
}

impl UniformJitter<StdRng> {
    /// Reproducible jitter for a given seed
    pub fn seeded(seed: u64) -> Self {
        UniformJitter::new(StdRng::seed_from_u64(seed))
    }
}

impl UniformJitter<ThreadRng> {
    /// Jitter from the thread-local generator
    pub fn thread_local() -> Self {
        UniformJitter::new(rand::thread_rng())
    }
}

impl<R: Rng> Jitter for UniformJitter<R> {
    fn draw(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

/// Zero jitter, for deterministic evaluation
pub struct NoJitter;

impl Jitter for NoJitter {
    fn draw(&mut self) -> f64 {
        0.0
    }
}

/// The pump-and-dump price curve
///
/// A Gaussian rise up to the pivot, a linear crash after it, plus a wave and
/// uniform jitter on top. Prices are clamped at zero.
#[derive(Debug, Clone)]
pub struct PumpDumpCurve {
    config: CurveConfig,
}

impl PumpDumpCurve {
    pub fn new(config: CurveConfig) -> Self {
        PumpDumpCurve { config }
    }

    pub fn phase(&self, t: f64) -> Phase {
        if t < self.config.pivot {
            Phase::Pump
        } else {
            Phase::Dump
        }
    }

    /// Gaussian bump centred on the pivot
    pub fn rise(&self, t: f64) -> f64 {
        let c = &self.config;
        let dt = t - c.pivot;
        c.rise_floor + c.rise_height * (-(dt * dt) / c.rise_spread).exp()
    }

    /// Linear decline from the pivot, floored at zero
    pub fn fall(&self, t: f64) -> f64 {
        let c = &self.config;
        (c.dump_start - c.dump_slope * (t - c.pivot)).max(0.0)
    }

    pub fn base(&self, t: f64) -> f64 {
        match self.phase(t) {
            Phase::Pump => self.rise(t),
            Phase::Dump => self.fall(t),
        }
    }

    /// Deterministic oscillation part of the noise
    pub fn wave(&self, t: f64) -> f64 {
        self.config.wave_amplitude * (self.config.wave_frequency * t).sin()
    }

    pub fn noise<J: Jitter + ?Sized>(&self, t: f64, jitter: &mut J) -> f64 {
        self.wave(t) + self.config.jitter_amplitude * jitter.draw()
    }

    /// Simulated price at `t`; never negative
    pub fn price<J: Jitter + ?Sized>(&self, t: f64, jitter: &mut J) -> f64 {
        (self.base(t) + self.noise(t, jitter)).max(0.0)
    }

    /// Time values of one ascending sweep, both domain ends included
    pub fn sample_times(&self) -> Vec<f64> {
        let c = &self.config;
        let count = c.sample_count();
        let mut times: Vec<f64> = (0..count)
            .map(|i| (c.domain_start + i as f64 * c.step).min(c.domain_end))
            .collect();
        if let Some(last) = times.last_mut() {
            *last = c.domain_end;
        }
        times
    }

    /// Evaluate the curve at every sample time, in ascending order
    pub fn sample<J: Jitter + ?Sized>(&self, jitter: &mut J) -> Vec<PricePoint> {
        self.sample_times()
            .into_iter()
            .map(|t| PricePoint {
                t,
                price: self.price(t, jitter),
            })
            .collect()
    }
}

/// Sample a full series; a seed makes the jitter reproducible
pub fn generate_series(config: &CurveConfig, seed: Option<u64>) -> PriceSeries {
    let curve = PumpDumpCurve::new(config.clone());
    let points = match seed {
        Some(seed) => {
            debug!("Using seeded jitter: {}", seed);
            curve.sample(&mut UniformJitter::seeded(seed))
        }
        None => curve.sample(&mut UniformJitter::thread_local()),
    };

    info!(
        "📈 Sampled {} points over [{}, {}] (step {})",
        points.len(),
        config.domain_start,
        config.domain_end,
        config.step
    );

    PriceSeries {
        generated_at: Utc::now(),
        seed,
        pivot: config.pivot,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the same draw
    struct FixedJitter(f64);

    impl Jitter for FixedJitter {
        fn draw(&mut self) -> f64 {
            self.0
        }
    }

    fn curve() -> PumpDumpCurve {
        PumpDumpCurve::new(CurveConfig::default())
    }

    fn quiet_curve() -> PumpDumpCurve {
        PumpDumpCurve::new(CurveConfig {
            wave_amplitude: 0.0,
            jitter_amplitude: 0.0,
            ..CurveConfig::default()
        })
    }

    #[test]
    fn test_price_never_negative() {
        let c = curve();
        let mut low = FixedJitter(-1.0);
        let mut rng = UniformJitter::seeded(7);
        let mut t = -50.0;
        while t <= 50.0 {
            assert!(c.price(t, &mut low) >= 0.0, "negative price at t={}", t);
            assert!(c.price(t, &mut rng) >= 0.0, "negative price at t={}", t);
            t += 0.037;
        }
    }

    #[test]
    fn test_deterministic_value_at_pivot() {
        let c = curve();
        assert_eq!(c.rise(5.0), 95.0);
        assert_eq!(c.fall(5.0), 100.0);
        assert_eq!(c.phase(5.0), Phase::Dump);

        let expected = 100.0 + 2.0 * (15.0f64).sin();
        assert!((c.price(5.0, &mut NoJitter) - expected).abs() < 1e-12);
        assert_eq!(quiet_curve().price(5.0, &mut NoJitter), 100.0);
        assert_eq!(quiet_curve().price(4.0, &mut NoJitter), quiet_curve().price(4.0, &mut NoJitter));
    }

    #[test]
    fn test_rise_meets_pivot() {
        let c = curve();
        assert!((c.base(4.999) - 95.0).abs() < 1e-3);
        assert!((c.rise(5.0) - 95.0).abs() < 1e-12);
        assert_eq!(c.phase(4.999), Phase::Pump);
    }

    #[test]
    fn test_fall_declines_after_pivot() {
        let c = curve();
        let mut t = 5.0;
        let mut prev = c.base(t);
        while t < 9.5 {
            t += 0.05;
            let next = c.base(t);
            assert!(next <= prev, "base rose from {} to {} at t={}", prev, next, t);
            prev = next;
        }

        let zero_at = 5.0 + 100.0 / 70.0;
        assert!(c.fall(zero_at - 0.01) > 0.0);
        assert_eq!(c.fall(zero_at + 0.01), 0.0);
        assert_eq!(c.fall(30.0), 0.0);
    }

    #[test]
    fn test_fixed_jitter_scales_by_amplitude() {
        let c = quiet_curve();
        let loud = PumpDumpCurve::new(CurveConfig {
            wave_amplitude: 0.0,
            ..CurveConfig::default()
        });
        let t = 3.0;
        assert!((loud.price(t, &mut FixedJitter(1.0)) - (c.base(t) + 2.0)).abs() < 1e-12);
        assert!((loud.price(t, &mut FixedJitter(-1.0)) - (c.base(t) - 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_sampled_domain_is_bounded_with_peak_near_pivot() {
        let c = curve();
        let points = c.sample(&mut UniformJitter::seeded(42));
        assert_eq!(points.len(), 951);
        assert_eq!(points.first().unwrap().t, 0.0);
        assert_eq!(points.last().unwrap().t, 9.5);
        assert!(points.windows(2).all(|w| w[0].t < w[1].t));
        assert!(points.iter().all(|p| (0.0..=200.0).contains(&p.price)));

        let peak = points
            .iter()
            .copied()
            .fold(points[0], |best, p| if p.price > best.price { p } else { best });
        assert!((peak.t - 5.0).abs() < 0.5, "peak at t={}", peak.t);
    }

    #[test]
    fn test_live_jitter_varies_per_call() {
        let c = curve();
        let mut jitter = UniformJitter::thread_local();
        let values: Vec<f64> = (0..20).map(|_| c.price(2.0, &mut jitter)).collect();
        assert!(values.iter().any(|v| *v != values[0]));
    }

    #[test]
    fn test_seed_reproduces_series() {
        let config = CurveConfig::default();
        let a = generate_series(&config, Some(9));
        let b = generate_series(&config, Some(9));
        let c = generate_series(&config, Some(10));
        assert_eq!(a.points, b.points);
        assert_ne!(a.points, c.points);
        assert_eq!(a.seed, Some(9));

        let unseeded = generate_series(&config, None);
        assert_eq!(unseeded.seed, None);
        assert_eq!(unseeded.len(), a.len());
        assert_ne!(unseeded.points, a.points);
    }

    #[test]
    fn test_sample_times_ragged_end() {
        let c = PumpDumpCurve::new(CurveConfig {
            domain_start: 1.0,
            domain_end: 2.25,
            step: 0.5,
            ..CurveConfig::default()
        });
        assert_eq!(c.sample_times(), vec![1.0, 1.5, 2.0, 2.25]);
    }
}
