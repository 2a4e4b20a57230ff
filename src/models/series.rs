//! Synthetic price series models

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single sampled point on the price curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub t: f64,
    pub price: f64,
}

/// Which side of the pivot a time value falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pump,
    Dump,
}

/// A full ascending sweep over the time domain
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    pub generated_at: DateTime<Utc>,
    pub seed: Option<u64>,
    pub pivot: f64,
    pub points: Vec<PricePoint>,
}

/// Summary statistics of a series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min_price: f64,
    pub peak: PricePoint,
    pub mean_price: f64,
    pub pump_mean: Option<f64>,
    pub dump_mean: Option<f64>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Highest sampled price; the first one wins on ties
    pub fn peak(&self) -> Option<PricePoint> {
        self.points.iter().copied().fold(None, |best, p| match best {
            Some(b) if b.price >= p.price => Some(b),
            _ => Some(p),
        })
    }

    pub fn max_price(&self) -> Option<f64> {
        self.peak().map(|p| p.price)
    }

    pub fn min_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::min)
    }

    /// Points as `(t, price)` tuples for plotting
    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.t, p.price)).collect()
    }

    pub fn stats(&self) -> Option<SeriesStats> {
        let peak = self.peak()?;
        let min_price = self.min_price()?;
        let count = self.points.len();
        let mean_price = self.points.iter().map(|p| p.price).sum::<f64>() / count as f64;

        let phase_mean = |in_phase: fn(f64, f64) -> bool| {
            let (sum, n) = self
                .points
                .iter()
                .filter(|p| in_phase(p.t, self.pivot))
                .fold((0.0, 0usize), |(s, n), p| (s + p.price, n + 1));
            (n > 0).then(|| sum / n as f64)
        };

        Some(SeriesStats {
            count,
            min_price,
            peak,
            mean_price,
            pump_mean: phase_mean(|t, pivot| t < pivot),
            dump_mean: phase_mean(|t, pivot| t >= pivot),
        })
    }
}
