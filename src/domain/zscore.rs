//! Rolling-window z-score normalization (stage 2).
//!
//! z = (current − rolling mean) / rolling standard deviation over the
//! trailing window. "Unavailable" is distinct from zero: zero is a valid
//! in-range z-score, unavailable means the sample was unreliable.

use crate::domain::series::RawSeries;
use chrono::{Days, NaiveDate};

/// Trailing-window policy for z-score computation.
#[derive(Debug, Clone)]
pub struct WindowPolicy {
    /// Window length in calendar days. 1825 ≈ 5 years.
    pub window_days: u64,
    /// Minimum observations required before a z-score is reported.
    pub min_observations: usize,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            window_days: 1825,
            min_observations: 30,
        }
    }
}

/// Why a z-score could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryGap {
    InsufficientHistory,
    /// Zero variance in the window; reported like insufficient history
    /// downstream, kept distinct for diagnostics.
    DegenerateSeries,
}

/// A computed z-score plus the sample size behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScore {
    pub value: f64,
    pub observations: usize,
}

/// Z-score outcome for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    Available(ZScore),
    Unavailable {
        reason: HistoryGap,
        observations: usize,
    },
}

impl Normalized {
    pub fn value(&self) -> Option<f64> {
        match self {
            Normalized::Available(z) => Some(z.value),
            Normalized::Unavailable { .. } => None,
        }
    }

    pub fn observations(&self) -> usize {
        match self {
            Normalized::Available(z) => z.observations,
            Normalized::Unavailable { observations, .. } => *observations,
        }
    }
}

/// Z-score of the latest value in the trailing window ending at `eval`.
///
/// Uses the sample standard deviation (n−1 divisor). Division by zero is
/// never allowed to propagate: a constant window yields `Unavailable`.
pub fn zscore(series: &RawSeries, eval: NaiveDate, policy: &WindowPolicy) -> Normalized {
    let start = eval
        .checked_sub_days(Days::new(policy.window_days))
        .unwrap_or(NaiveDate::MIN);
    let window = series.window(start, eval);
    let n = window.len();

    if n < policy.min_observations.max(2) {
        return Normalized::Unavailable {
            reason: HistoryGap::InsufficientHistory,
            observations: n,
        };
    }

    let mean = window.iter().map(|o| o.value).sum::<f64>() / n as f64;
    let variance = window
        .iter()
        .map(|o| {
            let diff = o.value - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    let std = variance.sqrt();

    if std == 0.0 {
        return Normalized::Unavailable {
            reason: HistoryGap::DegenerateSeries,
            observations: n,
        };
    }

    let current = window[n - 1].value;
    Normalized::Available(ZScore {
        value: (current - mean) / std,
        observations: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::Observation;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_series(values: &[f64]) -> RawSeries {
        let start = date(2025, 1, 1);
        let observations = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Observation {
                date: start + Days::new(i as u64),
                value,
            })
            .collect();
        RawSeries::new("test", observations)
    }

    fn eval_for(series: &RawSeries) -> NaiveDate {
        series.observations().last().unwrap().date
    }

    #[test]
    fn below_minimum_is_unavailable() {
        let values: Vec<f64> = (0..29).map(|i| i as f64).collect();
        let series = daily_series(&values);
        let result = zscore(&series, eval_for(&series), &WindowPolicy::default());
        assert_eq!(
            result,
            Normalized::Unavailable {
                reason: HistoryGap::InsufficientHistory,
                observations: 29,
            }
        );
    }

    #[test]
    fn at_minimum_is_available() {
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let series = daily_series(&values);
        let result = zscore(&series, eval_for(&series), &WindowPolicy::default());
        match result {
            Normalized::Available(z) => assert_eq!(z.observations, 30),
            other => panic!("expected available z-score, got {other:?}"),
        }
    }

    #[test]
    fn constant_window_is_unavailable_not_nan() {
        let values = vec![310.0; 40];
        let series = daily_series(&values);
        let result = zscore(&series, eval_for(&series), &WindowPolicy::default());
        assert_eq!(
            result,
            Normalized::Unavailable {
                reason: HistoryGap::DegenerateSeries,
                observations: 40,
            }
        );
        assert!(result.value().is_none());
    }

    #[test]
    fn known_zscore() {
        // 29 values at 100 and one at 110: mean = 100.33..., the last value
        // sits above it by a known multiple of the sample std.
        let mut values = vec![100.0; 29];
        values.push(110.0);
        let series = daily_series(&values);
        let result = zscore(&series, eval_for(&series), &WindowPolicy::default());

        let mean: f64 = (29.0 * 100.0 + 110.0) / 30.0;
        let variance = (29.0 * (100.0 - mean) * (100.0 - mean)
            + (110.0 - mean) * (110.0 - mean))
            / 29.0;
        let expected = (110.0 - mean) / variance.sqrt();

        match result {
            Normalized::Available(z) => {
                assert_relative_eq!(z.value, expected, max_relative = 1e-12);
                assert_eq!(z.observations, 30);
            }
            other => panic!("expected available z-score, got {other:?}"),
        }
    }

    #[test]
    fn window_excludes_observations_older_than_five_years() {
        let mut observations: Vec<Observation> = (0..30)
            .map(|i| Observation {
                date: date(2025, 1, 1) + Days::new(i),
                value: 100.0 + i as f64,
            })
            .collect();
        // A wild outlier well outside the window must not affect the mean.
        observations.push(Observation {
            date: date(2015, 1, 1),
            value: 1.0e6,
        });
        let series = RawSeries::new("test", observations);

        let result = zscore(&series, date(2025, 1, 30), &WindowPolicy::default());
        match result {
            Normalized::Available(z) => {
                assert_eq!(z.observations, 30);
                assert!(z.value.abs() < 3.0);
            }
            other => panic!("expected available z-score, got {other:?}"),
        }
    }

    #[test]
    fn zero_is_a_valid_zscore() {
        // Symmetric window whose last value equals the mean.
        let mut values: Vec<f64> = Vec::new();
        for i in 0..15 {
            values.push(100.0 - (i + 1) as f64);
            values.push(100.0 + (i + 1) as f64);
        }
        values.push(100.0);
        let series = daily_series(&values);
        let result = zscore(&series, eval_for(&series), &WindowPolicy::default());
        match result {
            Normalized::Available(z) => assert_relative_eq!(z.value, 0.0),
            other => panic!("expected available z-score, got {other:?}"),
        }
    }
}
