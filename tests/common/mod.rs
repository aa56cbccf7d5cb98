#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use goldmon::domain::central_bank::CentralBankRecord;
use goldmon::domain::error::GoldmonError;
use goldmon::domain::indicator::names;
use goldmon::domain::series::{MarketSnapshot, Observation, RawSeries};
use goldmon::ports::data_port::MarketDataPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn daily_series(name: &str, start: NaiveDate, values: &[f64]) -> RawSeries {
    RawSeries::new(
        name,
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| Observation {
                date: start + Days::new(i as u64),
                value,
            })
            .collect(),
    )
}

/// Alternating values around `center` ending exactly on `center`, long
/// enough for a z-score window and with near-zero final z.
pub fn balanced_series(name: &str, end: NaiveDate, center: f64, spread: f64) -> RawSeries {
    let mut observations = Vec::new();
    for i in 0..40u64 {
        let offset = if i % 2 == 0 { -spread } else { spread };
        observations.push(Observation {
            date: end - Days::new(40 - i),
            value: center + offset,
        });
    }
    observations.push(Observation {
        date: end,
        value: center,
    });
    RawSeries::new(name, observations)
}

/// Two-point series producing an exact 30-day percent change at `end`.
pub fn change_series(name: &str, end: NaiveDate, base: f64, pct_change: f64) -> RawSeries {
    RawSeries::new(
        name,
        vec![
            Observation {
                date: end - Days::new(30),
                value: base,
            },
            Observation {
                date: end,
                value: base * (1.0 + pct_change / 100.0),
            },
        ],
    )
}

pub fn cb_record(quarter: &str, tonnes: f64, validated: NaiveDate) -> CentralBankRecord {
    CentralBankRecord {
        quarter: quarter.into(),
        net_tonnes: tonnes,
        source: "WGC".into(),
        validated_date: validated,
    }
}

/// Snapshot with exact 30-day changes for the scored momentum signals and a
/// balanced gold window so valuation scores in the fair-value band.
pub fn scenario_snapshot(
    eval: NaiveDate,
    real_yield_change: f64,
    dxy_change: f64,
) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::new();
    snapshot.insert(change_series(names::REAL_YIELD, eval, 2.0, real_yield_change));
    snapshot.insert(change_series(names::NOMINAL_YIELD, eval, 4.0, 0.0));
    snapshot.insert(change_series(names::DXY, eval, 100.0, dxy_change));
    snapshot.insert(balanced_series(names::GOLD_SPOT, eval, 2000.0, 10.0));
    snapshot.insert(balanced_series(names::SP500, eval, 4500.0, 20.0));
    snapshot.insert(daily_series(
        names::CPI,
        eval - Days::new(60),
        &[300.0; 61],
    ));
    snapshot.insert(change_series(names::VIX, eval, 15.0, 2.0));
    snapshot.insert(change_series(names::GPR, eval, 120.0, -1.0));
    snapshot
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Observation>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: RawSeries) -> Self {
        self.data
            .insert(series.name.clone(), series.observations().to_vec());
        self
    }

    pub fn with_error(mut self, name: &str, reason: &str) -> Self {
        self.errors.insert(name.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_series(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RawSeries, GoldmonError> {
        if let Some(reason) = self.errors.get(name) {
            return Err(GoldmonError::Store {
                reason: reason.clone(),
            });
        }
        let observations = self
            .data
            .get(name)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|o| o.date >= start_date && o.date <= end_date)
            .collect();
        Ok(RawSeries::new(name, observations))
    }

    fn list_series(&self) -> Result<Vec<String>, GoldmonError> {
        let mut names: Vec<String> = self.data.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn data_range(
        &self,
        name: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GoldmonError> {
        match self.data.get(name) {
            Some(observations) if !observations.is_empty() => {
                let min = observations.iter().map(|o| o.date).min().unwrap();
                let max = observations.iter().map(|o| o.date).max().unwrap();
                Ok(Some((min, max, observations.len())))
            }
            _ => Ok(None),
        }
    }
}
