//! Raw observed series and the per-run input snapshot.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One dated observation of a raw metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// A named, date-ordered sequence of observations.
///
/// Sequences from different sources are not aligned: daily series can have
/// gaps and monthly series (e.g. a consumer price index) have one point per
/// month, so all lookups are "at or before" a date rather than exact.
#[derive(Debug, Clone)]
pub struct RawSeries {
    pub name: String,
    observations: Vec<Observation>,
}

impl RawSeries {
    /// Build a series, sorting observations by date.
    pub fn new(name: impl Into<String>, mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);
        Self {
            name: name.into(),
            observations,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Latest observation dated at or before `date`.
    pub fn at_or_before(&self, date: NaiveDate) -> Option<&Observation> {
        let idx = self.observations.partition_point(|o| o.date <= date);
        if idx == 0 { None } else { Some(&self.observations[idx - 1]) }
    }

    /// Value of the latest observation at or before `date`.
    pub fn value_at_or_before(&self, date: NaiveDate) -> Option<f64> {
        self.at_or_before(date).map(|o| o.value)
    }

    /// The observation immediately preceding the latest one at or before
    /// `date`. Used for "prior value" indicator fields.
    pub fn prior_to(&self, date: NaiveDate) -> Option<&Observation> {
        let idx = self.observations.partition_point(|o| o.date <= date);
        if idx < 2 { None } else { Some(&self.observations[idx - 2]) }
    }

    /// All observations with `start <= date <= end`.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> &[Observation] {
        let lo = self.observations.partition_point(|o| o.date < start);
        let hi = self.observations.partition_point(|o| o.date <= end);
        &self.observations[lo..hi]
    }
}

/// Read-only snapshot of every raw series available to one run.
///
/// Owned by the retrieval collaborator; the engine never mutates it.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    series: BTreeMap<String, RawSeries>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: RawSeries) {
        self.series.insert(series.name.clone(), series);
    }

    pub fn get(&self, name: &str) -> Option<&RawSeries> {
        self.series.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_series() -> RawSeries {
        RawSeries::new(
            "real_yield",
            vec![
                Observation { date: date(2025, 1, 6), value: 1.8 },
                Observation { date: date(2025, 1, 2), value: 1.5 },
                Observation { date: date(2025, 1, 3), value: 1.6 },
            ],
        )
    }

    #[test]
    fn new_sorts_by_date() {
        let series = sample_series();
        let dates: Vec<NaiveDate> = series.observations().iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 1, 2), date(2025, 1, 3), date(2025, 1, 6)]
        );
    }

    #[test]
    fn at_or_before_exact_date() {
        let series = sample_series();
        let obs = series.at_or_before(date(2025, 1, 3)).unwrap();
        assert_eq!(obs.value, 1.6);
    }

    #[test]
    fn at_or_before_skips_gap() {
        let series = sample_series();
        // Jan 4-5 have no observations, so Jan 5 resolves to Jan 3.
        let obs = series.at_or_before(date(2025, 1, 5)).unwrap();
        assert_eq!(obs.date, date(2025, 1, 3));
    }

    #[test]
    fn at_or_before_none_before_first() {
        let series = sample_series();
        assert!(series.at_or_before(date(2025, 1, 1)).is_none());
    }

    #[test]
    fn prior_to_returns_second_latest() {
        let series = sample_series();
        let obs = series.prior_to(date(2025, 1, 6)).unwrap();
        assert_eq!(obs.date, date(2025, 1, 3));
        assert!(series.prior_to(date(2025, 1, 2)).is_none());
    }

    #[test]
    fn window_is_inclusive() {
        let series = sample_series();
        let w = series.window(date(2025, 1, 2), date(2025, 1, 3));
        assert_eq!(w.len(), 2);
        let w = series.window(date(2025, 1, 4), date(2025, 1, 5));
        assert!(w.is_empty());
    }

    #[test]
    fn snapshot_lookup() {
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(sample_series());
        assert!(snapshot.get("real_yield").is_some());
        assert!(snapshot.get("dxy").is_none());
        assert_eq!(snapshot.names().collect::<Vec<_>>(), vec!["real_yield"]);
    }
}
