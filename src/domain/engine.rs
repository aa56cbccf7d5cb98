//! One engine run: derive → normalize → score.
//!
//! The three stages run in strict order because each consumes the complete
//! output of the previous one. The run is a pure computation over its input
//! snapshot; concurrent runs for different evaluation dates need no locking
//! as long as each gets its own snapshot.

use crate::domain::central_bank::{CbAssessment, CentralBankRecord, assess_latest};
use crate::domain::deriver::{
    DeriverConfig, derive_indicators, gold_equity_ratio_series, real_gold_price_series,
};
use crate::domain::error::GoldmonError;
use crate::domain::indicator::{IndicatorSet, names};
use crate::domain::quality::QualityFlag;
use crate::domain::scoring::{RegimeScore, ScoringTable, score_regime};
use crate::domain::series::MarketSnapshot;
use crate::domain::zscore::{HistoryGap, Normalized, WindowPolicy, zscore};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub deriver: DeriverConfig,
    pub window: WindowPolicy,
    pub scoring: ScoringTable,
    /// Central-bank record age beyond which the data counts as stale.
    pub staleness_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deriver: DeriverConfig::default(),
            window: WindowPolicy::default(),
            scoring: ScoringTable::default(),
            staleness_days: 90,
        }
    }
}

/// The immutable result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRun {
    pub evaluation_date: NaiveDate,
    pub indicators: IndicatorSet,
    pub normalized: BTreeMap<String, Normalized>,
    pub regime: RegimeScore,
    pub cb: CbAssessment,
    pub flags: Vec<QualityFlag>,
}

/// Execute the three stages for one evaluation date.
///
/// Fails only when the central-bank store is entirely empty; every other
/// gap degrades to an absence marker plus a quality flag on the result.
pub fn run(
    snapshot: &MarketSnapshot,
    cb_records: &[CentralBankRecord],
    eval: NaiveDate,
    cfg: &EngineConfig,
) -> Result<EngineRun, GoldmonError> {
    let (indicators, mut flags) = derive_indicators(snapshot, eval, &cfg.deriver);

    let mut normalized = BTreeMap::new();
    let mut normalize = |name: &str, series: Option<crate::domain::series::RawSeries>| {
        let Some(series) = series else {
            // Absence of the underlying series was flagged by the deriver.
            return;
        };
        let result = zscore(&series, eval, &cfg.window);
        if let Normalized::Unavailable {
            reason,
            observations,
        } = result
        {
            flags.push(match reason {
                HistoryGap::InsufficientHistory => QualityFlag::InsufficientHistory {
                    name: name.to_string(),
                    observations,
                },
                HistoryGap::DegenerateSeries => QualityFlag::DegenerateSeries {
                    name: name.to_string(),
                },
            });
        }
        normalized.insert(name.to_string(), result);
    };

    normalize(names::REAL_GOLD_PRICE, real_gold_price_series(snapshot));
    normalize(names::GOLD_SPOT, snapshot.get(names::GOLD_SPOT).cloned());
    normalize(names::GOLD_SP_RATIO, gold_equity_ratio_series(snapshot));

    let cb = assess_latest(cb_records, eval, cfg.staleness_days)?;
    if cb.is_stale {
        flags.push(QualityFlag::StaleCentralBankData {
            days_old: cb.days_old,
        });
    }

    let regime = score_regime(
        &indicators,
        normalized.get(names::REAL_GOLD_PRICE),
        Some(&cb),
        &cfg.scoring,
    )?;

    for category in regime.missing_categories() {
        flags.push(QualityFlag::CategoryInputMissing { category });
    }

    Ok(EngineRun {
        evaluation_date: eval,
        indicators,
        normalized,
        regime,
        cb,
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{Observation, RawSeries};
    use chrono::Days;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(name: &str, start: NaiveDate, values: &[f64]) -> RawSeries {
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

    fn snapshot_with_history(days: usize) -> (MarketSnapshot, NaiveDate) {
        let start = date(2024, 1, 1);
        let eval = start + Days::new(days as u64 - 1);
        let ramp = |from: f64, step: f64| -> Vec<f64> {
            (0..days).map(|i| from + step * i as f64).collect()
        };
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(daily(names::REAL_YIELD, start, &ramp(2.0, -0.002)));
        snapshot.insert(daily(names::NOMINAL_YIELD, start, &ramp(4.2, -0.001)));
        snapshot.insert(daily(names::DXY, start, &ramp(104.0, -0.02)));
        snapshot.insert(daily(names::GOLD_SPOT, start, &ramp(1950.0, 0.8)));
        snapshot.insert(daily(names::SP500, start, &ramp(4400.0, 1.5)));
        snapshot.insert(daily(names::CPI, start, &ramp(305.0, 0.05)));
        snapshot.insert(daily(names::VIX, start, &ramp(16.0, 0.01)));
        snapshot.insert(daily(names::GPR, start, &ramp(110.0, 0.1)));
        (snapshot, eval)
    }

    fn fresh_record(eval: NaiveDate, tonnes: f64) -> CentralBankRecord {
        CentralBankRecord {
            quarter: "Q1_2024".into(),
            net_tonnes: tonnes,
            source: "WGC".into(),
            validated_date: eval - Days::new(20),
        }
    }

    #[test]
    fn run_is_deterministic() {
        let (snapshot, eval) = snapshot_with_history(200);
        let records = vec![fresh_record(eval, 290.0)];
        let cfg = EngineConfig::default();

        let first = run(&snapshot, &records, eval, &cfg).unwrap();
        let second = run(&snapshot, &records, eval, &cfg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_cb_store_fails_the_run() {
        let (snapshot, eval) = snapshot_with_history(200);
        let err = run(&snapshot, &[], eval, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, GoldmonError::MissingCentralBankData));
    }

    #[test]
    fn short_history_flags_zscores_but_run_succeeds() {
        let (snapshot, eval) = snapshot_with_history(20);
        let records = vec![fresh_record(eval, 290.0)];
        let result = run(&snapshot, &records, eval, &EngineConfig::default()).unwrap();

        assert!(result.flags.iter().any(|f| matches!(
            f,
            QualityFlag::InsufficientHistory { name, .. } if name == names::REAL_GOLD_PRICE
        )));
        assert!(result.flags.iter().any(|f| matches!(
            f,
            QualityFlag::CategoryInputMissing {
                category: crate::domain::scoring::Category::Valuation
            }
        )));
    }

    #[test]
    fn stale_record_is_flagged() {
        let (snapshot, eval) = snapshot_with_history(200);
        let records = vec![CentralBankRecord {
            quarter: "Q1_2023".into(),
            net_tonnes: 290.0,
            source: "WGC".into(),
            validated_date: eval - Days::new(200),
        }];
        let result = run(&snapshot, &records, eval, &EngineConfig::default()).unwrap();

        assert!(result.flags.iter().any(|f| matches!(
            f,
            QualityFlag::StaleCentralBankData { days_old: 200 }
        )));
    }
}
