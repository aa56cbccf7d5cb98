//! Indicator derivation (stage 1).
//!
//! Converts the raw snapshot into the flat indicator mapping: latest values,
//! 30-day changes, CPI-adjusted gold price, gold/equity ratio, breakeven
//! inflation and multi-horizon momentum. Missing inputs degrade to absent
//! indicators plus a quality flag; nothing is ever defaulted to zero.

use crate::domain::indicator::{IndicatorSet, IndicatorValue, Unit, names};
use crate::domain::quality::QualityFlag;
use crate::domain::series::{MarketSnapshot, Observation, RawSeries};
use chrono::{Days, NaiveDate};

/// Raw series that get a latest-value indicator, with their unit tags.
const BASE_SERIES: &[(&str, Unit)] = &[
    (names::REAL_YIELD, Unit::Percent),
    (names::NOMINAL_YIELD, Unit::Percent),
    (names::DXY, Unit::IndexPoints),
    (names::GOLD_SPOT, Unit::Currency),
    (names::SP500, Unit::IndexPoints),
    (names::CPI, Unit::IndexPoints),
    (names::VIX, Unit::IndexPoints),
    (names::GPR, Unit::IndexPoints),
    (names::GLD_SHARES, Unit::IndexPoints),
];

/// Series that get multi-horizon momentum indicators.
const MOMENTUM_SERIES: &[&str] = &[
    names::REAL_YIELD,
    names::DXY,
    names::GOLD_SPOT,
    names::VIX,
    names::GPR,
];

#[derive(Debug, Clone)]
pub struct DeriverConfig {
    /// Lookback for the per-series change fields, in days.
    pub change_lookback_days: u64,
    /// Momentum horizons, in days.
    pub momentum_horizons: Vec<u64>,
}

impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            change_lookback_days: 30,
            momentum_horizons: vec![30, 60, 90],
        }
    }
}

/// Percent change of a series over the trailing `days` window ending at
/// `eval`. Requires an observation at or before both endpoints; a zero
/// base value yields `None` rather than a division blow-up.
pub fn momentum_pct(series: &RawSeries, eval: NaiveDate, days: u64) -> Option<f64> {
    let current = series.value_at_or_before(eval)?;
    let past_date = eval.checked_sub_days(Days::new(days))?;
    let past = series.value_at_or_before(past_date)?;
    if past == 0.0 {
        return None;
    }
    Some((current / past - 1.0) * 100.0)
}

/// Inflation-adjusted gold price series: spot ÷ (CPI ÷ base-period CPI),
/// where the base period is the earliest CPI observation. Removes the
/// inflation distortion from the nominal spot price.
pub fn real_gold_price_series(snapshot: &MarketSnapshot) -> Option<RawSeries> {
    let spot = snapshot.get(names::GOLD_SPOT)?;
    let cpi = snapshot.get(names::CPI)?;
    let base = cpi.observations().first().map(|o| o.value)?;
    if base == 0.0 {
        return None;
    }

    let observations: Vec<Observation> = spot
        .observations()
        .iter()
        .filter_map(|obs| {
            let cpi_value = cpi.value_at_or_before(obs.date)?;
            if cpi_value == 0.0 {
                return None;
            }
            Some(Observation {
                date: obs.date,
                value: obs.value / (cpi_value / base),
            })
        })
        .collect();

    if observations.is_empty() {
        return None;
    }
    Some(RawSeries::new(names::REAL_GOLD_PRICE, observations))
}

/// Gold/equity ratio series: spot ÷ equity index level. Rising means gold
/// outperforming equities.
pub fn gold_equity_ratio_series(snapshot: &MarketSnapshot) -> Option<RawSeries> {
    let spot = snapshot.get(names::GOLD_SPOT)?;
    let equity = snapshot.get(names::SP500)?;

    let observations: Vec<Observation> = spot
        .observations()
        .iter()
        .filter_map(|obs| {
            let level = equity.value_at_or_before(obs.date)?;
            if level == 0.0 {
                return None;
            }
            Some(Observation {
                date: obs.date,
                value: obs.value / level,
            })
        })
        .collect();

    if observations.is_empty() {
        return None;
    }
    Some(RawSeries::new(names::GOLD_SP_RATIO, observations))
}

/// Derive the full indicator mapping for one evaluation date.
pub fn derive_indicators(
    snapshot: &MarketSnapshot,
    eval: NaiveDate,
    cfg: &DeriverConfig,
) -> (IndicatorSet, Vec<QualityFlag>) {
    let mut set = IndicatorSet::new();
    let mut flags = Vec::new();

    for &(name, unit) in BASE_SERIES {
        let current = snapshot.get(name).and_then(|s| s.at_or_before(eval));
        let (Some(series), Some(current)) = (snapshot.get(name), current) else {
            flags.push(QualityFlag::IndicatorOmitted {
                name: name.to_string(),
                reason: "no observation at or before evaluation date".to_string(),
            });
            continue;
        };

        let past = eval
            .checked_sub_days(Days::new(cfg.change_lookback_days))
            .and_then(|d| series.value_at_or_before(d));
        let pct_change = past
            .filter(|&p| p != 0.0)
            .map(|p| (current.value / p - 1.0) * 100.0);
        let abs_change = past.map(|p| current.value - p);

        set.insert(
            name,
            IndicatorValue {
                current: current.value,
                prior: series.prior_to(eval).map(|o| o.value),
                pct_change,
                abs_change,
                unit,
            },
        );
    }

    match real_gold_price_series(snapshot).and_then(|s| s.value_at_or_before(eval)) {
        Some(value) => set.insert(
            names::REAL_GOLD_PRICE,
            IndicatorValue::plain(value, Unit::Currency),
        ),
        None => flags.push(QualityFlag::IndicatorOmitted {
            name: names::REAL_GOLD_PRICE.to_string(),
            reason: "requires gold_spot and cpi".to_string(),
        }),
    }

    match gold_equity_ratio_series(snapshot).and_then(|s| s.value_at_or_before(eval)) {
        Some(value) => set.insert(
            names::GOLD_SP_RATIO,
            IndicatorValue::plain(value, Unit::Ratio),
        ),
        None => flags.push(QualityFlag::IndicatorOmitted {
            name: names::GOLD_SP_RATIO.to_string(),
            reason: "requires gold_spot and sp500".to_string(),
        }),
    }

    let nominal = set.current(names::NOMINAL_YIELD);
    let real = set.current(names::REAL_YIELD);
    match (nominal, real) {
        (Some(n), Some(r)) => set.insert(
            names::BREAKEVEN_INFLATION,
            IndicatorValue::plain(n - r, Unit::Percent),
        ),
        _ => flags.push(QualityFlag::IndicatorOmitted {
            name: names::BREAKEVEN_INFLATION.to_string(),
            reason: "requires nominal_yield and real_yield".to_string(),
        }),
    }

    for &name in MOMENTUM_SERIES {
        let Some(series) = snapshot.get(name) else {
            // Already flagged by the base-series pass.
            continue;
        };
        for &days in &cfg.momentum_horizons {
            let key = names::momentum(name, days as i64);
            match momentum_pct(series, eval, days) {
                Some(pct) => set.insert(key, IndicatorValue::plain(pct, Unit::Percent)),
                None => flags.push(QualityFlag::IndicatorOmitted {
                    name: key,
                    reason: format!("fewer than {days} days of history"),
                }),
            }
        }
    }

    (set, flags)
}
