//! Derived indicator values and the per-run indicator mapping.

use std::collections::BTreeMap;
use std::fmt;

/// Canonical metric names shared by the deriver, scorer and adapters.
pub mod names {
    pub const REAL_YIELD: &str = "real_yield";
    pub const NOMINAL_YIELD: &str = "nominal_yield";
    pub const DXY: &str = "dxy";
    pub const GOLD_SPOT: &str = "gold_spot";
    pub const SP500: &str = "sp500";
    pub const CPI: &str = "cpi";
    pub const VIX: &str = "vix";
    pub const GPR: &str = "gpr";
    pub const GLD_SHARES: &str = "gld_shares";

    pub const REAL_GOLD_PRICE: &str = "real_gold_price";
    pub const GOLD_SP_RATIO: &str = "gold_sp_ratio";
    pub const BREAKEVEN_INFLATION: &str = "breakeven_inflation";

    /// Key for a momentum indicator, e.g. `gold_spot_momentum_30d`.
    pub fn momentum(series: &str, days: i64) -> String {
        format!("{series}_momentum_{days}d")
    }
}

/// Unit tag attached to every indicator value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    IndexPoints,
    Currency,
    Ratio,
    Tonnes,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Percent => write!(f, "%"),
            Unit::IndexPoints => write!(f, "pts"),
            Unit::Currency => write!(f, "USD"),
            Unit::Ratio => write!(f, "ratio"),
            Unit::Tonnes => write!(f, "t"),
        }
    }
}

/// One derived scalar attached to a semantic name.
///
/// Immutable once computed for a run. A metric that could not be computed is
/// absent from the [`IndicatorSet`] entirely, never as a null placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorValue {
    pub current: f64,
    pub prior: Option<f64>,
    pub pct_change: Option<f64>,
    pub abs_change: Option<f64>,
    pub unit: Unit,
}

impl IndicatorValue {
    /// A value with no change fields, e.g. a ratio or a single reading.
    pub fn plain(current: f64, unit: Unit) -> Self {
        Self {
            current,
            prior: None,
            pct_change: None,
            abs_change: None,
            unit,
        }
    }
}

/// The flat indicator mapping one run produces.
///
/// Backed by a `BTreeMap` so iteration order (and therefore report and
/// history output) is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    values: BTreeMap<String, IndicatorValue>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: IndicatorValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// 30-day percent change of a named indicator, if computed.
    pub fn pct_change(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(|v| v.pct_change)
    }

    pub fn current(&self, name: &str) -> Option<f64> {
        self.values.get(name).map(|v| v.current)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndicatorValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_key_format() {
        assert_eq!(
            names::momentum(names::GOLD_SPOT, 30),
            "gold_spot_momentum_30d"
        );
    }

    #[test]
    fn absent_metric_is_absent_not_zero() {
        let set = IndicatorSet::new();
        assert!(set.get(names::REAL_YIELD).is_none());
        assert!(set.pct_change(names::REAL_YIELD).is_none());
    }

    #[test]
    fn pct_change_requires_change_field() {
        let mut set = IndicatorSet::new();
        set.insert(names::GOLD_SP_RATIO, IndicatorValue::plain(0.45, Unit::Ratio));
        assert_eq!(set.current(names::GOLD_SP_RATIO), Some(0.45));
        assert!(set.pct_change(names::GOLD_SP_RATIO).is_none());
    }

    #[test]
    fn iteration_order_is_sorted_by_name() {
        let mut set = IndicatorSet::new();
        set.insert("dxy", IndicatorValue::plain(103.0, Unit::IndexPoints));
        set.insert("cpi", IndicatorValue::plain(310.0, Unit::IndexPoints));
        let keys: Vec<&str> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["cpi", "dxy"]);
    }
}
