//! Regime scoring (stage 3).
//!
//! Pure function from {indicator mapping, valuation z-score, latest
//! central-bank assessment} to a weighted, banded composite score. All
//! weights, thresholds and points live in [`ScoringTable`] so the model can
//! be tuned without touching scoring control flow.

use crate::domain::central_bank::CbAssessment;
use crate::domain::error::GoldmonError;
use crate::domain::indicator::{IndicatorSet, names};
use crate::domain::zscore::Normalized;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    RealYields,
    UsdStrength,
    CbBuying,
    Valuation,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::RealYields => write!(f, "real_yields"),
            Category::UsdStrength => write!(f, "usd_strength"),
            Category::CbBuying => write!(f, "cb_buying"),
            Category::Valuation => write!(f, "valuation"),
        }
    }
}

/// Banded rule for a 30-day momentum signal where falling is bullish.
#[derive(Debug, Clone)]
pub struct MomentumRule {
    pub weight: f64,
    /// Absolute percent change beyond which the move counts as sharp.
    pub sharp_pct: f64,
    pub sharp_points: f64,
    pub mild_points: f64,
}

/// Banded rule for quarterly central-bank net purchases.
#[derive(Debug, Clone)]
pub struct CbRule {
    pub weight: f64,
    pub strong_tonnes: f64,
    pub strong_points: f64,
    pub moderate_tonnes: f64,
    pub moderate_points: f64,
    pub selling_points: f64,
}

/// Valuation penalty rule on the real-gold-price z-score.
#[derive(Debug, Clone)]
pub struct ValuationRule {
    pub weight: f64,
    pub overvalued_z: f64,
    pub overvalued_points: f64,
    /// Below this z the run carries an opportunity label; informational
    /// only, no score contribution.
    pub undervalued_z: f64,
}

/// The full weight/threshold table. Overridable from the `[scoring]`
/// config section; defaults reproduce the published methodology.
#[derive(Debug, Clone)]
pub struct ScoringTable {
    pub real_yields: MomentumRule,
    pub usd_strength: MomentumRule,
    pub cb_buying: CbRule,
    pub valuation: ValuationRule,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            real_yields: MomentumRule {
                weight: 2.0,
                sharp_pct: 2.0,
                sharp_points: 2.0,
                mild_points: 1.0,
            },
            usd_strength: MomentumRule {
                weight: 1.0,
                sharp_pct: 2.0,
                sharp_points: 1.5,
                mild_points: 0.75,
            },
            cb_buying: CbRule {
                weight: 2.0,
                strong_tonnes: 250.0,
                strong_points: 2.0,
                moderate_tonnes: 100.0,
                moderate_points: 1.0,
                selling_points: -1.0,
            },
            valuation: ValuationRule {
                weight: 1.0,
                overvalued_z: 1.5,
                overvalued_points: -1.0,
                undervalued_z: -1.0,
            },
        }
    }
}

/// One category's contribution: either scored or explicitly unavailable.
/// A missing category is a data-quality event, never a silent neutral.
#[derive(Debug, Clone, PartialEq)]
pub enum SubScore {
    Scored {
        points: f64,
        weighted: f64,
        label: &'static str,
    },
    Unavailable { reason: &'static str },
}

impl SubScore {
    fn scored(points: f64, weight: f64, label: &'static str) -> Self {
        SubScore::Scored {
            points,
            weighted: points * weight,
            label,
        }
    }

    pub fn weighted(&self) -> f64 {
        match self {
            SubScore::Scored { weighted, .. } => *weighted,
            SubScore::Unavailable { .. } => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub category: Category,
    pub result: SubScore,
}

/// Discrete assessment band with conviction label and suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Bullish,
    MildlyBullish,
    Neutral,
    MildlyBearish,
    Bearish,
}

impl Assessment {
    /// Range lookup on the weighted total.
    pub fn classify(total: f64) -> Self {
        if total > 3.0 {
            Assessment::Bullish
        } else if total >= 1.0 {
            Assessment::MildlyBullish
        } else if total > -1.0 {
            Assessment::Neutral
        } else if total >= -3.0 {
            Assessment::MildlyBearish
        } else {
            Assessment::Bearish
        }
    }

    pub fn conviction(&self) -> &'static str {
        match self {
            Assessment::Bullish | Assessment::Bearish => "high conviction",
            Assessment::MildlyBullish => "moderate conviction",
            Assessment::Neutral => "mixed conviction",
            Assessment::MildlyBearish => "caution",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Assessment::Bullish => "increase allocation",
            Assessment::MildlyBullish => "maintain or slight increase",
            Assessment::Neutral => "hold position",
            Assessment::MildlyBearish => "maintain or reduce",
            Assessment::Bearish => "reduce allocation",
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assessment::Bullish => write!(f, "BULLISH"),
            Assessment::MildlyBullish => write!(f, "MILDLY BULLISH"),
            Assessment::Neutral => write!(f, "NEUTRAL"),
            Assessment::MildlyBearish => write!(f, "MILDLY BEARISH"),
            Assessment::Bearish => write!(f, "BEARISH"),
        }
    }
}

/// A complete regime score for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeScore {
    pub total: f64,
    pub categories: Vec<CategoryScore>,
    pub assessment: Assessment,
}

impl RegimeScore {
    /// Categories that contributed zero because their input was missing.
    pub fn missing_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| matches!(c.result, SubScore::Unavailable { .. }))
            .map(|c| c.category)
            .collect()
    }
}

fn momentum_sub_score(
    change: Option<f64>,
    rule: &MomentumRule,
    labels: &MomentumLabels,
) -> SubScore {
    let Some(change) = change else {
        return SubScore::Unavailable {
            reason: labels.unavailable,
        };
    };
    // Thresholds are strict: a change of exactly -sharp_pct is a mild move.
    if change < -rule.sharp_pct {
        SubScore::scored(rule.sharp_points, rule.weight, labels.falling_sharply)
    } else if change < 0.0 {
        SubScore::scored(rule.mild_points, rule.weight, labels.falling)
    } else if change > rule.sharp_pct {
        SubScore::scored(-rule.sharp_points, rule.weight, labels.rising_sharply)
    } else if change > 0.0 {
        SubScore::scored(-rule.mild_points, rule.weight, labels.rising)
    } else {
        SubScore::scored(0.0, rule.weight, labels.stable)
    }
}

struct MomentumLabels {
    falling_sharply: &'static str,
    falling: &'static str,
    stable: &'static str,
    rising: &'static str,
    rising_sharply: &'static str,
    unavailable: &'static str,
}

const REAL_YIELD_LABELS: MomentumLabels = MomentumLabels {
    falling_sharply: "real yields falling sharply",
    falling: "real yields falling",
    stable: "real yields stable",
    rising: "real yields rising",
    rising_sharply: "real yields rising sharply",
    unavailable: "30-day real yield change unavailable",
};

const USD_LABELS: MomentumLabels = MomentumLabels {
    falling_sharply: "USD weakening sharply",
    falling: "USD weakening",
    stable: "USD stable",
    rising: "USD strengthening",
    rising_sharply: "USD strengthening sharply",
    unavailable: "30-day currency index change unavailable",
};

fn cb_sub_score(cb: &CbAssessment, rule: &CbRule) -> SubScore {
    if cb.is_stale {
        return SubScore::Unavailable {
            reason: "central bank data stale",
        };
    }
    let tonnes = cb.record.net_tonnes;
    if tonnes > rule.strong_tonnes {
        SubScore::scored(rule.strong_points, rule.weight, "strong central bank buying")
    } else if tonnes >= rule.moderate_tonnes {
        SubScore::scored(
            rule.moderate_points,
            rule.weight,
            "moderate central bank buying",
        )
    } else if tonnes <= 0.0 {
        SubScore::scored(rule.selling_points, rule.weight, "central bank net selling")
    } else {
        SubScore::scored(0.0, rule.weight, "weak central bank buying")
    }
}

fn valuation_sub_score(z: Option<&Normalized>, rule: &ValuationRule) -> SubScore {
    match z {
        Some(Normalized::Available(z)) => {
            if z.value > rule.overvalued_z {
                SubScore::scored(
                    rule.overvalued_points,
                    rule.weight,
                    "overvalued versus trailing average",
                )
            } else if z.value < rule.undervalued_z {
                SubScore::scored(0.0, rule.weight, "undervalued versus trailing average")
            } else {
                SubScore::scored(0.0, rule.weight, "fair value range")
            }
        }
        Some(Normalized::Unavailable { .. }) => SubScore::Unavailable {
            reason: "valuation z-score unavailable",
        },
        None => SubScore::Unavailable {
            reason: "real gold price series unavailable",
        },
    }
}

/// Score one run. Deterministic; no I/O, no randomness.
///
/// Returns an error only when no central-bank record exists at all; every
/// other gap degrades the affected category to zero-with-flag.
pub fn score_regime(
    indicators: &IndicatorSet,
    valuation_z: Option<&Normalized>,
    cb: Option<&CbAssessment>,
    table: &ScoringTable,
) -> Result<RegimeScore, GoldmonError> {
    let cb = cb.ok_or(GoldmonError::MissingCentralBankData)?;

    let categories = vec![
        CategoryScore {
            category: Category::RealYields,
            result: momentum_sub_score(
                indicators.pct_change(names::REAL_YIELD),
                &table.real_yields,
                &REAL_YIELD_LABELS,
            ),
        },
        CategoryScore {
            category: Category::UsdStrength,
            result: momentum_sub_score(
                indicators.pct_change(names::DXY),
                &table.usd_strength,
                &USD_LABELS,
            ),
        },
        CategoryScore {
            category: Category::CbBuying,
            result: cb_sub_score(cb, &table.cb_buying),
        },
        CategoryScore {
            category: Category::Valuation,
            result: valuation_sub_score(valuation_z, &table.valuation),
        },
    ];

    let total: f64 = categories.iter().map(|c| c.result.weighted()).sum();

    Ok(RegimeScore {
        total,
        assessment: Assessment::classify(total),
        categories,
    })
}
