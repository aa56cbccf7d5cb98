//! Templated narrative adapter implementing NarrativePort.
//!
//! Deterministic fallback summary used when no richer synthesis source is
//! configured or the configured one fails. Less insightful than a written
//! analysis but always available.

use crate::domain::engine::EngineRun;
use crate::domain::error::GoldmonError;
use crate::domain::indicator::names;
use crate::domain::scoring::SubScore;
use crate::ports::narrative_port::NarrativePort;

pub struct TemplateNarrativeAdapter;

impl TemplateNarrativeAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TemplateNarrativeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_change(change: Option<f64>, up: &str, down: &str) -> String {
    match change {
        Some(c) if c < 0.0 => format!("{down} by {:.1}%", c.abs()),
        Some(c) if c > 0.0 => format!("{up} by {:.1}%", c.abs()),
        Some(_) => "held steady".to_string(),
        None => "moved by an unknown amount (data gap)".to_string(),
    }
}

impl NarrativePort for TemplateNarrativeAdapter {
    fn synthesize(&self, run: &EngineRun) -> Result<String, GoldmonError> {
        let regime = &run.regime;
        let momentum = |series: &str| run.indicators.current(&names::momentum(series, 30));

        let mut narrative = format!(
            "**Market regime:** {} (score {:.2})\n\n\
            Over the past 30 days, real yields have {}, while the US dollar has {}. \
            Gold spot prices {} during this period.\n\n\
            **Key drivers:**\n",
            regime.assessment,
            regime.total,
            describe_change(momentum(names::REAL_YIELD), "risen", "fallen"),
            describe_change(momentum(names::DXY), "strengthened", "weakened"),
            describe_change(momentum(names::GOLD_SPOT), "increased", "decreased"),
        );

        for category in &regime.categories {
            match &category.result {
                SubScore::Scored {
                    weighted, label, ..
                } => narrative.push_str(&format!("- {label} ({weighted:+.2})\n")),
                SubScore::Unavailable { reason } => {
                    narrative.push_str(&format!("- {}: {reason}\n", category.category))
                }
            }
        }

        narrative.push_str(&format!(
            "\n**Position recommendation:** {}\n\n**Conviction:** {}\n",
            regime.assessment.action(),
            regime.assessment.conviction(),
        ));

        Ok(narrative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::central_bank::{CbAssessment, CentralBankRecord};
    use crate::domain::indicator::{IndicatorSet, IndicatorValue, Unit};
    use crate::domain::scoring::{Assessment, Category, CategoryScore, RegimeScore};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn sample_run() -> EngineRun {
        let mut indicators = IndicatorSet::new();
        indicators.insert(
            names::momentum(names::REAL_YIELD, 30),
            IndicatorValue::plain(-2.5, Unit::Percent),
        );
        indicators.insert(
            names::momentum(names::GOLD_SPOT, 30),
            IndicatorValue::plain(3.1, Unit::Percent),
        );

        EngineRun {
            evaluation_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            indicators,
            normalized: BTreeMap::new(),
            regime: RegimeScore {
                total: 4.0,
                categories: vec![
                    CategoryScore {
                        category: Category::RealYields,
                        result: SubScore::Scored {
                            points: 2.0,
                            weighted: 4.0,
                            label: "real yields falling sharply",
                        },
                    },
                    CategoryScore {
                        category: Category::UsdStrength,
                        result: SubScore::Unavailable {
                            reason: "30-day currency index change unavailable",
                        },
                    },
                ],
                assessment: Assessment::Bullish,
            },
            cb: CbAssessment {
                record: CentralBankRecord {
                    quarter: "Q1_2025".into(),
                    net_tonnes: 290.0,
                    source: "WGC".into(),
                    validated_date: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
                },
                days_old: 17,
                is_stale: false,
            },
            flags: Vec::new(),
        }
    }

    #[test]
    fn narrative_reports_regime_and_drivers() {
        let narrative = TemplateNarrativeAdapter::new()
            .synthesize(&sample_run())
            .unwrap();

        assert!(narrative.contains("BULLISH"));
        assert!(narrative.contains("fallen by 2.5%"));
        assert!(narrative.contains("increased by 3.1%"));
        assert!(narrative.contains("real yields falling sharply (+4.00)"));
        assert!(narrative.contains("usd_strength: 30-day currency index change unavailable"));
        assert!(narrative.contains("increase allocation"));
    }

    #[test]
    fn missing_momentum_is_called_out_not_zeroed() {
        let mut run = sample_run();
        run.indicators = IndicatorSet::new();
        let narrative = TemplateNarrativeAdapter::new().synthesize(&run).unwrap();
        assert!(narrative.contains("unknown amount (data gap)"));
    }
}
