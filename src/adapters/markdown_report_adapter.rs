//! Markdown report adapter implementing ReportPort.
//!
//! Renders one engine run into the monthly markdown report: executive
//! summary, regime score with an ASCII score bar, key metrics, central-bank
//! activity and data-quality notes. Charts are out of scope.

use crate::domain::engine::EngineRun;
use crate::domain::error::GoldmonError;
use crate::domain::indicator::names;
use crate::domain::scoring::SubScore;
use crate::domain::zscore::Normalized;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub struct MarkdownReportAdapter;

impl MarkdownReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(run: &EngineRun, narrative: &str) -> String {
        let mut report = String::new();
        report.push_str(&build_header(run));
        report.push_str(&build_narrative_section(narrative));
        report.push_str(&build_regime_section(run));
        report.push_str(&build_metrics_section(run));
        report.push_str(&build_cb_section(run));
        report.push_str(&build_quality_section(run));
        report.push_str(build_footer());
        report
    }
}

impl Default for MarkdownReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for MarkdownReportAdapter {
    fn write(
        &self,
        run: &EngineRun,
        narrative: &str,
        output_path: &Path,
    ) -> Result<(), GoldmonError> {
        let content = Self::render(run, narrative);
        fs::write(output_path, content).map_err(|e| GoldmonError::Store {
            reason: format!("failed to write report {}: {}", output_path.display(), e),
        })
    }
}

fn fmt_num(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.2}%"),
        None => "n/a".to_string(),
    }
}

fn build_header(run: &EngineRun) -> String {
    format!(
        "# Gold Market Monitor: {month}\n\n*Evaluation date: {date}*\n\n---\n\n",
        month = run.evaluation_date.format("%B %Y"),
        date = run.evaluation_date.format("%Y-%m-%d"),
    )
}

fn build_narrative_section(narrative: &str) -> String {
    format!("## Executive Summary\n\n{narrative}\n\n---\n\n")
}

/// Map the total onto a 21-cell bar spanning -5 to +5.
fn score_bar(total: f64) -> String {
    let normalized = ((total + 5.0) / 10.0).clamp(0.0, 1.0);
    let position = (normalized * 20.0).round() as usize;

    let mut bar: Vec<char> = vec!['─'; 21];
    bar[10] = '┼';
    bar[position] = '█';
    let bar: String = bar.into_iter().collect();

    format!(
        "```\nBearish                Neutral                Bullish\n   -5         -3         0         +3         +5\n    {bar}\n```\n"
    )
}

fn build_regime_section(run: &EngineRun) -> String {
    let regime = &run.regime;
    let mut section = format!("## Regime Score: {:.2}\n\n{}\n", regime.total, score_bar(regime.total));
    section.push_str(&format!(
        "**Assessment:** {}  \n**Conviction:** {}  \n**Recommended action:** {}\n\n### Score components\n\n",
        regime.assessment,
        regime.assessment.conviction(),
        regime.assessment.action(),
    ));

    for category in &regime.categories {
        match &category.result {
            SubScore::Scored {
                points,
                weighted,
                label,
            } => section.push_str(&format!(
                "- **{label}**: {points:+.2} (weighted {weighted:+.2})\n"
            )),
            SubScore::Unavailable { reason } => section.push_str(&format!(
                "- **{}**: input missing ({reason})\n",
                category.category
            )),
        }
    }

    section.push_str("\n---\n\n");
    section
}

fn zscore_note(run: &EngineRun) -> &'static str {
    match run.normalized.get(names::REAL_GOLD_PRICE) {
        Some(Normalized::Available(z)) => {
            if z.value > 1.5 {
                "significantly overvalued versus trailing average"
            } else if z.value > 1.0 {
                "moderately overvalued versus trailing average"
            } else if z.value < -1.0 {
                "undervalued versus trailing average"
            } else {
                "fair value range"
            }
        }
        _ => "insufficient history for z-score",
    }
}

fn build_metrics_section(run: &EngineRun) -> String {
    let ind = &run.indicators;
    let momentum = |series: &str, days: i64| ind.current(&names::momentum(series, days));
    let real_gold_z = run
        .normalized
        .get(names::REAL_GOLD_PRICE)
        .and_then(Normalized::value);

    format!(
        "## Key Metrics\n\n\
        ### Real interest rates\n\
        - **10Y real yield:** {real_yield}%\n\
        - **30-day change:** {ry_30}\n\
        - **90-day change:** {ry_90}\n\n\
        ### US dollar strength\n\
        - **Currency index:** {dxy}\n\
        - **30-day change:** {dxy_30}\n\
        - **90-day change:** {dxy_90}\n\n\
        ### Market sentiment\n\
        - **Volatility index:** {vix}\n\
        - **Geopolitical risk index:** {gpr}\n\n\
        ### Gold valuation\n\
        - **Spot price:** ${spot}\n\
        - **30-day return:** {spot_30}\n\
        - **Real gold price (CPI-adjusted):** ${real_gold}\n\
        - **Real gold z-score (5Y):** {z} (*{z_note}*)\n\
        - **Gold/equity ratio:** {ratio}\n\n\
        ### Investment flows\n\
        - **ETF shares outstanding:** {shares}\n\
        - **Breakeven inflation:** {breakeven}%\n\n\
        ---\n\n",
        real_yield = fmt_num(ind.current(names::REAL_YIELD), 2),
        ry_30 = fmt_pct(momentum(names::REAL_YIELD, 30)),
        ry_90 = fmt_pct(momentum(names::REAL_YIELD, 90)),
        dxy = fmt_num(ind.current(names::DXY), 2),
        dxy_30 = fmt_pct(momentum(names::DXY, 30)),
        dxy_90 = fmt_pct(momentum(names::DXY, 90)),
        vix = fmt_num(ind.current(names::VIX), 2),
        gpr = fmt_num(ind.current(names::GPR), 1),
        spot = fmt_num(ind.current(names::GOLD_SPOT), 2),
        spot_30 = fmt_pct(momentum(names::GOLD_SPOT, 30)),
        real_gold = fmt_num(ind.current(names::REAL_GOLD_PRICE), 2),
        z = fmt_num(real_gold_z, 2),
        z_note = zscore_note(run),
        ratio = fmt_num(ind.current(names::GOLD_SP_RATIO), 4),
        shares = fmt_num(ind.current(names::GLD_SHARES), 0),
        breakeven = fmt_num(ind.current(names::BREAKEVEN_INFLATION), 2),
    )
}

fn build_cb_section(run: &EngineRun) -> String {
    let cb = &run.cb;
    let tonnes = cb.record.net_tonnes;
    let interpretation = if tonnes > 250.0 {
        "strong structural buying"
    } else if tonnes > 100.0 {
        "moderate buying"
    } else if tonnes > 0.0 {
        "weak buying"
    } else {
        "net selling"
    };
    let staleness = if cb.is_stale {
        format!(
            "\n\n**Warning:** data is {} days old, check for a new quarterly report",
            cb.days_old
        )
    } else {
        String::new()
    };

    format!(
        "## Central Bank Activity\n\n\
        - **Latest quarter:** {quarter}\n\
        - **Net purchases:** {tonnes:.1} tonnes\n\
        - **Source:** {source}\n\
        - **Validated:** {validated} ({days} days before evaluation)\n\
        - **Interpretation:** {interpretation}{staleness}\n\n\
        ---\n\n",
        quarter = cb.record.quarter,
        source = cb.record.source,
        validated = cb.record.validated_date.format("%Y-%m-%d"),
        days = cb.days_old,
    )
}

fn build_quality_section(run: &EngineRun) -> String {
    let mut section = String::from("## Data Quality\n\n");
    if run.flags.is_empty() {
        section.push_str("No data-quality flags for this run.\n");
    } else {
        for flag in &run.flags {
            section.push_str(&format!("- {flag}\n"));
        }
    }
    section.push_str("\n---\n\n");
    section
}

fn build_footer() -> &'static str {
    "## Notes\n\n\
    - Generated for monthly position review; focus on sustained regime changes, not daily noise\n\
    - Z-scores use up to five years of trailing history\n\
    - Central bank data updates quarterly with a 45-60 day publication lag\n"
}
