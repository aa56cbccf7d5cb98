//! CSV append-only run history.
//!
//! One row per run keyed by evaluation date, with a fixed column schema:
//! date, total score, assessment, then one column per known indicator.
//! Indicators that were not computed stay as empty cells; an empty cell
//! means "not computed", never zero. Rows are only ever appended.

use crate::domain::engine::EngineRun;
use crate::domain::error::GoldmonError;
use crate::domain::indicator::names;
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub struct CsvHistoryAdapter {
    path: PathBuf,
}

impl CsvHistoryAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Indicator columns in schema order.
    fn indicator_columns() -> Vec<String> {
        let mut columns: Vec<String> = [
            names::REAL_YIELD,
            names::NOMINAL_YIELD,
            names::DXY,
            names::GOLD_SPOT,
            names::SP500,
            names::CPI,
            names::VIX,
            names::GPR,
            names::GLD_SHARES,
            names::REAL_GOLD_PRICE,
            names::GOLD_SP_RATIO,
            names::BREAKEVEN_INFLATION,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        for series in [
            names::REAL_YIELD,
            names::DXY,
            names::GOLD_SPOT,
            names::VIX,
            names::GPR,
        ] {
            for days in [30, 60, 90] {
                columns.push(names::momentum(series, days));
            }
        }
        columns
    }

    fn header() -> String {
        let mut fields = vec!["evaluation_date".to_string(), "regime_score".to_string(),
            "assessment".to_string()];
        fields.extend(Self::indicator_columns());
        fields.join(",")
    }
}

impl HistoryPort for CsvHistoryAdapter {
    fn append_run(&self, run: &EngineRun) -> Result<(), GoldmonError> {
        let new_file = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| GoldmonError::Store {
                reason: format!("failed to open {}: {}", self.path.display(), e),
            })?;

        let mut fields = vec![
            run.evaluation_date.format("%Y-%m-%d").to_string(),
            format!("{}", run.regime.total),
            run.regime.assessment.to_string(),
        ];
        for column in Self::indicator_columns() {
            fields.push(
                run.indicators
                    .current(&column)
                    .map(|v| format!("{v}"))
                    .unwrap_or_default(),
            );
        }

        let mut line = String::new();
        if new_file {
            line.push_str(&Self::header());
            line.push('\n');
        }
        line.push_str(&fields.join(","));
        line.push('\n');

        file.write_all(line.as_bytes())
            .map_err(|e| GoldmonError::Store {
                reason: format!("failed to append to {}: {}", self.path.display(), e),
            })
    }

    fn run_dates(&self) -> Result<Vec<NaiveDate>, GoldmonError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| GoldmonError::Store {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut dates = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| GoldmonError::Store {
                reason: format!("CSV parse error in history: {e}"),
            })?;
            let date_str = record.get(0).ok_or_else(|| GoldmonError::Store {
                reason: "history: missing evaluation_date column".to_string(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                GoldmonError::Store {
                    reason: format!("history: invalid evaluation_date: {e}"),
                }
            })?;
            dates.push(date);
        }
        Ok(dates)
    }
}
