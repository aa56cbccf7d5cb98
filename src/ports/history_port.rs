//! Historical run log port trait.
//!
//! The log is append-only: one immutable row per run keyed by evaluation
//! date, never rewritten.

use crate::domain::engine::EngineRun;
use crate::domain::error::GoldmonError;
use chrono::NaiveDate;

pub trait HistoryPort {
    fn append_run(&self, run: &EngineRun) -> Result<(), GoldmonError>;

    fn run_dates(&self) -> Result<Vec<NaiveDate>, GoldmonError>;
}
