//! Data-quality flags attached to a successful run.
//!
//! A flagged gap is a data-quality event, not a neutral signal; the
//! consumer decides whether a flagged result is acceptable to publish.

use crate::domain::scoring::Category;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum QualityFlag {
    /// A raw series was absent or too short to compute an indicator.
    IndicatorOmitted { name: String, reason: String },
    /// Fewer than the minimum observations for a z-score window.
    InsufficientHistory { name: String, observations: usize },
    /// Zero variance inside a z-score window.
    DegenerateSeries { name: String },
    /// A scoring category contributed zero because its input was missing.
    CategoryInputMissing { category: Category },
    /// The latest central-bank record is older than the staleness threshold.
    StaleCentralBankData { days_old: i64 },
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityFlag::IndicatorOmitted { name, reason } => {
                write!(f, "indicator {name} omitted: {reason}")
            }
            QualityFlag::InsufficientHistory { name, observations } => {
                write!(f, "{name}: insufficient history for z-score ({observations} observations)")
            }
            QualityFlag::DegenerateSeries { name } => {
                write!(f, "{name}: zero variance in z-score window")
            }
            QualityFlag::CategoryInputMissing { category } => {
                write!(f, "score category {category} input missing, contributed 0")
            }
            QualityFlag::StaleCentralBankData { days_old } => {
                write!(f, "central bank data is {days_old} days old")
            }
        }
    }
}
