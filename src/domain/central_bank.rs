//! Manually curated central-bank purchase records.
//!
//! One record per quarter, entered by hand from the quarterly demand
//! reports. Net tonnes are signed: negative means net selling.

use crate::domain::error::GoldmonError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct CentralBankRecord {
    /// Quarter label, e.g. `Q1_2025`. Unique within the store.
    pub quarter: String,
    pub net_tonnes: f64,
    pub source: String,
    pub validated_date: NaiveDate,
}

impl CentralBankRecord {
    /// Age of the record relative to an evaluation date, in days.
    pub fn age_days(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.validated_date).num_days()
    }
}

/// Validate a quarter label of the form `Q<1-4>_<year>`.
pub fn validate_quarter_label(label: &str) -> Result<(), GoldmonError> {
    let invalid = || GoldmonError::InvalidQuarter {
        label: label.to_string(),
    };

    let bytes = label.as_bytes();
    if bytes.len() != 7 || bytes[0] != b'Q' || bytes[2] != b'_' {
        return Err(invalid());
    }
    if !(b'1'..=b'4').contains(&bytes[1]) {
        return Err(invalid());
    }
    if !bytes[3..].iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    Ok(())
}

/// The latest record judged against the evaluation date.
#[derive(Debug, Clone, PartialEq)]
pub struct CbAssessment {
    pub record: CentralBankRecord,
    pub days_old: i64,
    pub is_stale: bool,
}

/// Pick the most recently validated record and judge its freshness.
///
/// An empty store is the one hard failure of the scoring stage: there is no
/// zero-input default distinguishable from "no buying".
pub fn assess_latest(
    records: &[CentralBankRecord],
    eval: NaiveDate,
    staleness_days: i64,
) -> Result<CbAssessment, GoldmonError> {
    let latest = records
        .iter()
        .max_by_key(|r| r.validated_date)
        .ok_or(GoldmonError::MissingCentralBankData)?;

    let days_old = latest.age_days(eval);
    Ok(CbAssessment {
        record: latest.clone(),
        days_old,
        is_stale: days_old > staleness_days,
    })
}
