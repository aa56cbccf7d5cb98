//! CSV central-bank record store.
//!
//! Backing file format (maintained by hand from quarterly demand reports):
//!
//! ```text
//! quarter,net_tonnes,source,validated_date
//! Q4_2024,290.0,WGC,2025-02-20
//! ```
//!
//! A missing or empty file is an empty store, not an error; the engine
//! decides that an empty store is unscoreable.

use crate::domain::central_bank::{CentralBankRecord, validate_quarter_label};
use crate::domain::error::GoldmonError;
use crate::ports::central_bank_port::CentralBankPort;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

const HEADER: &str = "quarter,net_tonnes,source,validated_date";

pub struct CsvCentralBankAdapter {
    path: PathBuf,
}

impl CsvCentralBankAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CentralBankPort for CsvCentralBankAdapter {
    fn load_records(&self) -> Result<Vec<CentralBankRecord>, GoldmonError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| GoldmonError::Store {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut records = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| GoldmonError::Store {
                reason: format!("CSV parse error in central bank store: {e}"),
            })?;

            let field = |idx: usize, name: &str| -> Result<String, GoldmonError> {
                record
                    .get(idx)
                    .map(str::to_string)
                    .ok_or_else(|| GoldmonError::Store {
                        reason: format!("central bank store: missing {name} column"),
                    })
            };

            let quarter = field(0, "quarter")?;
            let net_tonnes: f64 =
                field(1, "net_tonnes")?
                    .parse()
                    .map_err(|e| GoldmonError::Store {
                        reason: format!("central bank store: invalid net_tonnes: {e}"),
                    })?;
            let source = field(2, "source")?;
            let validated_date =
                chrono::NaiveDate::parse_from_str(&field(3, "validated_date")?, "%Y-%m-%d")
                    .map_err(|e| GoldmonError::Store {
                        reason: format!("central bank store: invalid validated_date: {e}"),
                    })?;

            records.push(CentralBankRecord {
                quarter,
                net_tonnes,
                source,
                validated_date,
            });
        }

        Ok(records)
    }

    fn append_record(&self, record: &CentralBankRecord) -> Result<(), GoldmonError> {
        validate_quarter_label(&record.quarter)?;

        let existing = self.load_records()?;
        if existing.iter().any(|r| r.quarter == record.quarter) {
            return Err(GoldmonError::DuplicateQuarter {
                quarter: record.quarter.clone(),
            });
        }

        let new_file = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| GoldmonError::Store {
                reason: format!("failed to open {}: {}", self.path.display(), e),
            })?;

        let mut line = String::new();
        if new_file {
            line.push_str(HEADER);
            line.push('\n');
        }
        line.push_str(&format!(
            "{},{},{},{}\n",
            record.quarter,
            record.net_tonnes,
            record.source,
            record.validated_date.format("%Y-%m-%d"),
        ));

        file.write_all(line.as_bytes())
            .map_err(|e| GoldmonError::Store {
                reason: format!("failed to append to {}: {}", self.path.display(), e),
            })
    }
}
