//! CSV market-data adapter.
//!
//! One file per series under a base directory: `<name>.csv` with
//! `date,value` rows. This is the offline stand-in for the HTTP retrieval
//! collaborator; files are produced by whatever downloads the data.

use crate::domain::error::GoldmonError;
use crate::domain::series::{Observation, RawSeries};
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn series_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{name}.csv"))
    }

    fn read_observations(&self, name: &str) -> Result<Vec<Observation>, GoldmonError> {
        let path = self.series_path(name);
        let content = fs::read_to_string(&path).map_err(|e| GoldmonError::Store {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut observations = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| GoldmonError::Store {
                reason: format!("CSV parse error in {name}: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| GoldmonError::Store {
                reason: format!("{name}: missing date column"),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                GoldmonError::Store {
                    reason: format!("{name}: invalid date format: {e}"),
                }
            })?;

            let value: f64 = record
                .get(1)
                .ok_or_else(|| GoldmonError::Store {
                    reason: format!("{name}: missing value column"),
                })?
                .parse()
                .map_err(|e| GoldmonError::Store {
                    reason: format!("{name}: invalid value: {e}"),
                })?;

            observations.push(Observation { date, value });
        }

        Ok(observations)
    }
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_series(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RawSeries, GoldmonError> {
        let observations = self
            .read_observations(name)?
            .into_iter()
            .filter(|o| o.date >= start_date && o.date <= end_date)
            .collect();
        Ok(RawSeries::new(name, observations))
    }

    fn list_series(&self) -> Result<Vec<String>, GoldmonError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| GoldmonError::Store {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GoldmonError::Store {
                reason: format!("directory entry error: {e}"),
            })?;
            let file_name = entry.file_name();
            let name_str = file_name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    fn data_range(
        &self,
        name: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GoldmonError> {
        if !self.series_path(name).exists() {
            return Ok(None);
        }
        let observations = self.read_observations(name)?;
        let min = observations.iter().map(|o| o.date).min();
        let max = observations.iter().map(|o| o.date).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((min, max, observations.len()))),
            _ => Ok(None),
        }
    }
}
