//! Market data access port trait.
//!
//! The retrieval collaborator owns network calls, retries and rate limits;
//! the engine only ever sees resolved series through this trait.

use crate::domain::error::GoldmonError;
use crate::domain::series::RawSeries;
use chrono::NaiveDate;

pub trait MarketDataPort {
    fn fetch_series(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RawSeries, GoldmonError>;

    fn list_series(&self) -> Result<Vec<String>, GoldmonError>;

    fn data_range(
        &self,
        name: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GoldmonError>;
}
