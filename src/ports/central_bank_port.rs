//! Central-bank record store port trait.

use crate::domain::central_bank::CentralBankRecord;
use crate::domain::error::GoldmonError;

pub trait CentralBankPort {
    fn load_records(&self) -> Result<Vec<CentralBankRecord>, GoldmonError>;

    /// Append one quarterly record. Quarter labels are unique within the
    /// store; appending an existing quarter is an error.
    fn append_record(&self, record: &CentralBankRecord) -> Result<(), GoldmonError>;
}
