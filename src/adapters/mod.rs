//! Concrete adapter implementations of the port traits.

pub mod csv_data_adapter;
pub mod csv_central_bank_adapter;
pub mod csv_history_adapter;
pub mod file_config_adapter;
pub mod markdown_report_adapter;
pub mod template_narrative_adapter;
