//! Report generation port trait.

use crate::domain::engine::EngineRun;
use crate::domain::error::GoldmonError;
use std::path::Path;

pub trait ReportPort {
    fn write(
        &self,
        run: &EngineRun,
        narrative: &str,
        output_path: &Path,
    ) -> Result<(), GoldmonError>;
}
