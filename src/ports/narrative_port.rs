//! Narrative synthesis port trait.
//!
//! A synthesis source may fail (remote model, quota, network); callers fall
//! back to the templated adapter, which never fails.

use crate::domain::engine::EngineRun;
use crate::domain::error::GoldmonError;

pub trait NarrativePort {
    fn synthesize(&self, run: &EngineRun) -> Result<String, GoldmonError>;
}
