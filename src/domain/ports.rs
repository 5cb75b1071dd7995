use crate::domain::model::{RawTable, UnifiedTable};
use crate::utils::error::Result;

pub trait Storage {
    fn exists(&self, path: &str) -> bool;
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// One bank's run: load the raw export, turn it into the unified table, hand it off.
pub trait Pipeline {
    fn extract(&self) -> Result<RawTable>;
    fn transform(&self, raw: RawTable) -> Result<UnifiedTable>;
    /// Returns where the table was written, if anywhere.
    fn load(&self, unified: &UnifiedTable) -> Result<Option<String>>;
}
