pub mod etl;
pub mod loader;
pub mod pipeline;
pub mod profile;
pub mod reconcile;
pub mod unify;
pub mod values;

pub use crate::domain::model::{RawTable, UnifiedTable};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
