pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{banks_config::BanksConfig, builtin::builtin_definitions, cli::LocalStorage};
pub use crate::core::{
    etl::{BankOutcome, BankStatus, EtlEngine, RunSummary},
    profile::{BankDefinition, BankDialect, BankInfo, BankProfile, CsvDelimiter, CsvEncoding},
    reconcile::{reconcile, HeaderReport},
    unify::unify,
};
pub use domain::model::{RawTable, UnifiedTable};
pub use domain::vocabulary::{all_columns, mandatory_columns, ColumnSpec, Concept, SemanticType};
pub use utils::error::{EtlError, Result};
