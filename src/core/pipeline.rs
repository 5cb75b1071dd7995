use crate::core::loader::load_raw_table;
use crate::core::profile::BankProfile;
use crate::core::reconcile::reconcile;
use crate::core::unify::unify;
use crate::core::{Pipeline, RawTable, Storage, UnifiedTable};
use crate::utils::error::Result;
use crate::utils::validation::validate_row_count;

/// Runs one bank's export through load, header check and unification.
pub struct BankPipeline<'a, S: Storage> {
    profile: &'a BankProfile,
    source: &'a S,
    sink: Option<&'a S>,
    min_rows: usize,
}

impl<'a, S: Storage> BankPipeline<'a, S> {
    pub fn new(profile: &'a BankProfile, source: &'a S) -> Self {
        Self {
            profile,
            source,
            sink: None,
            min_rows: 0,
        }
    }

    /// Write unified tables to `sink` as `<bank>_unified.csv`.
    pub fn with_sink(mut self, sink: &'a S) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    pub fn output_filename(&self) -> String {
        format!("{}_unified.csv", self.profile.name())
    }
}

impl<S: Storage> Pipeline for BankPipeline<'_, S> {
    fn extract(&self) -> Result<RawTable> {
        let raw = load_raw_table(self.source, self.profile.dialect())?;
        raw.log_info(self.profile.name());
        Ok(raw)
    }

    fn transform(&self, raw: RawTable) -> Result<UnifiedTable> {
        validate_row_count(self.profile.name(), raw.row_count(), self.min_rows)?;

        let report = reconcile(&raw.headers, self.profile);
        tracing::debug!(
            "{}: {} unmatched, {} unused headers",
            self.profile.name(),
            report.unmatched.len(),
            report.unused.len()
        );

        let unified = unify(&raw, self.profile)?;
        tracing::debug!(
            "{}: unified {} rows into {:?}",
            self.profile.name(),
            unified.row_count(),
            unified.column_names()
        );
        Ok(unified)
    }

    fn load(&self, unified: &UnifiedTable) -> Result<Option<String>> {
        let Some(sink) = self.sink else {
            return Ok(None);
        };

        let filename = self.output_filename();
        let data = unified.to_csv_bytes()?;
        tracing::debug!("Writing {} ({} bytes)", filename, data.len());
        sink.write_file(&filename, &data)?;
        Ok(Some(filename))
    }
}
