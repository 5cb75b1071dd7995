use crate::core::pipeline::BankPipeline;
use crate::core::profile::BankDefinition;
use crate::core::{Pipeline, Storage, UnifiedTable};
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BankStatus {
    Success {
        rows: usize,
        output: Option<String>,
        #[serde(skip)]
        table: UnifiedTable,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct BankOutcome {
    pub bank: String,
    #[serde(flatten)]
    pub status: BankStatus,
}

impl BankOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, BankStatus::Success { .. })
    }

    pub fn table(&self) -> Option<&UnifiedTable> {
        match &self.status {
            BankStatus::Success { table, .. } => Some(table),
            BankStatus::Failed { .. } => None,
        }
    }
}

/// Per-bank results of one run, in processing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<BankOutcome>,
}

impl RunSummary {
    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.successful()
    }

    pub fn outcome(&self, bank: &str) -> Option<&BankOutcome> {
        self.outcomes.iter().find(|o| o.bank == bank)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn log_summary(&self) {
        let names = |success: bool| {
            self.outcomes
                .iter()
                .filter(|o| o.is_success() == success)
                .map(|o| o.bank.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        tracing::info!("{}", "=".repeat(50));
        tracing::info!("PROCESSING SUMMARY");
        tracing::info!("{}", "=".repeat(50));
        if self.successful() > 0 {
            tracing::info!("Successfully processed: {}", names(true));
        }
        if self.failed() > 0 {
            tracing::error!("Failed to process: {}", names(false));
        }
        tracing::info!(
            "Total: {} banks, {} successful, {} failed",
            self.outcomes.len(),
            self.successful(),
            self.failed()
        );
    }
}

/// Runs every bank independently; one bank's failure never stops the others.
pub struct EtlEngine<S: Storage> {
    source: S,
    sink: Option<S>,
    min_rows: usize,
}

impl<S: Storage> EtlEngine<S> {
    /// `source` resolves `<bank>/<csv_filename>` paths.
    pub fn new(source: S) -> Self {
        Self {
            source,
            sink: None,
            min_rows: 0,
        }
    }

    pub fn with_sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    pub fn run(&self, banks: &[BankDefinition]) -> RunSummary {
        let mut summary = RunSummary::default();

        for definition in banks {
            tracing::info!("Processing bank: {}", definition.name);
            tracing::info!("{}", "=".repeat(30));

            let status = match self.run_bank(definition) {
                Ok((table, output)) => BankStatus::Success {
                    rows: table.row_count(),
                    output,
                    table,
                },
                Err(e) => {
                    tracing::error!(
                        "{} failed: {} (severity: {:?})",
                        definition.name,
                        e,
                        e.severity()
                    );
                    tracing::error!("Suggestion: {}", e.recovery_suggestion());
                    BankStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            summary.outcomes.push(BankOutcome {
                bank: definition.name.clone(),
                status,
            });
        }

        summary
    }

    fn run_bank(&self, definition: &BankDefinition) -> Result<(UnifiedTable, Option<String>)> {
        let profile = definition.build()?;

        let mut pipeline = BankPipeline::new(&profile, &self.source).with_min_rows(self.min_rows);
        if let Some(sink) = &self.sink {
            pipeline = pipeline.with_sink(sink);
        }

        run_pipeline(&pipeline)
    }
}

pub fn run_pipeline<P: Pipeline>(pipeline: &P) -> Result<(UnifiedTable, Option<String>)> {
    let raw = pipeline.extract()?;
    tracing::debug!("Extracted {} rows", raw.row_count());

    let unified = pipeline.transform(raw)?;
    let output = pipeline.load(&unified)?;
    if let Some(path) = &output {
        tracing::info!("Output saved to: {}", path);
    }

    Ok((unified, output))
}
