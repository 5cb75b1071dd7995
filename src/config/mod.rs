pub mod banks_config;
pub mod builtin;
pub mod cli;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "bank-unify")]
#[command(about = "Normalize bank statement CSV exports into one unified transaction table")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "banks.toml")]
    pub config: String,

    /// Only process these banks (repeatable)
    #[arg(short, long = "bank")]
    pub banks: Vec<String>,

    /// Override settings.output_path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub summary_json: Option<String>,

    /// Print each valid bank profile and exit
    #[arg(long)]
    pub list_banks: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
