use anyhow::Context;
use bank_unify::utils::{logger, validation::Validate};
use bank_unify::{BankDefinition, BanksConfig, CliConfig, EtlEngine, LocalStorage};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting bank-unify");
    tracing::debug!("CLI config: {:?}", config);

    let banks_config = match BanksConfig::from_file(&config.config) {
        Ok(banks_config) => banks_config,
        Err(e) => {
            tracing::error!("Failed to load config file '{}': {}", config.config, e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = banks_config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let banks: Vec<BankDefinition> = banks_config
        .bank_definitions()
        .into_iter()
        .filter(|bank| {
            config.banks.is_empty()
                || config.banks.iter().any(|name| name.eq_ignore_ascii_case(&bank.name))
        })
        .collect();

    if config.list_banks {
        for bank in &banks {
            match bank.build() {
                Ok(profile) => println!("{}", serde_json::to_string(&profile.get_info())?),
                Err(e) => eprintln!("❌ {}", e),
            }
        }
        return Ok(());
    }

    let base_path = &banks_config.settings.banks_base_path;
    tracing::info!("Using banks base path: {}", base_path);

    let mut engine = EtlEngine::new(LocalStorage::new(base_path.clone()))
        .with_min_rows(banks_config.settings.min_rows);
    if let Some(output) = config.output.clone().or(banks_config.settings.output_path.clone()) {
        tracing::info!("Writing unified tables to: {}", output);
        engine = engine.with_sink(LocalStorage::new(output));
    }

    let summary = engine.run(&banks);
    summary.log_summary();

    if let Some(path) = &config.summary_json {
        std::fs::write(path, summary.to_json()?)
            .with_context(|| format!("writing run summary to {}", path))?;
    }

    if summary.failed() > 0 {
        std::process::exit(2);
    }

    Ok(())
}
