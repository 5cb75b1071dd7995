use anyhow::Result;
use bank_unify::{BankStatus, BanksConfig, Concept, EtlEngine, LocalStorage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_bank_file(base: &Path, bank: &str, filename: &str, data: &[u8]) -> Result<()> {
    let dir = base.join(bank);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(filename), data)?;
    Ok(())
}

fn config_for(base: &Path, banks: &str) -> Result<BanksConfig> {
    let normalized_path = base.to_str().unwrap().replace('\\', "/");
    let content = format!(
        "[settings]\nbanks_base_path = \"{}\"\nmin_rows = 2\n\n{}",
        normalized_path, banks
    );
    Ok(BanksConfig::from_toml_str(&content)?)
}

const BANKS: &str = r#"
[[banks]]
name = "Abanca"
csv_delimiter = ";"
header_map = [
  { header = "Fecha ctble", column = "date" },
  { header = "Importe", column = "amount" },
  { header = "Concepto", column = "description" },
  { header = "Concepto ampliado", column = "description" },
  { header = "Saldo", column = "balance" },
]

[[banks]]
name = "Broken"
csv_encoding = "ebcdic"
header_map = [
  { header = "Date", column = "date" },
]

[[banks]]
name = "Missing"
header_map = [
  { header = "Date", column = "date" },
  { header = "Amount", column = "amount" },
  { header = "Text", column = "description" },
]

[[banks]]
name = "Conflicting"
csv_header_row = 1
csv_last_row = -1
header_map = [
  { header = "Date", column = "date" },
  { header = "Amount", column = "amount" },
  { header = "Debit", column = "amount" },
  { header = "Text", column = "description" },
]
"#;

#[test]
fn test_run_isolates_failing_banks() -> Result<()> {
    let base = TempDir::new()?;
    let output = TempDir::new()?;

    write_bank_file(
        base.path(),
        "Abanca",
        "importar.csv",
        "Fecha ctble;Concepto;Importe;Saldo;Concepto ampliado;Moneda\n\
         01/03/2024;Pago;-12,50;987,50;Tienda X;EUR\n\
         02/03/2024;Nómina;1.500,00;2.487,50;;EUR\n"
            .as_bytes(),
    )?;
    write_bank_file(
        base.path(),
        "Conflicting",
        "importar.csv",
        b"Statement export\nDate,Amount,Debit,Text\n01.03.2024,-5.00,-5.00,a\n02.03.2024,-7.00,-8.00,b\nClosing balance,,,\n",
    )?;

    let config = config_for(base.path(), BANKS)?;
    let engine = EtlEngine::new(LocalStorage::new(config.settings.banks_base_path.clone()))
        .with_min_rows(config.settings.min_rows)
        .with_sink(LocalStorage::new(output.path().to_str().unwrap().to_string()));

    let summary = engine.run(&config.bank_definitions());

    assert_eq!(summary.outcomes.len(), 4);
    assert_eq!(summary.successful(), 1);
    assert_eq!(summary.failed(), 3);

    let abanca = summary.outcome("Abanca").unwrap();
    let table = abanca.table().unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.column(Concept::Description).unwrap(),
        vec!["Pago | Tienda X", "Nómina"]
    );
    assert_eq!(table.column(Concept::Balance).unwrap(), vec!["987,50", "2.487,50"]);

    let written = fs::read_to_string(output.path().join("Abanca_unified.csv"))?;
    assert!(written.starts_with(
        "Bank,Date,Amount,TransactionType,IBAN,Origin,Description,InfoExtended,Reference,Balance\n"
    ));
    assert!(written.contains("Abanca,01/03/2024,\"-12,50\""));

    let reason = |bank: &str| match &summary.outcome(bank).unwrap().status {
        BankStatus::Failed { reason } => reason.clone(),
        other => panic!("{} should have failed, got {:?}", bank, other),
    };
    assert!(reason("Broken").contains("encoding"));
    assert!(reason("Broken").contains("Amount"));
    assert!(reason("Missing").contains("not found"));
    assert!(reason("Conflicting").contains("row 1"));
    assert!(!output.path().join("Conflicting_unified.csv").exists());

    Ok(())
}

#[test]
fn test_row_count_policy() -> Result<()> {
    let base = TempDir::new()?;
    write_bank_file(
        base.path(),
        "Missing",
        "importar.csv",
        b"Date,Amount,Text\n01.03.2024,1.00,a\n",
    )?;

    let config = config_for(base.path(), BANKS)?;
    let missing: Vec<_> = config
        .bank_definitions()
        .into_iter()
        .filter(|b| b.name == "Missing")
        .collect();

    let strict = EtlEngine::new(LocalStorage::new(config.settings.banks_base_path.clone()))
        .with_min_rows(2)
        .run(&missing);
    assert_eq!(strict.failed(), 1);

    let lenient = EtlEngine::new(LocalStorage::new(config.settings.banks_base_path.clone()))
        .run(&missing);
    assert_eq!(lenient.successful(), 1);
    assert_eq!(lenient.outcomes[0].table().unwrap().row_count(), 1);

    Ok(())
}

#[test]
fn test_builtin_deutsche_bank_export() -> Result<()> {
    let base = TempDir::new()?;

    let mut data = Vec::new();
    data.extend_from_slice(b"Kontoums\xE4tze Girokonto\n");
    data.extend_from_slice(b"Konto;DE00 0000\n");
    data.extend_from_slice(b"Zeitraum;01.03.2024 - 31.03.2024\n");
    data.extend_from_slice(b"Kontostand;1.000,00 EUR\n");
    data.extend_from_slice(
        b"Buchungstag;Wert;Umsatzart;Beg\xFCnstigter / Auftraggeber;Verwendungszweck;IBAN;BIC;Kundenreferenz;Mandatsreferenz ;Gl\xE4ubiger ID;Fremde Geb\xFChren;Betrag;Abweichender Empf\xE4nger;Abweichender Auftraggeber;Anzahl der Auftr\xE4ge;Anzahl der Schecks;Soll;Haben;W\xE4hrung\n",
    );
    data.extend_from_slice(
        b"04.03.2024;04.03.2024;Lastschrift;Stadtwerke;Strom M\xE4rz;DE11 1111;BICXXX;KR-1;MR-9;;;;;;;;-80,00;;EUR\n",
    );
    data.extend_from_slice(
        b"05.03.2024;05.03.2024;Gutschrift;Arbeitgeber GmbH;Gehalt;DE22 2222;BICYYY;;;;;2.500,00;;;;;;2.500,00;EUR\n",
    );
    data.extend_from_slice(b"Kontostand;31.03.2024;;;;;;;;;;;;;;;;;3.420,00\n");
    write_bank_file(base.path(), "DB", "importar.csv", &data)?;

    let config = config_for(base.path(), "")?;
    let banks: Vec<_> = config
        .bank_definitions()
        .into_iter()
        .filter(|b| b.name == "DB")
        .collect();

    let summary = EtlEngine::new(LocalStorage::new(config.settings.banks_base_path.clone()))
        .with_min_rows(config.settings.min_rows)
        .run(&banks);

    let table = summary.outcome("DB").unwrap().table().expect("DB should succeed");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column(Concept::Amount).unwrap(), vec!["-80,00", "2.500,00"]);
    assert_eq!(
        table.column(Concept::Origin).unwrap(),
        vec!["Stadtwerke", "Arbeitgeber GmbH"]
    );
    assert_eq!(table.column(Concept::Description).unwrap(), vec!["Strom März", "Gehalt"]);
    assert_eq!(table.column(Concept::InfoExtended).unwrap(), vec!["BICXXX | KR-1", "BICYYY"]);
    assert_eq!(table.column(Concept::Reference).unwrap(), vec!["MR-9", ""]);

    Ok(())
}
