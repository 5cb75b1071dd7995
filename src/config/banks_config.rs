use crate::config::builtin::builtin_definitions;
use crate::core::profile::BankDefinition;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_min_rows() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanksConfig {
    pub settings: Settings,
    #[serde(default)]
    pub banks: Vec<BankDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Each bank's export is read from `<banks_base_path>/<bank name>/<csv_filename>`.
    pub banks_base_path: String,
    /// Loaded tables with fewer data rows fail. `0` disables the check.
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
    pub output_path: Option<String>,
}

impl BanksConfig {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` references with environment values; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Declared banks, or the built-in set when the file declares none.
    pub fn bank_definitions(&self) -> Vec<BankDefinition> {
        if self.banks.is_empty() {
            builtin_definitions()
        } else {
            self.banks.clone()
        }
    }
}

impl Validate for BanksConfig {
    fn validate(&self) -> Result<()> {
        validate_path("settings.banks_base_path", &self.settings.banks_base_path)?;

        if let Some(output_path) = &self.settings.output_path {
            validate_path("settings.output_path", output_path)?;
        }

        for (i, bank) in self.banks.iter().enumerate() {
            validate_non_empty_string(&format!("banks[{}].name", i), &bank.name)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_banks_config() {
        let toml_content = r#"
[settings]
banks_base_path = "/data/banks"
output_path = "./unified"

[[banks]]
name = "Abanca"
csv_encoding = "utf-8"
csv_delimiter = ";"
header_map = [
  { header = "Fecha ctble", column = "date" },
  { header = "Importe", column = "amount" },
  { header = "Concepto", column = "description" },
  { header = "Concepto ampliado", column = "description" },
]
"#;

        let config = BanksConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.settings.banks_base_path, "/data/banks");
        assert_eq!(config.settings.min_rows, 5);
        assert_eq!(config.banks.len(), 1);

        let bank = &config.banks[0];
        assert_eq!(bank.csv_filename, "importar.csv");
        assert_eq!(bank.csv_header_row, 0);
        let headers: Vec<&str> = bank.header_map.iter().map(|m| m.header.as_str()).collect();
        assert_eq!(
            headers,
            vec!["Fecha ctble", "Importe", "Concepto", "Concepto ampliado"]
        );
        assert!(bank.build().is_ok());
    }

    #[test]
    fn test_invalid_bank_does_not_fail_config_loading() {
        let toml_content = r#"
[settings]
banks_base_path = "/data/banks"

[[banks]]
name = "Broken"
csv_encoding = "utf-16"
csv_header_row = -2
"#;

        let config = BanksConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.banks[0].build().is_err());
    }

    #[test]
    fn test_builtin_banks_when_none_declared() {
        let config = BanksConfig::from_toml_str("[settings]\nbanks_base_path = \"/data\"\n").unwrap();
        let names: Vec<String> = config.bank_definitions().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["N26", "Abanca", "DB"]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BANK_UNIFY_TEST_DIR", "/mnt/statements");

        let config = BanksConfig::from_toml_str(
            "[settings]\nbanks_base_path = \"${BANK_UNIFY_TEST_DIR}\"\nmin_rows = 0\n",
        )
        .unwrap();
        assert_eq!(config.settings.banks_base_path, "/mnt/statements");
        assert_eq!(config.settings.min_rows, 0);

        std::env::remove_var("BANK_UNIFY_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = BanksConfig::from_toml_str("[settings]\nbanks_base_path = \"\"\n").unwrap();
        assert!(config.validate().is_err());

        assert!(BanksConfig::from_toml_str("[banks]\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[settings]\nbanks_base_path = \"./banks\"\n")
            .unwrap();

        let config = BanksConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.settings.banks_base_path, "./banks");
        assert!(config.settings.output_path.is_none());
    }
}
