use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Case-insensitive check that `file` ends with one of `allowed_extensions`.
pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let lowered = file.trim().to_ascii_lowercase();
    if allowed_extensions
        .iter()
        .any(|ext| lowered.ends_with(&format!(".{}", ext.to_ascii_lowercase())))
    {
        return Ok(());
    }

    Err(EtlError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: file.to_string(),
        reason: format!(
            "File must end with one of: {}",
            allowed_extensions
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    })
}

/// Fails when a loaded table holds fewer than `min_rows` data rows. `0` disables the check.
pub fn validate_row_count(bank: &str, rows: usize, min_rows: usize) -> Result<()> {
    if rows < min_rows {
        return Err(EtlError::ValidationError {
            message: format!(
                "CSV file for {} has only {} rows. Minimum required: {} rows",
                bank, rows, min_rows
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("settings.banks_base_path", "/data/banks").is_ok());
        assert!(validate_path("settings.banks_base_path", "").is_err());
        assert!(validate_path("settings.banks_base_path", "a\0b").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("csv_filename", "importar.csv", &["csv"]).is_ok());
        assert!(validate_file_extension("csv_filename", "IMPORTAR.CSV", &["csv"]).is_ok());
        assert!(validate_file_extension("csv_filename", "importar.txt", &["csv"]).is_err());
        assert!(validate_file_extension("csv_filename", "importar", &["csv"]).is_err());
        assert!(validate_file_extension("csv_filename", "", &["csv"]).is_err());
        assert!(validate_file_extension("csv_filename", ".csv", &["csv"]).is_ok());
        assert!(validate_file_extension("csv_filename", "export.csv.bak", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_row_count() {
        assert!(validate_row_count("N26", 5, 5).is_ok());
        assert!(validate_row_count("N26", 0, 0).is_ok());

        let err = validate_row_count("N26", 3, 5).unwrap_err();
        assert!(err.to_string().contains("only 3 rows"));
    }
}
