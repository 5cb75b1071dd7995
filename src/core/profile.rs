//! Per-bank CSV dialect and header mapping, validated once at construction.

use crate::domain::model::normalize_header;
use crate::domain::vocabulary::{mandatory_columns, ColumnSpec};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::validate_file_extension;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CsvEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "cp1252")]
    Cp1252,
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,
}

impl CsvEncoding {
    pub const OPTIONS: [&'static str; 3] = ["utf-8", "cp1252", "iso-8859-1"];

    pub fn label(&self) -> &'static str {
        match self {
            CsvEncoding::Utf8 => "utf-8",
            CsvEncoding::Cp1252 => "cp1252",
            CsvEncoding::Iso8859_1 => "iso-8859-1",
        }
    }
}

impl fmt::Display for CsvEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CsvEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "utf-8" => Ok(CsvEncoding::Utf8),
            "cp1252" => Ok(CsvEncoding::Cp1252),
            "iso-8859-1" => Ok(CsvEncoding::Iso8859_1),
            _ => Err(format!(
                "invalid encoding '{}'. Available options: {:?}",
                s,
                CsvEncoding::OPTIONS
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CsvDelimiter {
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = ",")]
    Comma,
}

impl CsvDelimiter {
    pub const OPTIONS: [&'static str; 2] = [";", ","];

    pub fn as_byte(&self) -> u8 {
        match self {
            CsvDelimiter::Semicolon => b';',
            CsvDelimiter::Comma => b',',
        }
    }
}

impl fmt::Display for CsvDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CsvDelimiter::Semicolon => ";",
            CsvDelimiter::Comma => ",",
        })
    }
}

impl FromStr for CsvDelimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            ";" => Ok(CsvDelimiter::Semicolon),
            "," => Ok(CsvDelimiter::Comma),
            _ => Err(format!(
                "invalid delimiter '{}'. Available options: {:?}",
                s,
                CsvDelimiter::OPTIONS
            )),
        }
    }
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_filename() -> String {
    "importar.csv".to_string()
}

/// One `header -> column` entry of a bank declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMapping {
    pub header: String,
    pub column: String,
}

/// A bank as declared in configuration, before any validation.
///
/// Field names follow the configuration file; [`BankDefinition::build`] turns
/// it into a [`BankProfile`] or reports every violated rule at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_encoding")]
    pub csv_encoding: String,
    #[serde(default = "default_delimiter")]
    pub csv_delimiter: String,
    #[serde(default)]
    pub csv_header_row: i64,
    #[serde(default)]
    pub csv_last_row: i64,
    #[serde(default = "default_filename")]
    pub csv_filename: String,
    #[serde(default)]
    pub header_map: Vec<HeaderMapping>,
}

impl BankDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            csv_encoding: default_encoding(),
            csv_delimiter: default_delimiter(),
            csv_header_row: 0,
            csv_last_row: 0,
            csv_filename: default_filename(),
            header_map: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn encoding(mut self, encoding: &str) -> Self {
        self.csv_encoding = encoding.to_string();
        self
    }

    pub fn delimiter(mut self, delimiter: &str) -> Self {
        self.csv_delimiter = delimiter.to_string();
        self
    }

    pub fn header_row(mut self, row: i64) -> Self {
        self.csv_header_row = row;
        self
    }

    pub fn last_row(mut self, row: i64) -> Self {
        self.csv_last_row = row;
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.csv_filename = filename.to_string();
        self
    }

    pub fn map(mut self, header: &str, column: &str) -> Self {
        self.header_map.push(HeaderMapping {
            header: header.to_string(),
            column: column.to_string(),
        });
        self
    }

    pub fn build(&self) -> Result<BankProfile> {
        BankProfile::new(self)
    }
}

/// CSV format parameters of one bank's export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankDialect {
    pub name: String,
    pub description: String,
    pub csv_encoding: CsvEncoding,
    pub csv_delimiter: CsvDelimiter,
    pub header_row_offset: usize,
    /// Zero or a negative count of rows to drop from the end.
    pub trailing_rows_to_drop: i64,
    pub filename: String,
}

impl BankDialect {
    pub fn trailing_rows(&self) -> usize {
        self.trailing_rows_to_drop.unsigned_abs() as usize
    }
}

/// Read-only projection returned by [`BankProfile::get_info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankInfo {
    pub name: String,
    pub csv_encoding: CsvEncoding,
    pub csv_delimiter: CsvDelimiter,
    pub header_row_offset: usize,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankProfile {
    dialect: BankDialect,
    header_map: Vec<(String, ColumnSpec)>,
}

impl BankProfile {
    pub fn new(definition: &BankDefinition) -> Result<Self> {
        let mut problems = Vec::new();

        if definition.name.trim().is_empty() {
            problems.push("bank name cannot be empty".to_string());
        }

        let csv_encoding = definition
            .csv_encoding
            .parse::<CsvEncoding>()
            .map_err(|e| problems.push(e))
            .ok();

        let csv_delimiter = definition
            .csv_delimiter
            .parse::<CsvDelimiter>()
            .map_err(|e| problems.push(e))
            .ok();

        if definition.csv_header_row < 0 {
            problems.push(format!(
                "invalid header row index '{}'. It should be a non-negative integer",
                definition.csv_header_row
            ));
        }

        if definition.csv_last_row > 0 {
            problems.push(format!(
                "invalid last row index '{}'. It should be 0 or a negative integer (e.g. -1 drops the last row)",
                definition.csv_last_row
            ));
        }

        if let Err(e) = validate_file_extension("csv_filename", &definition.csv_filename, &["csv"]) {
            problems.push(e.to_string());
        }

        let mut header_map = Vec::with_capacity(definition.header_map.len());
        let mut seen = HashSet::new();
        for mapping in &definition.header_map {
            if !seen.insert(normalize_header(&mapping.header)) {
                problems.push(format!("header '{}' is mapped more than once", mapping.header));
                continue;
            }
            match mapping.column.parse::<ColumnSpec>() {
                Ok(spec) => header_map.push((mapping.header.clone(), spec)),
                Err(e) => problems.push(format!("header '{}': {}", mapping.header, e)),
            }
        }

        let missing: Vec<&str> = mandatory_columns()
            .iter()
            .filter(|spec| !header_map.iter().any(|(_, mapped)| mapped == *spec))
            .map(|spec| spec.name())
            .collect();
        if !missing.is_empty() {
            problems.push(format!(
                "missing mandatory column mappings: {}. These columns must be mapped to CSV headers",
                missing.join(", ")
            ));
        }

        match (csv_encoding, csv_delimiter) {
            (Some(csv_encoding), Some(csv_delimiter)) if problems.is_empty() => Ok(Self {
                dialect: BankDialect {
                    name: definition.name.clone(),
                    description: definition.description.clone(),
                    csv_encoding,
                    csv_delimiter,
                    header_row_offset: definition.csv_header_row as usize,
                    trailing_rows_to_drop: definition.csv_last_row,
                    filename: definition.csv_filename.clone(),
                },
                header_map,
            }),
            _ => Err(EtlError::ConfigurationError {
                bank: definition.name.clone(),
                problems,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.dialect.name
    }

    pub fn dialect(&self) -> &BankDialect {
        &self.dialect
    }

    /// Raw header to column entries, in declaration order, keys as authored.
    pub fn header_map(&self) -> &[(String, ColumnSpec)] {
        &self.header_map
    }

    /// Case- and whitespace-insensitive lookup of a raw header.
    pub fn lookup(&self, raw_header: &str) -> Option<ColumnSpec> {
        let wanted = normalize_header(raw_header);
        self.header_map
            .iter()
            .find(|(header, _)| normalize_header(header) == wanted)
            .map(|(_, spec)| *spec)
    }

    pub fn get_info(&self) -> BankInfo {
        BankInfo {
            name: self.dialect.name.clone(),
            csv_encoding: self.dialect.csv_encoding,
            csv_delimiter: self.dialect.csv_delimiter,
            header_row_offset: self.dialect.header_row_offset,
            filename: self.dialect.filename.clone(),
        }
    }
}

impl fmt::Display for BankProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dialect.name)
    }
}
