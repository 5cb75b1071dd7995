use crate::domain::vocabulary::{Concept, ColumnSpec};
use crate::utils::error::Result;
use serde::Serialize;

/// Lowercased, trimmed form used whenever headers are compared.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// One bank's loaded CSV: headers exactly as found in the file and the data rows below them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first column whose header matches `header` after normalization.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = normalize_header(header);
        self.headers
            .iter()
            .position(|h| normalize_header(h) == wanted)
    }

    /// Short rows read as empty cells.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn column_has_data(&self, column: usize) -> bool {
        (0..self.rows.len()).any(|row| !self.cell(row, column).trim().is_empty())
    }

    /// Removes `count` rows from the end, e.g. a closing balance line.
    pub fn drop_trailing_rows(&mut self, count: usize) {
        let keep = self.rows.len().saturating_sub(count);
        self.rows.truncate(keep);
    }

    pub fn log_info(&self, bank: &str) {
        tracing::info!("{} CSV Information:", bank);
        tracing::info!("\tColumns x rows: {} x {}", self.headers.len(), self.rows.len());
        tracing::info!("\tColumn names: {:?}", self.headers);
    }
}

/// The unified record set for one bank. Built fresh by every unification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedTable {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<String>>,
}

impl UnifiedTable {
    /// Assembles a table from per-column values. All columns must have the same length.
    pub fn from_columns(columns: Vec<ColumnSpec>, values: Vec<Vec<String>>, row_count: usize) -> Self {
        let rows = (0..row_count)
            .map(|row| {
                values
                    .iter()
                    .map(|column| column.get(row).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Values of the unified column for `concept`, or `None` if the table has no such column.
    pub fn column(&self, concept: Concept) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c.concept == concept)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Comma-delimited dump with a header row of concept names.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.column_names())?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| crate::utils::error::EtlError::IoError(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::new(
            vec![" Fecha ".to_string(), "Importe".to_string()],
            vec![
                vec!["01/02/2024".to_string(), "10,00".to_string()],
                vec!["02/02/2024".to_string()],
                vec!["Saldo".to_string(), "".to_string()],
            ],
        )
    }

    #[test]
    fn test_column_index_is_case_and_whitespace_insensitive() {
        let t = table();
        assert_eq!(t.column_index("fecha"), Some(0));
        assert_eq!(t.column_index("IMPORTE "), Some(1));
        assert_eq!(t.column_index("Concepto"), None);
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let t = table();
        assert_eq!(t.cell(1, 1), "");
        assert_eq!(t.cell(10, 0), "");
    }

    #[test]
    fn test_drop_trailing_rows() {
        let mut t = table();
        t.drop_trailing_rows(1);
        assert_eq!(t.row_count(), 2);
        t.drop_trailing_rows(5);
        assert_eq!(t.row_count(), 0);
    }

    #[test]
    fn test_unified_csv_dump() {
        let unified = UnifiedTable::from_columns(
            vec![ColumnSpec::BANK, ColumnSpec::DESCRIPTION],
            vec![
                vec!["N26".to_string()],
                vec!["Pago, tienda".to_string()],
            ],
            1,
        );
        let text = String::from_utf8(unified.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(text, "Bank,Description\nN26,\"Pago, tienda\"\n");
    }
}
