use crate::core::profile::{BankDialect, CsvEncoding};
use crate::domain::model::RawTable;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use csv::ReaderBuilder;
use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// Bytes with no assigned character in windows-1252.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Decodes `bytes` with exactly one encoding; malformed input is an error, never replaced.
pub fn decode(bytes: &[u8], encoding: CsvEncoding) -> Option<Cow<'_, str>> {
    match encoding {
        CsvEncoding::Utf8 => {
            let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
        }
        // encoding_rs maps the undefined bytes to C1 controls instead of failing.
        CsvEncoding::Cp1252 => {
            if bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
                return None;
            }
            encoding_rs::WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
        }
        // Every byte is a valid latin-1 code point.
        CsvEncoding::Iso8859_1 => Some(encoding_rs::mem::decode_latin1(bytes)),
    }
}

/// Skips `count` physical lines, returning what follows.
fn skip_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

/// Parses already-decoded CSV text according to `dialect`.
pub fn parse_raw_table(text: &str, dialect: &BankDialect) -> Result<RawTable> {
    let body = skip_lines(text, dialect.header_row_offset);

    let mut reader = ReaderBuilder::new()
        .delimiter(dialect.csv_delimiter.as_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let mut table = RawTable::new(headers, rows);
    let trailing = dialect.trailing_rows();
    if trailing > 0 {
        tracing::debug!("{}: dropping {} trailing rows", dialect.name, trailing);
        table.drop_trailing_rows(trailing);
    }
    Ok(table)
}

/// Loads `<bank name>/<filename>` from `storage` using the bank's dialect.
pub fn load_raw_table<S: Storage>(storage: &S, dialect: &BankDialect) -> Result<RawTable> {
    let path = format!("{}/{}", dialect.name, dialect.filename);

    if !storage.exists(&path) {
        tracing::error!("CSV file not found: {}", path);
        return Err(EtlError::FileNotFoundError { path });
    }

    let bytes = storage.read_file(&path)?;
    let text = decode(&bytes, dialect.csv_encoding).ok_or_else(|| {
        tracing::error!(
            "Failed to load CSV at {} with delimiter '{}' and encoding '{}'",
            path,
            dialect.csv_delimiter,
            dialect.csv_encoding
        );
        EtlError::DecodeError {
            path: path.clone(),
            encoding: dialect.csv_encoding.to_string(),
        }
    })?;

    let table = parse_raw_table(&text, dialect)?;

    tracing::info!("Loaded CSV file for {} at {}", dialect.name, path);
    if dialect.header_row_offset > 0 {
        tracing::info!("Skipped {} header rows", dialect.header_row_offset);
    }
    Ok(table)
}
