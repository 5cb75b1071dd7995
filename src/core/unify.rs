//! Merges a bank's raw columns into one column per unified concept.

use crate::core::profile::BankProfile;
use crate::core::values::{is_empty, values_agree};
use crate::domain::model::{RawTable, UnifiedTable};
use crate::domain::vocabulary::{output_columns, ColumnSpec, Concept};
use crate::utils::error::{EtlError, Result};

pub const TEXT_SEPARATOR: &str = " | ";

/// A raw column feeding a concept: its header as declared and its index in the table.
struct Source<'a> {
    header: &'a str,
    index: Option<usize>,
}

/// Builds the unified table for one bank. `raw` is only read.
///
/// Fails with [`EtlError::ConflictError`] when two columns feeding a Date or
/// Currency concept hold different values on the same row; no partial table
/// is returned in that case.
pub fn unify(raw: &RawTable, profile: &BankProfile) -> Result<UnifiedTable> {
    let row_count = raw.row_count();
    let columns = output_columns();
    let mut values = Vec::with_capacity(columns.len());

    for spec in &columns {
        let sources = sources_for(raw, profile, spec.concept);

        let column = match spec.concept {
            Concept::Bank => {
                if !sources.is_empty() {
                    tracing::warn!(
                        "{}: headers mapped to Bank are ignored, the column holds the bank name",
                        profile.name()
                    );
                }
                vec![profile.name().to_string(); row_count]
            }
            _ if sources.is_empty() => {
                if spec.mandatory {
                    tracing::warn!(
                        "{}: no mapping found for mandatory column {}, leaving it empty",
                        profile.name(),
                        spec.name()
                    );
                } else {
                    tracing::debug!("{}: no mapping for {}", profile.name(), spec.name());
                }
                vec![String::new(); row_count]
            }
            _ if spec.semantic_type.is_single_valued() => {
                merge_single_valued(raw, spec, &sources)?
            }
            _ => {
                if sources.len() > 1 {
                    tracing::warn!(
                        "{}: multiple columns mapped to {}: {:?}",
                        profile.name(),
                        spec.name(),
                        sources.iter().map(|s| s.header).collect::<Vec<_>>()
                    );
                }
                join_text(raw, &sources)
            }
        };

        values.push(column);
    }

    Ok(UnifiedTable::from_columns(columns, values, row_count))
}

/// Raw columns mapped to `concept`, in header-map declaration order.
fn sources_for<'a>(raw: &RawTable, profile: &'a BankProfile, concept: Concept) -> Vec<Source<'a>> {
    profile
        .header_map()
        .iter()
        .filter(|(_, spec)| spec.concept == concept)
        .map(|(header, _)| Source {
            header: header.as_str(),
            index: raw.column_index(header),
        })
        .collect()
}

/// First-non-empty-wins merge; overlapping non-empty cells must agree.
fn merge_single_valued(raw: &RawTable, spec: &ColumnSpec, sources: &[Source<'_>]) -> Result<Vec<String>> {
    let candidates: Vec<(&str, usize)> = sources
        .iter()
        .filter_map(|s| s.index.map(|index| (s.header, index)))
        .filter(|(_, index)| raw.column_has_data(*index))
        .collect();

    match candidates.as_slice() {
        [] => Ok(vec![String::new(); raw.row_count()]),
        [(_, index)] => Ok((0..raw.row_count())
            .map(|row| raw.cell(row, *index).to_string())
            .collect()),
        _ => {
            let mut column = Vec::with_capacity(raw.row_count());
            for row in 0..raw.row_count() {
                let present: Vec<(&str, &str)> = candidates
                    .iter()
                    .map(|(header, index)| (*header, raw.cell(row, *index)))
                    .filter(|(_, value)| !is_empty(value))
                    .collect();

                if let Some((_, first)) = present.first() {
                    if present
                        .iter()
                        .skip(1)
                        .any(|(_, other)| !values_agree(spec.semantic_type, first, other))
                    {
                        return Err(EtlError::ConflictError {
                            concept: spec.name().to_string(),
                            headers: present.iter().map(|(h, _)| h.to_string()).collect(),
                            row,
                            values: present.iter().map(|(_, v)| v.to_string()).collect(),
                        });
                    }
                }

                column.push(present.first().map(|(_, v)| v.to_string()).unwrap_or_default());
            }
            Ok(column)
        }
    }
}

fn join_text(raw: &RawTable, sources: &[Source<'_>]) -> Vec<String> {
    let indices: Vec<usize> = sources.iter().filter_map(|s| s.index).collect();
    (0..raw.row_count())
        .map(|row| {
            indices
                .iter()
                .map(|index| raw.cell(row, *index).trim())
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join(TEXT_SEPARATOR)
        })
        .collect()
}
