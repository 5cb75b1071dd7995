use crate::core::profile::BankProfile;
use crate::domain::model::normalize_header;
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of comparing a file's headers with a bank's declared mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    /// File headers with no mapping, in file order.
    pub unmatched: Vec<String>,
    /// Mapped headers absent from the file, in declaration order.
    pub unused: Vec<String>,
}

impl HeaderReport {
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty() && self.unused.is_empty()
    }
}

/// Advisory header check. Never fails; mismatches are logged as warnings.
pub fn reconcile(raw_headers: &[String], profile: &BankProfile) -> HeaderReport {
    let file_headers: HashSet<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();
    let map_headers: HashSet<String> = profile
        .header_map()
        .iter()
        .map(|(header, _)| normalize_header(header))
        .collect();

    let unmatched: Vec<String> = raw_headers
        .iter()
        .filter(|header| !map_headers.contains(&normalize_header(header)))
        .cloned()
        .collect();

    let unused: Vec<String> = profile
        .header_map()
        .iter()
        .map(|(header, _)| header)
        .filter(|header| !file_headers.contains(&normalize_header(header)))
        .cloned()
        .collect();

    if unmatched.is_empty() {
        tracing::info!("All CSV headers match the header map of {}", profile.name());
    } else {
        tracing::warn!(
            "Unmatched CSV headers for {}: {:?}. They are not in the bank's header map and will be ignored",
            profile.name(),
            unmatched
        );
    }
    if !unused.is_empty() {
        tracing::warn!(
            "Header map entries of {} not found in the CSV: {:?}",
            profile.name(),
            unused
        );
    }

    HeaderReport { unmatched, unused }
}
