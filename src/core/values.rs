//! Semantic-type-aware cell parsing and equality.

use crate::domain::vocabulary::SemanticType;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

// Day-first: every supported bank is European.
const DATE_FORMATS: [&str; 6] = [
    "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%y", "%d.%m.%y",
];

pub fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parses a day-first or ISO date. `%Y` formats only apply to four-digit years, since
/// chrono would otherwise read `05.03.24` as the year 24.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let four_digit_year = s
        .split(|c: char| !c.is_ascii_digit())
        .any(|part| part.len() == 4);

    DATE_FORMATS
        .iter()
        .filter(|fmt| fmt.contains("%Y") == four_digit_year)
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parses `10.00`, `-1.234,56`, `1,234.56`, `(45.99)` and `12,50 €` style amounts.
pub fn parse_amount(s: &str) -> Option<BigDecimal> {
    let s = s.trim();

    let (negative, s) = if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+'))
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Whichever separator comes last is the decimal one.
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) if cleaned.matches(',').count() == 1 => cleaned.replace(',', "."),
        (Some(_), None) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    let amount = BigDecimal::from_str(&normalized).ok()?;
    Some(if negative { -amount } else { amount })
}

/// Whether two non-empty cells carry the same value for a column of `semantic_type`.
///
/// Values that do not parse as their type are compared as trimmed text.
pub fn values_agree(semantic_type: SemanticType, a: &str, b: &str) -> bool {
    let parsed = match semantic_type {
        SemanticType::Currency => match (parse_amount(a), parse_amount(b)) {
            (Some(x), Some(y)) => Some(x == y),
            _ => None,
        },
        SemanticType::Date => match (parse_date(a), parse_date(b)) {
            (Some(x), Some(y)) => Some(x == y),
            _ => None,
        },
        SemanticType::Boolean => Some(a.trim().eq_ignore_ascii_case(b.trim())),
        SemanticType::Text => None,
    };
    parsed.unwrap_or_else(|| a.trim() == b.trim())
}
