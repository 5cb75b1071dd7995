//! The closed set of unified columns every bank export is mapped onto.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A semantic column category of the unified schema.
///
/// Variant order is the canonical order of unified output columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Concept {
    Bank,
    Date,
    Amount,
    TransactionType,
    Iban,
    Origin,
    Description,
    InfoExtended,
    Reference,
    Balance,
    Unused,
}

impl Concept {
    pub const ALL: [Concept; 11] = [
        Concept::Bank,
        Concept::Date,
        Concept::Amount,
        Concept::TransactionType,
        Concept::Iban,
        Concept::Origin,
        Concept::Description,
        Concept::InfoExtended,
        Concept::Reference,
        Concept::Balance,
        Concept::Unused,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Concept::Bank => "Bank",
            Concept::Date => "Date",
            Concept::Amount => "Amount",
            Concept::TransactionType => "TransactionType",
            Concept::Iban => "IBAN",
            Concept::Origin => "Origin",
            Concept::Description => "Description",
            Concept::InfoExtended => "InfoExtended",
            Concept::Reference => "Reference",
            Concept::Balance => "Balance",
            Concept::Unused => "Unused",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Concept {
    type Err = String;

    /// Accepts `TransactionType`, `transaction_type`, `transaction-type` and any casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        Concept::ALL
            .iter()
            .copied()
            .find(|concept| concept.name().to_lowercase() == key)
            .ok_or_else(|| {
                format!(
                    "unknown column '{}'. Valid columns: {}",
                    s,
                    Concept::ALL
                        .iter()
                        .map(|c| c.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SemanticType {
    Date,
    Text,
    Currency,
    Boolean,
}

impl SemanticType {
    /// Date, Currency and Boolean columns expect one authoritative value per row.
    pub fn is_single_valued(&self) -> bool {
        !matches!(self, SemanticType::Text)
    }
}

/// A unified column: its concept, how its values are interpreted and whether
/// every bank must map at least one raw header onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub concept: Concept,
    pub semantic_type: SemanticType,
    pub mandatory: bool,
}

impl ColumnSpec {
    pub const BANK: ColumnSpec = ColumnSpec::new(Concept::Bank, SemanticType::Text, false);
    pub const DATE: ColumnSpec = ColumnSpec::new(Concept::Date, SemanticType::Date, true);
    pub const AMOUNT: ColumnSpec = ColumnSpec::new(Concept::Amount, SemanticType::Currency, true);
    pub const TRANSACTION_TYPE: ColumnSpec =
        ColumnSpec::new(Concept::TransactionType, SemanticType::Text, false);
    pub const IBAN: ColumnSpec = ColumnSpec::new(Concept::Iban, SemanticType::Text, false);
    pub const ORIGIN: ColumnSpec = ColumnSpec::new(Concept::Origin, SemanticType::Text, false);
    pub const DESCRIPTION: ColumnSpec =
        ColumnSpec::new(Concept::Description, SemanticType::Text, true);
    pub const INFO_EXTENDED: ColumnSpec =
        ColumnSpec::new(Concept::InfoExtended, SemanticType::Text, false);
    pub const REFERENCE: ColumnSpec = ColumnSpec::new(Concept::Reference, SemanticType::Text, false);
    pub const BALANCE: ColumnSpec = ColumnSpec::new(Concept::Balance, SemanticType::Currency, false);
    pub const UNUSED: ColumnSpec = ColumnSpec::new(Concept::Unused, SemanticType::Text, false);

    const fn new(concept: Concept, semantic_type: SemanticType, mandatory: bool) -> Self {
        Self {
            concept,
            semantic_type,
            mandatory,
        }
    }

    /// The single spec defined for `concept`.
    pub fn of(concept: Concept) -> ColumnSpec {
        match concept {
            Concept::Bank => Self::BANK,
            Concept::Date => Self::DATE,
            Concept::Amount => Self::AMOUNT,
            Concept::TransactionType => Self::TRANSACTION_TYPE,
            Concept::Iban => Self::IBAN,
            Concept::Origin => Self::ORIGIN,
            Concept::Description => Self::DESCRIPTION,
            Concept::InfoExtended => Self::INFO_EXTENDED,
            Concept::Reference => Self::REFERENCE,
            Concept::Balance => Self::BALANCE,
            Concept::Unused => Self::UNUSED,
        }
    }

    pub fn name(&self) -> &'static str {
        self.concept.name()
    }
}

impl FromStr for ColumnSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Concept>().map(ColumnSpec::of)
    }
}

pub fn all_columns() -> BTreeSet<ColumnSpec> {
    Concept::ALL.iter().copied().map(ColumnSpec::of).collect()
}

pub fn mandatory_columns() -> BTreeSet<ColumnSpec> {
    [ColumnSpec::DATE, ColumnSpec::AMOUNT, ColumnSpec::DESCRIPTION]
        .into_iter()
        .collect()
}

/// Columns of a unified table, in canonical order. `Unused` never appears.
pub fn output_columns() -> Vec<ColumnSpec> {
    Concept::ALL
        .iter()
        .copied()
        .filter(|concept| *concept != Concept::Unused)
        .map(ColumnSpec::of)
        .collect()
}
