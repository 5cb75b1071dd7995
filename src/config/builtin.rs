//! Banks supported out of the box, declared as plain data.

use crate::core::profile::BankDefinition;

pub fn builtin_definitions() -> Vec<BankDefinition> {
    vec![n26(), abanca(), deutsche_bank()]
}

fn n26() -> BankDefinition {
    BankDefinition::new("N26")
        .encoding("utf-8")
        .delimiter(",")
        .map("Booking Date", "date")
        .map("Value Date", "unused")
        .map("Partner Name", "origin")
        .map("Partner Iban", "iban")
        .map("Type", "transaction_type")
        .map("Payment Reference", "description")
        .map("Account Name", "unused")
        .map("Amount (EUR)", "amount")
        .map("Original Amount", "unused")
        .map("Original Currency", "unused")
        .map("Exchange Rate", "unused")
}

fn abanca() -> BankDefinition {
    BankDefinition::new("Abanca")
        .encoding("utf-8")
        .delimiter(";")
        .map("Fecha ctble", "date")
        .map("Fecha valor", "unused")
        .map("Concepto", "description")
        .map("Importe", "amount")
        .map("Moneda", "unused")
        .map("Saldo", "balance")
        .map("Moneda 2", "unused")
        .map("Concepto ampliado", "info_extended")
}

fn deutsche_bank() -> BankDefinition {
    BankDefinition::new("DB")
        .description("Deutsche Bank")
        .encoding("cp1252")
        .delimiter(";")
        .header_row(4)
        .last_row(-1)
        .map("Buchungstag", "date")
        .map("Wert", "unused")
        .map("Umsatzart", "transaction_type")
        .map("Begünstigter / Auftraggeber", "origin")
        .map("Verwendungszweck", "description")
        .map("IBAN", "iban")
        .map("BIC", "info_extended")
        .map("Kundenreferenz", "info_extended")
        .map("Mandatsreferenz ", "reference")
        .map("Gläubiger ID", "unused")
        .map("Fremde Gebühren", "unused")
        .map("Betrag", "amount")
        .map("Abweichender Empfänger", "unused")
        .map("Abweichender Auftraggeber", "unused")
        .map("Anzahl der Aufträge", "unused")
        .map("Anzahl der Schecks", "unused")
        .map("Soll", "amount")
        .map("Haben", "unused")
        .map("Währung", "unused")
}
