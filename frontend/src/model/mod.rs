mod bank;
mod client;
mod invoice;
mod notification;
mod reconciliation;
mod transaction;

pub use bank::{Bank, BankForm, BankStatus};
pub use client::{Client, ClientForm};
pub use invoice::{
    next_invoice_number, Invoice, InvoiceDocument, InvoiceForm, InvoicePaidUpdate, InvoiceStatus, ItemForm,
};
pub use notification::{Notification, NotificationDraft, ReadFlag, RECON_MISMATCH};
pub use reconciliation::{ReconForm, ReconStatus, Reconciliation, ReconciliationDraft};
pub use transaction::{CashflowTotals, Transaction, TransactionDraft, TransactionForm, TransactionType};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} wajib diisi")]
    Required(&'static str),
    #[error("{0} harus berupa angka")]
    InvalidNumber(&'static str),
    #[error("{0} melebihi batas")]
    AmountOutOfRange(&'static str),
    #[error("Tanggal {0} tidak valid")]
    InvalidDate(&'static str),
    #[error("Tambahkan minimal satu item")]
    NoLineItems,
    #[error("Status Cocok hanya bisa dipilih jika selisih nol (selisih {0})")]
    MatchedWithDifference(String),
    #[error("Password tidak cocok")]
    PasswordMismatch,
    #[error("Password minimal 8 karakter")]
    PasswordTooShort,
}

/// Badge colour classes shared by all status enums.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    Muted,
}

impl Tone {
    pub fn badge_class(self) -> &'static str {
        match self {
            Tone::Success => "bg-emerald-100 text-emerald-700",
            Tone::Warning => "bg-amber-100 text-amber-700",
            Tone::Danger => "bg-red-100 text-red-700",
            Tone::Info => "bg-sky-100 text-sky-700",
            Tone::Muted => "bg-slate-100 text-slate-600",
        }
    }
}

/// Numeric columns arrive as integers, floats or strings depending on the
/// column type; everything is rounded to whole Rupiah.
pub(crate) fn amount_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Null => Some(0),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => crate::format::parse_amount(s),
        _ => None,
    }
}

pub(crate) fn de_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    amount_from_value(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a numeric amount, got {}", value)))
}

pub(crate) fn de_opt_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    amount_from_value(&value)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected a numeric amount, got {}", value)))
}

/// Row ids may be uuids or bigint identities.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("unexpected id {}", other))),
    }
}

pub(crate) fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!("unexpected id {}", other))),
    }
}

pub(crate) fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    crate::format::non_empty(value).ok_or(ValidationError::Required(field))
}

pub(crate) fn required_date(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let raw = required(value, field)?;
    crate::format::parse_date(&raw)
        .map(crate::format::iso_date)
        .ok_or(ValidationError::InvalidDate(field))
}

pub(crate) fn optional_date(value: &str, field: &'static str) -> Result<Option<String>, ValidationError> {
    match crate::format::non_empty(value) {
        None => Ok(None),
        Some(raw) => crate::format::parse_date(&raw)
            .map(|date| Some(crate::format::iso_date(date)))
            .ok_or(ValidationError::InvalidDate(field)),
    }
}

pub(crate) fn amount_field(value: &str, field: &'static str) -> Result<i64, ValidationError> {
    if value.trim().is_empty() {
        return Ok(0);
    }
    crate::format::parse_amount(value).ok_or(ValidationError::InvalidNumber(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "de_id")]
        id: String,
        #[serde(default, deserialize_with = "de_amount")]
        amount: i64,
        #[serde(default, deserialize_with = "de_opt_amount")]
        months: Option<i64>,
    }

    #[test]
    fn lenient_numeric_columns() {
        let probe: Probe =
            serde_json::from_value(json!({ "id": 42, "amount": "1500000.00", "months": 12.0 }))
                .unwrap();
        assert_eq!(probe.id, "42");
        assert_eq!(probe.amount, 1_500_000);
        assert_eq!(probe.months, Some(12));

        let probe: Probe = serde_json::from_value(json!({ "id": "a-b", "amount": null, "months": null })).unwrap();
        assert_eq!(probe.amount, 0);
        assert_eq!(probe.months, None);

        let probe: Probe = serde_json::from_value(json!({ "id": "x" })).unwrap();
        assert_eq!(probe.amount, 0);
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        let result = serde_json::from_value::<Probe>(json!({ "id": "x", "amount": [1] }));
        assert!(result.is_err());
    }

    #[test]
    fn form_field_helpers() {
        assert_eq!(required(" ", "Nama"), Err(ValidationError::Required("Nama")));
        assert_eq!(required_date("2025-02-30", "transaksi"), Err(ValidationError::InvalidDate("transaksi")));
        assert_eq!(optional_date("", "bayar"), Ok(None));
        assert_eq!(amount_field("", "Pajak"), Ok(0));
        assert_eq!(amount_field("x", "Pajak"), Err(ValidationError::InvalidNumber("Pajak")));
    }
}
