use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{
    amount_field, de_amount, de_id, optional_date, required, Bank, Client, Tone, TransactionDraft,
    TransactionType, ValidationError,
};
use crate::format::{format_date, non_empty, parse_amount, parse_date, DateStyle};
use crate::listing::Searchable;
use crate::terbilang::rupiah_words;

pub const PAYMENT_CATEGORY: &str = "Pendapatan Invoice";
const DUE_IN_DAYS: i64 = 7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Sent,
    Paid,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 3] = [InvoiceStatus::Pending, InvoiceStatus::Sent, InvoiceStatus::Paid];

    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Tertunda",
            InvoiceStatus::Sent => "Terkirim",
            InvoiceStatus::Paid => "Lunas",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            InvoiceStatus::Pending => Tone::Warning,
            InvoiceStatus::Sent => Tone::Info,
            InvoiceStatus::Paid => Tone::Success,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::String(raw) => raw == "true",
        _ => false,
    })
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "de_amount")]
    pub unit_price: i64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total: i64,
    #[serde(default, deserialize_with = "de_flag", skip_serializing_if = "is_false")]
    pub is_subitem: bool,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: i64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            total: quantity.saturating_mul(unit_price),
            is_subitem: false,
        }
    }

    /// Always recomputed; the stored `total` is informational only.
    pub fn line_total(&self) -> i64 {
        self.quantity.saturating_mul(self.unit_price)
    }

    fn checked_line_total(&self) -> Option<i64> {
        self.quantity.checked_mul(self.unit_price)
    }
}

/// Items are stored as a JSON string but older rows hold a plain array.
pub fn parse_items(value: &Value) -> Vec<LineItem> {
    match value {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(inner @ Value::Array(_)) => parse_items(&inner),
            Ok(_) | Err(_) => {
                log::warn!("ignoring unreadable invoice items: {}", raw);
                Vec::new()
            }
        },
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match serde_json::from_value::<LineItem>(item.clone()) {
                Ok(line) => Some(line),
                Err(err) => {
                    log::warn!("skipping invoice item {}: {}", item, err);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn de_items<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_items(&value))
}

fn items_as_json_string<S>(items: &[LineItem], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let raw = serde_json::to_string(items).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&raw)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: i64,
    pub tax: i64,
    pub discount: i64,
    pub total: i64,
}

impl InvoiceTotals {
    /// `tax` and `discount` are absolute amounts, never rates. Saturates
    /// instead of overflowing so live previews never panic.
    pub fn compute(items: &[LineItem], tax: i64, discount: i64) -> Self {
        let subtotal = items
            .iter()
            .map(LineItem::line_total)
            .fold(0i64, i64::saturating_add);
        Self {
            subtotal,
            tax,
            discount,
            total: subtotal.saturating_add(tax).saturating_sub(discount),
        }
    }

    /// `None` when any step leaves the `i64` range.
    pub fn checked(items: &[LineItem], tax: i64, discount: i64) -> Option<Self> {
        let subtotal = items
            .iter()
            .try_fold(0i64, |sum, item| sum.checked_add(item.checked_line_total()?))?;
        Some(Self {
            subtotal,
            tax,
            discount,
            total: subtotal.checked_add(tax)?.checked_sub(discount)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Invoice {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default, deserialize_with = "de_items")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "de_amount")]
    pub subtotal: i64,
    #[serde(default, deserialize_with = "de_amount")]
    pub tax: i64,
    #[serde(default, deserialize_with = "de_amount")]
    pub discount: i64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total: i64,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub paid_date: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub account_holder: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Invoice {
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(&self.items, self.tax, self.discount)
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Pending
            && self
                .due_date
                .as_deref()
                .and_then(parse_date)
                .map_or(false, |due| due < today)
    }

    /// Income row recorded when the invoice is marked as paid.
    pub fn payment_transaction(&self, user_id: &str, paid_on: &str) -> TransactionDraft {
        TransactionDraft {
            user_id: Some(user_id.to_string()),
            kind: TransactionType::Income,
            amount: self.totals().total,
            category: Some(PAYMENT_CATEGORY.to_string()),
            description: Some(format!("Pembayaran {}", self.invoice_number)),
            transaction_date: paid_on.to_string(),
            reference_type: Some("invoice".to_string()),
            reference_id: Some(self.id.clone()),
        }
    }
}

impl Searchable for Invoice {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.invoice_number.as_str(), self.client_name.as_str()]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvoiceDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    #[serde(serialize_with = "items_as_json_string")]
    pub items: Vec<LineItem>,
    pub subtotal: i64,
    pub tax: i64,
    pub discount: i64,
    pub total: i64,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub status: InvoiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvoicePaidUpdate {
    pub status: InvoiceStatus,
    pub paid_date: String,
}

impl InvoicePaidUpdate {
    pub fn on(date: &str) -> Self {
        Self {
            status: InvoiceStatus::Paid,
            paid_date: date.to_string(),
        }
    }
}

/// `INV-YYYYMMDD-NNNN`, where `NNNN` is the tail of the millisecond clock.
pub fn next_invoice_number(date: NaiveDate, now_millis: i64) -> String {
    format!("INV-{}-{:04}", date.format("%Y%m%d"), now_millis.rem_euclid(10_000))
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemForm {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub is_subitem: bool,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: "1".to_string(),
            unit_price: "0".to_string(),
            is_subitem: false,
        }
    }
}

impl ItemForm {
    fn from_line(line: &LineItem) -> Self {
        Self {
            description: line.description.clone(),
            quantity: line.quantity.to_string(),
            unit_price: line.unit_price.to_string(),
            is_subitem: line.is_subitem,
        }
    }

    /// Quantity is at least one and prices are never negative.
    pub fn to_line_item(&self) -> LineItem {
        let quantity = parse_amount(&self.quantity).filter(|q| *q >= 1).unwrap_or(1);
        let unit_price = parse_amount(&self.unit_price).unwrap_or(0).max(0);
        LineItem {
            is_subitem: self.is_subitem,
            ..LineItem::new(self.description.trim(), quantity, unit_price)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InvoiceForm {
    pub invoice_number: String,
    pub client_id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_address: String,
    pub due_date: String,
    pub notes: String,
    pub status: InvoiceStatus,
    pub tax: String,
    pub discount: String,
    pub items: Vec<ItemForm>,
    pub bank_id: String,
}

impl InvoiceForm {
    pub fn new(invoice_number: String, today: NaiveDate) -> Self {
        Self {
            invoice_number,
            client_id: String::new(),
            client_name: String::new(),
            client_email: String::new(),
            client_address: String::new(),
            due_date: (today + Duration::days(DUE_IN_DAYS)).format("%Y-%m-%d").to_string(),
            notes: String::new(),
            status: InvoiceStatus::Pending,
            tax: "0".to_string(),
            discount: "0".to_string(),
            items: vec![ItemForm::default()],
            bank_id: String::new(),
        }
    }

    pub fn from_invoice(invoice: &Invoice, clients: &[Client], banks: &[Bank]) -> Self {
        let client_id = clients
            .iter()
            .find(|client| client.name == invoice.client_name)
            .map(|client| client.id.clone())
            .unwrap_or_default();
        let bank_id = banks
            .iter()
            .find(|bank| Some(&bank.account_number) == invoice.account_number.as_ref())
            .map(|bank| bank.id.clone())
            .unwrap_or_default();
        let mut items: Vec<ItemForm> = invoice.items.iter().map(ItemForm::from_line).collect();
        if items.is_empty() {
            items.push(ItemForm::default());
        }
        Self {
            invoice_number: invoice.invoice_number.clone(),
            client_id,
            client_name: invoice.client_name.clone(),
            client_email: invoice.client_email.clone().unwrap_or_default(),
            client_address: invoice.client_address.clone().unwrap_or_default(),
            due_date: invoice
                .due_date
                .as_deref()
                .and_then(parse_date)
                .map(crate::format::iso_date)
                .unwrap_or_default(),
            notes: invoice.notes.clone().unwrap_or_default(),
            status: invoice.status,
            tax: invoice.tax.to_string(),
            discount: invoice.discount.to_string(),
            items,
            bank_id,
        }
    }

    /// Copies the picked client's contact fields; clearing the picker clears them.
    pub fn apply_client(&mut self, client: Option<&Client>) {
        match client {
            Some(client) => {
                self.client_id = client.id.clone();
                self.client_name = client.name.clone();
                self.client_email = client.email.clone().unwrap_or_default();
                self.client_address = client.address.clone().unwrap_or_default();
            }
            None => {
                self.client_id.clear();
                self.client_name.clear();
                self.client_email.clear();
                self.client_address.clear();
            }
        }
    }

    /// Rows without a description are ignored.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .filter(|item| !item.description.trim().is_empty())
            .map(ItemForm::to_line_item)
            .collect()
    }

    /// Live totals for the form footer; unreadable tax or discount counts as zero.
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(
            &self.line_items(),
            parse_amount(&self.tax).unwrap_or(0),
            parse_amount(&self.discount).unwrap_or(0),
        )
    }

    pub fn to_draft(&self, user_id: Option<&str>, banks: &[Bank]) -> Result<InvoiceDraft, ValidationError> {
        let invoice_number = required(&self.invoice_number, "Nomor invoice")?;
        let client_name = required(&self.client_name, "Nama klien")?;
        let items = self.line_items();
        if items.is_empty() {
            return Err(ValidationError::NoLineItems);
        }
        for item in self.items.iter().filter(|item| !item.description.trim().is_empty()) {
            amount_field(&item.quantity, "Jumlah")?;
            amount_field(&item.unit_price, "Harga")?;
        }
        let totals = InvoiceTotals::checked(
            &items,
            amount_field(&self.tax, "Pajak")?,
            amount_field(&self.discount, "Diskon")?,
        )
        .ok_or(ValidationError::AmountOutOfRange("Total invoice"))?;
        let bank = banks.iter().find(|bank| bank.id == self.bank_id);

        Ok(InvoiceDraft {
            user_id: user_id.map(str::to_string),
            invoice_number,
            client_name,
            client_email: non_empty(&self.client_email),
            client_address: non_empty(&self.client_address),
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
            due_date: optional_date(&self.due_date, "jatuh tempo")?,
            notes: non_empty(&self.notes),
            status: self.status,
            bank_name: bank.map(|bank| bank.bank_name.clone()),
            account_number: bank.map(|bank| bank.account_number.clone()),
            account_holder: bank.map(|bank| bank.account_holder.clone()),
        })
    }
}

/// Fixed issuer details printed on every invoice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Issuer {
    pub name: &'static str,
    pub address: [&'static str; 2],
    pub signatory: &'static str,
    pub signatory_title: &'static str,
    pub contact: &'static str,
}

pub const ISSUER: Issuer = Issuer {
    name: "Finance System",
    address: ["Jl. Keuangan No. 123, Jakarta Selatan", "DKI Jakarta 12345, Indonesia"],
    signatory: "Arief Chan",
    signatory_title: "Director",
    contact: "finance@system.com | www.financesystem.com",
};

#[derive(Clone, Debug, PartialEq)]
pub struct TransferAccount {
    pub bank_name: String,
    pub account_holder: String,
    pub account_number: String,
}

impl TransferAccount {
    fn for_invoice(invoice: &Invoice) -> Self {
        let pick = |value: &Option<String>, fallback: &str| {
            value
                .as_deref()
                .and_then(non_empty)
                .unwrap_or_else(|| fallback.to_string())
        };
        Self {
            bank_name: pick(&invoice.bank_name, "Bank BCA"),
            account_holder: pick(&invoice.account_holder, ISSUER.name),
            account_number: pick(&invoice.account_number, "1234567890"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentRow {
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub total: i64,
    pub indented: bool,
}

/// Everything the printable invoice shows, already formatted where it matters.
#[derive(Clone, Debug, PartialEq)]
pub struct InvoiceDocument {
    pub issuer: Issuer,
    pub invoice_number: String,
    pub invoice_date: String,
    pub client_name: String,
    pub client_address: String,
    pub rows: Vec<DocumentRow>,
    pub totals: InvoiceTotals,
    pub say: String,
    pub transfer: TransferAccount,
}

impl InvoiceDocument {
    pub fn build(invoice: &Invoice, today: NaiveDate) -> Self {
        let issued = invoice
            .created_at
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(today);
        let totals = invoice.totals();
        let dash = |value: &str| non_empty(value).unwrap_or_else(|| "-".to_string());

        Self {
            issuer: ISSUER,
            invoice_number: dash(&invoice.invoice_number),
            invoice_date: format_date(issued, DateStyle::Document),
            client_name: dash(&invoice.client_name),
            client_address: dash(invoice.client_address.as_deref().unwrap_or_default()),
            rows: invoice
                .items
                .iter()
                .map(|item| DocumentRow {
                    description: item.description.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total: item.line_total(),
                    indented: item.is_subitem,
                })
                .collect(),
            totals,
            say: rupiah_words(totals.total),
            transfer: TransferAccount::for_invoice(invoice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored_invoice(items: Value) -> Invoice {
        serde_json::from_value(json!({
            "id": "inv-1",
            "invoice_number": "INV-20250105-0042",
            "client_name": "PT Tirta",
            "client_address": "Jl. Air 1",
            "items": items,
            "tax": 110000,
            "discount": "10000",
            "total": 1100000,
            "status": "pending",
            "due_date": "2025-01-12",
            "created_at": "2025-01-05T09:30:00+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn totals_use_absolute_tax_and_discount() {
        let items = vec![LineItem::new("Jasa", 2, 500_000), LineItem::new("Materai", 1, 10_000)];
        let totals = InvoiceTotals::compute(&items, 110_000, 20_000);
        assert_eq!(totals.subtotal, 1_010_000);
        assert_eq!(totals.total, 1_010_000 + 110_000 - 20_000);
    }

    #[rstest]
    #[case(vec![(1, 100), (2, 50), (3, 7)])]
    #[case(vec![(10, 0), (1, 999_999)])]
    #[case(vec![])]
    fn subtotal_ignores_item_order(#[case] lines: Vec<(i64, i64)>) {
        let items: Vec<LineItem> = lines.iter().map(|(q, p)| LineItem::new("x", *q, *p)).collect();
        let mut reversed = items.clone();
        reversed.reverse();
        let expected: i64 = lines.iter().map(|(q, p)| q * p).sum();
        assert_eq!(InvoiceTotals::compute(&items, 0, 0).subtotal, expected);
        assert_eq!(InvoiceTotals::compute(&reversed, 0, 0).subtotal, expected);
    }

    #[test]
    fn items_read_from_string_or_array() {
        let as_string = stored_invoice(json!(
            "[{\"description\":\"Jasa\",\"quantity\":\"2\",\"unit_price\":500000,\"is_subitem\":\"true\"}]"
        ));
        let as_array = stored_invoice(json!([{ "description": "Jasa", "quantity": 2, "unit_price": 500000 }]));
        assert_eq!(as_string.items.len(), 1);
        assert!(as_string.items[0].is_subitem);
        assert_eq!(as_string.items[0].line_total(), 1_000_000);
        assert_eq!(as_array.items[0].line_total(), 1_000_000);

        assert!(stored_invoice(json!("not json")).items.is_empty());
        assert!(stored_invoice(Value::Null).items.is_empty());
    }

    #[test]
    fn draft_stores_items_as_json_text() {
        let mut form = InvoiceForm::new("INV-1".into(), day(2025, 1, 5));
        form.client_name = "PT Tirta".into();
        form.items = vec![
            ItemForm {
                description: "Jasa".into(),
                quantity: "0".into(),
                unit_price: "250000".into(),
                is_subitem: false,
            },
            ItemForm::default(),
        ];
        form.tax = "27.500".into();
        let draft = form.to_draft(Some("u-1"), &[]).unwrap();
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].quantity, 1);
        assert_eq!(draft.total, 277_500);

        let body = serde_json::to_value(&draft).unwrap();
        let items: Value = serde_json::from_str(body["items"].as_str().unwrap()).unwrap();
        assert_eq!(items[0]["total"], 250_000);
        assert!(body.get("bank_name").is_none());
        assert_eq!(body["due_date"], "2025-01-12");
    }

    #[test]
    fn oversized_lines_saturate_in_preview_and_fail_on_save() {
        let mut form = InvoiceForm::new("INV-1".into(), day(2025, 1, 5));
        form.client_name = "PT Tirta".into();
        form.items[0] = ItemForm {
            description: "Jasa".into(),
            quantity: "10000000000".into(),
            unit_price: "10000000000".into(),
            is_subitem: false,
        };
        assert_eq!(form.totals().total, i64::MAX);
        assert_eq!(
            form.to_draft(None, &[]),
            Err(ValidationError::AmountOutOfRange("Total invoice"))
        );

        form.items[0].quantity = "1e19".into();
        assert_eq!(form.to_draft(None, &[]), Err(ValidationError::InvalidNumber("Jumlah")));
    }

    #[test]
    fn checked_totals_detect_discount_underflow() {
        let items = vec![LineItem::new("Jasa", 1, 0)];
        assert_eq!(InvoiceTotals::checked(&items, 0, i64::MIN), None);
        assert_eq!(
            InvoiceTotals::checked(&items, 5, 2).map(|totals| totals.total),
            Some(3)
        );
    }

    #[test]
    fn draft_requires_client_and_items() {
        let mut form = InvoiceForm::new("INV-1".into(), day(2025, 1, 5));
        assert_eq!(form.to_draft(None, &[]), Err(ValidationError::Required("Nama klien")));
        form.client_name = "A".into();
        assert_eq!(form.to_draft(None, &[]), Err(ValidationError::NoLineItems));
    }

    #[test]
    fn selected_bank_is_copied_onto_draft() {
        let bank: Bank = serde_json::from_value(json!({
            "id": "b-1", "bank_name": "BNI", "account_number": "777", "account_holder": "Finance"
        }))
        .unwrap();
        let mut form = InvoiceForm::new("INV-1".into(), day(2025, 1, 5));
        form.client_name = "A".into();
        form.items[0].description = "Jasa".into();
        form.bank_id = "b-1".into();
        let draft = form.to_draft(None, &[bank]).unwrap();
        assert_eq!(draft.bank_name.as_deref(), Some("BNI"));
        assert_eq!(draft.account_number.as_deref(), Some("777"));
    }

    #[test]
    fn form_round_trips_stored_invoice() {
        let invoice = stored_invoice(json!([{ "description": "Jasa", "quantity": 2, "unit_price": 500000 }]));
        let form = InvoiceForm::from_invoice(&invoice, &[], &[]);
        assert_eq!(form.due_date, "2025-01-12");
        assert_eq!(form.totals().total, 1_000_000 + 110_000 - 10_000);
    }

    #[test]
    fn stale_stored_total_is_ignored() {
        // Stored total 1.100.000 predates the absolute tax rule.
        let invoice = stored_invoice(json!([{ "description": "Jasa", "quantity": 1, "unit_price": 400000 }]));
        assert_eq!(invoice.total, 1_100_000);
        assert_eq!(invoice.totals().total, 400_000 + 110_000 - 10_000);
        assert_eq!(invoice.payment_transaction("u-1", "2025-02-01").amount, 500_000);
    }

    #[test]
    fn numbers_follow_date_and_clock() {
        assert_eq!(next_invoice_number(day(2025, 3, 9), 1_741_500_012_345), "INV-20250309-2345");
        assert_eq!(next_invoice_number(day(2025, 3, 9), 7), "INV-20250309-0007");
    }

    #[test]
    fn due_date_defaults_to_a_week() {
        let form = InvoiceForm::new("INV".into(), day(2024, 12, 28));
        assert_eq!(form.due_date, "2025-01-04");
    }

    #[test]
    fn paying_records_income() {
        let invoice = stored_invoice(json!([{ "description": "Jasa", "quantity": 2, "unit_price": 500000 }]));
        let tx = invoice.payment_transaction("u-1", "2025-02-01");
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.amount, 1_100_000);
        assert_eq!(tx.category.as_deref(), Some(PAYMENT_CATEGORY));
        assert_eq!(tx.description.as_deref(), Some("Pembayaran INV-20250105-0042"));
        assert_eq!(tx.reference_id.as_deref(), Some("inv-1"));

        let update = serde_json::to_value(InvoicePaidUpdate::on("2025-02-01")).unwrap();
        assert_eq!(update, json!({ "status": "paid", "paid_date": "2025-02-01" }));
    }

    #[test]
    fn overdue_only_when_pending_and_past_due() {
        let mut invoice = stored_invoice(json!([]));
        assert!(invoice.is_overdue(day(2025, 1, 13)));
        assert!(!invoice.is_overdue(day(2025, 1, 12)));
        invoice.status = InvoiceStatus::Paid;
        assert!(!invoice.is_overdue(day(2025, 2, 1)));
    }

    #[test]
    fn printable_document_has_words_and_bank_fallback() {
        let invoice = stored_invoice(json!([
            { "description": "Paket", "quantity": 1, "unit_price": 1000000 },
            { "description": "Instalasi", "quantity": 1, "unit_price": 400000, "is_subitem": true }
        ]));
        let doc = InvoiceDocument::build(&invoice, day(2025, 6, 1));
        assert_eq!(doc.invoice_date, "05 Januari 2025");
        assert_eq!(doc.totals.total, 1_400_000 + 110_000 - 10_000);
        assert_eq!(doc.say, "satu juta lima ratus ribu Rupiah");
        assert!(doc.rows[1].indented);
        assert_eq!(doc.transfer.bank_name, "Bank BCA");
        assert_eq!(doc.transfer.account_holder, "Finance System");
    }
}
