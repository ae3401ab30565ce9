use serde::{Deserialize, Serialize};

use super::{amount_field, de_amount, de_id, de_opt_id, required_date, ValidationError};
use crate::format::non_empty;
use crate::listing::Searchable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "Pemasukan",
            TransactionType::Expense => "Pengeluaran",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub transaction_date: String,
    #[serde(default)]
    pub reference_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Transaction {
    /// Amount with the sign of its direction; expenses are negative.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

impl Searchable for Transaction {
    fn search_fields(&self) -> Vec<&str> {
        [&self.description, &self.category]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: i64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub transaction_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CashflowTotals {
    pub income: i64,
    pub expense: i64,
}

impl CashflowTotals {
    pub fn from_transactions<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        rows.into_iter().fold(Self::default(), |mut totals, tx| {
            match tx.kind {
                TransactionType::Income => totals.income += tx.amount,
                TransactionType::Expense => totals.expense += tx.amount,
            }
            totals
        })
    }

    pub fn balance(&self) -> i64 {
        self.income - self.expense
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionForm {
    pub kind: TransactionType,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub transaction_date: String,
}

impl TransactionForm {
    pub fn new(today: &str) -> Self {
        Self {
            transaction_date: today.to_string(),
            ..Self::default()
        }
    }

    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            kind: tx.kind,
            amount: tx.amount.to_string(),
            category: tx.category.clone().unwrap_or_default(),
            description: tx.description.clone().unwrap_or_default(),
            transaction_date: tx
                .transaction_date
                .get(..10)
                .unwrap_or(&tx.transaction_date)
                .to_string(),
        }
    }

    pub fn to_draft(&self, user_id: Option<&str>) -> Result<TransactionDraft, ValidationError> {
        let amount = amount_field(&self.amount, "Jumlah")?;
        if amount <= 0 {
            return Err(ValidationError::Required("Jumlah"));
        }
        Ok(TransactionDraft {
            user_id: user_id.map(str::to_string),
            kind: self.kind,
            amount,
            category: non_empty(&self.category),
            description: non_empty(&self.description),
            transaction_date: required_date(&self.transaction_date, "transaksi")?,
            reference_type: None,
            reference_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(kind: &str, amount: i64) -> Transaction {
        serde_json::from_value(json!({
            "id": "t",
            "type": kind,
            "amount": amount,
            "transaction_date": "2025-01-10"
        }))
        .unwrap()
    }

    #[test]
    fn totals_split_by_direction() {
        let rows = vec![tx("income", 1_000_000), tx("expense", 250_000), tx("income", 500_000)];
        let totals = CashflowTotals::from_transactions(&rows);
        assert_eq!(totals.income, 1_500_000);
        assert_eq!(totals.expense, 250_000);
        assert_eq!(totals.balance(), 1_250_000);
        assert_eq!(rows[1].signed_amount(), -250_000);
    }

    #[test]
    fn empty_rows_have_zero_balance() {
        let totals = CashflowTotals::from_transactions(&Vec::<Transaction>::new());
        assert_eq!(totals.balance(), 0);
    }

    #[test]
    fn form_requires_positive_amount_and_date() {
        let mut form = TransactionForm::new("2025-02-01");
        form.amount = "0".into();
        assert_eq!(form.to_draft(None), Err(ValidationError::Required("Jumlah")));

        form.amount = "1.250.000".into();
        form.kind = TransactionType::Expense;
        form.category = "Operasional".into();
        let draft = form.to_draft(Some("u-1")).unwrap();
        assert_eq!(draft.amount, 1_250_000);

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["type"], "expense");
        assert!(body.get("reference_type").is_none());
        assert_eq!(body["description"], serde_json::Value::Null);

        form.transaction_date = "".into();
        assert_eq!(form.to_draft(None), Err(ValidationError::Required("transaksi")));
    }

    #[test]
    fn searches_description_and_category() {
        let mut row = tx("expense", 10);
        assert!(row.search_fields().is_empty());
        row.category = Some("Listrik".into());
        row.description = Some("Tagihan PLN".into());
        assert_eq!(row.search_fields(), vec!["Tagihan PLN", "Listrik"]);
    }
}
