use serde::{Deserialize, Serialize};

use super::{de_id, required, Tone, ValidationError};
use crate::listing::Searchable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankStatus {
    #[default]
    Active,
    Inactive,
}

impl BankStatus {
    pub const ALL: [BankStatus; 2] = [BankStatus::Active, BankStatus::Inactive];

    pub fn as_str(self) -> &'static str {
        match self {
            BankStatus::Active => "active",
            BankStatus::Inactive => "inactive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BankStatus::Active => "Aktif",
            BankStatus::Inactive => "Tidak Aktif",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            BankStatus::Active => Tone::Success,
            BankStatus::Inactive => Tone::Muted,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Bank {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub account_holder: String,
    #[serde(default)]
    pub status: BankStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Bank {
    pub fn is_active(&self) -> bool {
        self.status == BankStatus::Active
    }

    /// Option text in the invoice transfer-account picker.
    pub fn picker_label(&self) -> String {
        format!("{} - {} ({})", self.bank_name, self.account_number, self.account_holder)
    }
}

impl Searchable for Bank {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.bank_name.as_str(),
            self.account_number.as_str(),
            self.account_holder.as_str(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BankDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub status: BankStatus,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BankForm {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub status: BankStatus,
}

impl BankForm {
    pub fn from_bank(bank: &Bank) -> Self {
        Self {
            bank_name: bank.bank_name.clone(),
            account_number: bank.account_number.clone(),
            account_holder: bank.account_holder.clone(),
            status: bank.status,
        }
    }

    pub fn to_draft(&self, user_id: Option<&str>, now: &str) -> Result<BankDraft, ValidationError> {
        Ok(BankDraft {
            user_id: user_id.map(str::to_string),
            bank_name: required(&self.bank_name, "Nama bank")?,
            account_number: required(&self.account_number, "Nomor rekening")?,
            account_holder: required(&self.account_holder, "Nama pemilik")?,
            status: self.status,
            updated_at: now.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("active", Some(BankStatus::Active))]
    #[case("inactive", Some(BankStatus::Inactive))]
    #[case("closed", None)]
    fn parses_status(#[case] raw: &str, #[case] expected: Option<BankStatus>) {
        assert_eq!(BankStatus::parse(raw), expected);
    }

    #[test]
    fn missing_status_defaults_to_active() {
        let bank: Bank = serde_json::from_value(json!({
            "id": 3,
            "bank_name": "Bank Mandiri",
            "account_number": "1230009876",
            "account_holder": "PT Tirta"
        }))
        .unwrap();
        assert!(bank.is_active());
        assert_eq!(bank.picker_label(), "Bank Mandiri - 1230009876 (PT Tirta)");
    }

    #[test]
    fn draft_requires_every_field() {
        let mut form = BankForm {
            bank_name: "BCA".into(),
            account_number: "".into(),
            account_holder: "Finance".into(),
            status: BankStatus::Inactive,
        };
        assert_eq!(
            form.to_draft(None, "2025-01-01T00:00:00Z"),
            Err(ValidationError::Required("Nomor rekening"))
        );

        form.account_number = "0987".into();
        let body = serde_json::to_value(form.to_draft(Some("u"), "2025-01-01T00:00:00Z").unwrap()).unwrap();
        assert_eq!(body["status"], "inactive");
        assert_eq!(body["updated_at"], "2025-01-01T00:00:00Z");
    }
}
