use serde::{Deserialize, Serialize};

use super::{
    amount_field, de_amount, de_id, optional_date, required, required_date, Tone, ValidationError,
};
use crate::format::{format_currency, non_empty};
use crate::listing::Searchable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconStatus {
    #[default]
    Pending,
    Matched,
    Unmatched,
}

impl ReconStatus {
    pub const ALL: [ReconStatus; 3] = [ReconStatus::Pending, ReconStatus::Matched, ReconStatus::Unmatched];

    pub fn as_str(self) -> &'static str {
        match self {
            ReconStatus::Pending => "pending",
            ReconStatus::Matched => "matched",
            ReconStatus::Unmatched => "unmatched",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReconStatus::Pending => "Menunggu",
            ReconStatus::Matched => "Cocok",
            ReconStatus::Unmatched => "Tidak Cocok",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            ReconStatus::Pending => Tone::Warning,
            ReconStatus::Matched => Tone::Success,
            ReconStatus::Unmatched => Tone::Danger,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

/// Positive when more was paid than billed; `None` on overflow.
pub fn difference(payment_amount: i64, total_bill: i64) -> Option<i64> {
    payment_amount.checked_sub(total_bill)
}

/// Any status may be chosen except `Matched` while the amounts disagree.
pub fn check_status(status: ReconStatus, difference: i64) -> Result<(), ValidationError> {
    if status == ReconStatus::Matched && difference != 0 {
        return Err(ValidationError::MatchedWithDifference(format_currency(difference)));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Reconciliation {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub partner_code: Option<String>,
    #[serde(default)]
    pub recon_date: String,
    #[serde(default)]
    pub pdam_code: Option<String>,
    #[serde(default)]
    pub connection_number: Option<String>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_bill: i64,
    #[serde(default, deserialize_with = "de_amount")]
    pub payment_amount: i64,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub payment_location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ReconStatus,
    #[serde(default, deserialize_with = "de_amount")]
    pub difference: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Reconciliation {
    pub fn is_balanced(&self) -> bool {
        self.difference == 0
    }
}

impl Searchable for Reconciliation {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.customer_name.as_str()];
        fields.extend(self.partner_code.as_deref());
        fields.extend(self.pdam_code.as_deref());
        fields
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReconciliationDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub partner_code: Option<String>,
    pub recon_date: String,
    pub pdam_code: Option<String>,
    pub connection_number: Option<String>,
    pub customer_name: String,
    pub total_bill: i64,
    pub payment_amount: i64,
    pub account_number: Option<String>,
    pub payment_date: Option<String>,
    pub payment_location: Option<String>,
    pub notes: Option<String>,
    pub status: ReconStatus,
    pub difference: i64,
}

impl ReconciliationDraft {
    /// Only a non-zero difference raises a mismatch, whatever the status.
    pub fn is_mismatch(&self) -> bool {
        self.difference != 0
    }

    /// Body of the `recon_mismatch` notification.
    pub fn mismatch_message(&self) -> String {
        format!(
            "PDAM: {}\nPelanggan: {}\nSelisih: {}",
            self.pdam_code.as_deref().unwrap_or("-"),
            self.customer_name,
            format_currency(self.difference)
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconForm {
    pub partner_code: String,
    pub recon_date: String,
    pub pdam_code: String,
    pub connection_number: String,
    pub customer_name: String,
    pub total_bill: String,
    pub payment_amount: String,
    pub account_number: String,
    pub payment_date: String,
    pub payment_location: String,
    pub notes: String,
    pub status: ReconStatus,
}

impl ReconForm {
    pub fn new(today: &str) -> Self {
        Self {
            recon_date: today.to_string(),
            ..Self::default()
        }
    }

    pub fn from_reconciliation(recon: &Reconciliation) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            partner_code: text(&recon.partner_code),
            recon_date: recon.recon_date.clone(),
            pdam_code: text(&recon.pdam_code),
            connection_number: text(&recon.connection_number),
            customer_name: recon.customer_name.clone(),
            total_bill: recon.total_bill.to_string(),
            payment_amount: recon.payment_amount.to_string(),
            account_number: text(&recon.account_number),
            payment_date: text(&recon.payment_date),
            payment_location: text(&recon.payment_location),
            notes: text(&recon.notes),
            status: recon.status,
        }
    }

    /// Live difference shown while typing; unreadable amounts count as zero.
    pub fn live_difference(&self) -> i64 {
        let amount = |raw: &str| crate::format::parse_amount(raw).unwrap_or(0);
        amount(&self.payment_amount).saturating_sub(amount(&self.total_bill))
    }

    pub fn to_draft(&self, user_id: Option<&str>) -> Result<ReconciliationDraft, ValidationError> {
        let customer_name = required(&self.customer_name, "Nama pelanggan")?;
        let recon_date = required_date(&self.recon_date, "rekonsiliasi")?;
        let total_bill = amount_field(&self.total_bill, "Total tagihan")?;
        let payment_amount = amount_field(&self.payment_amount, "Jumlah bayar")?;
        let difference = difference(payment_amount, total_bill)
            .ok_or(ValidationError::AmountOutOfRange("Selisih"))?;
        check_status(self.status, difference)?;

        Ok(ReconciliationDraft {
            user_id: user_id.map(str::to_string),
            partner_code: non_empty(&self.partner_code),
            recon_date,
            pdam_code: non_empty(&self.pdam_code),
            connection_number: non_empty(&self.connection_number),
            customer_name,
            total_bill,
            payment_amount,
            account_number: non_empty(&self.account_number),
            payment_date: optional_date(&self.payment_date, "pembayaran")?,
            payment_location: non_empty(&self.payment_location),
            notes: non_empty(&self.notes),
            status: self.status,
            difference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form(bill: &str, paid: &str, status: ReconStatus) -> ReconForm {
        ReconForm {
            customer_name: "Budi Santoso".into(),
            pdam_code: "PDAM-JKT".into(),
            total_bill: bill.into(),
            payment_amount: paid.into(),
            status,
            ..ReconForm::new("2025-01-20")
        }
    }

    #[rstest]
    #[case(150_000, 150_000, 0)]
    #[case(150_000, 100_000, -50_000)]
    #[case(100_000, 120_500, 20_500)]
    fn difference_is_payment_minus_bill(#[case] bill: i64, #[case] paid: i64, #[case] expected: i64) {
        assert_eq!(difference(paid, bill), Some(expected));
    }

    #[test]
    fn difference_reports_overflow() {
        assert_eq!(difference(i64::MAX, -1), None);
        assert_eq!(difference(i64::MIN, 1), None);
    }

    #[test]
    fn huge_amounts_are_rejected_not_wrapped() {
        let extreme = form("-1e19", "1e19", ReconStatus::Pending);
        assert_eq!(extreme.live_difference(), 0);
        assert_eq!(
            extreme.to_draft(None),
            Err(ValidationError::InvalidNumber("Total tagihan"))
        );

        let widest = form("-1000000000000000", "1000000000000000", ReconStatus::Pending);
        assert_eq!(widest.live_difference(), 2_000_000_000_000_000);
        assert_eq!(widest.to_draft(None).unwrap().difference, 2_000_000_000_000_000);
    }

    #[rstest]
    #[case(ReconStatus::Matched, 0, true)]
    #[case(ReconStatus::Matched, -1, false)]
    #[case(ReconStatus::Matched, 5_000, false)]
    #[case(ReconStatus::Unmatched, 0, true)]
    #[case(ReconStatus::Unmatched, 5_000, true)]
    #[case(ReconStatus::Pending, -5_000, true)]
    fn matched_requires_zero_difference(#[case] status: ReconStatus, #[case] diff: i64, #[case] allowed: bool) {
        assert_eq!(check_status(status, diff).is_ok(), allowed);
    }

    #[test]
    fn draft_computes_difference() {
        let draft = form("150000", "100000", ReconStatus::Unmatched).to_draft(Some("u")).unwrap();
        assert_eq!(draft.difference, -50_000);
        assert_eq!(
            draft.mismatch_message(),
            "PDAM: PDAM-JKT\nPelanggan: Budi Santoso\nSelisih: -Rp 50.000"
        );
    }

    #[rstest]
    #[case("150000", "100000", ReconStatus::Unmatched, true)]
    #[case("150000", "150000", ReconStatus::Unmatched, false)]
    #[case("150000", "160000", ReconStatus::Pending, true)]
    #[case("150000", "150000", ReconStatus::Matched, false)]
    fn mismatch_follows_the_difference_only(
        #[case] bill: &str,
        #[case] paid: &str,
        #[case] status: ReconStatus,
        #[case] flagged: bool,
    ) {
        assert_eq!(form(bill, paid, status).to_draft(None).unwrap().is_mismatch(), flagged);
    }

    #[test]
    fn draft_rejects_matched_with_gap() {
        let result = form("150000", "100000", ReconStatus::Matched).to_draft(None);
        assert_eq!(
            result,
            Err(ValidationError::MatchedWithDifference("-Rp 50.000".into()))
        );
        assert!(form("150000", "150000", ReconStatus::Matched).to_draft(None).is_ok());
    }

    #[test]
    fn live_difference_tolerates_partial_input() {
        assert_eq!(form("", "2.500", ReconStatus::Pending).live_difference(), 2_500);
        assert_eq!(form("abc", "", ReconStatus::Pending).live_difference(), 0);
    }

    #[test]
    fn search_skips_missing_codes() {
        let recon: Reconciliation = serde_json::from_value(serde_json::json!({
            "id": 9,
            "customer_name": "Siti",
            "pdam_code": "PDAM-BDG",
            "recon_date": "2025-01-01",
            "difference": "0"
        }))
        .unwrap();
        assert_eq!(recon.search_fields(), vec!["Siti", "PDAM-BDG"]);
        assert!(recon.is_balanced());
    }
}
