use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{de_id, ReconciliationDraft};

pub const RECON_MISMATCH: &str = "recon_mismatch";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NotificationDraft {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl NotificationDraft {
    pub fn recon_mismatch(user_id: &str, recon: &ReconciliationDraft) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: RECON_MISMATCH.to_string(),
            title: "Rekonsiliasi tidak cocok".to_string(),
            message: recon.mismatch_message(),
            data: serde_json::to_string(recon).ok(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReadFlag {
    pub is_read: bool,
}

impl ReadFlag {
    pub const READ: ReadFlag = ReadFlag { is_read: true };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReconForm, ReconStatus};
    use serde_json::json;

    #[test]
    fn mismatch_notification_carries_recon_snapshot() {
        let recon = ReconForm {
            customer_name: "Siti".into(),
            pdam_code: "PDAM-BDG".into(),
            total_bill: "100000".into(),
            payment_amount: "90000".into(),
            status: ReconStatus::Unmatched,
            ..ReconForm::new("2025-01-01")
        }
        .to_draft(Some("u-1"))
        .unwrap();

        let draft = NotificationDraft::recon_mismatch("u-1", &recon);
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["type"], RECON_MISMATCH);
        assert!(body["message"].as_str().unwrap().ends_with("Selisih: -Rp 10.000"));

        let data: Value = serde_json::from_str(body["data"].as_str().unwrap()).unwrap();
        assert_eq!(data["difference"], -10_000);
    }

    #[test]
    fn reads_rows_with_json_data() {
        let row: Notification = serde_json::from_value(json!({
            "id": 1,
            "type": "info",
            "title": "Halo",
            "message": "Pesan",
            "data": { "a": 1 },
            "is_read": false
        }))
        .unwrap();
        assert_eq!(row.id, "1");
        assert!(!row.is_read);
        assert_eq!(serde_json::to_value(ReadFlag::READ).unwrap(), json!({ "is_read": true }));
    }
}
