use serde::{Deserialize, Serialize};

use super::{de_id, de_opt_amount, required, ValidationError};
use crate::format::non_empty;
use crate::listing::Searchable;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub npwp: Option<String>,
    #[serde(default)]
    pub pks_number: Option<String>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub pks_duration: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Client {
    pub fn pks_duration_label(&self) -> String {
        match self.pks_duration {
            Some(months) => format!("{} bulan", months),
            None => "-".to_string(),
        }
    }
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        for field in [&self.email, &self.phone, &self.npwp, &self.pks_number] {
            if let Some(value) = field {
                fields.push(value.as_str());
            }
        }
        fields
    }
}

/// Insert/update payload. Blank optional fields are sent as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub npwp: Option<String>,
    pub pks_number: Option<String>,
    pub pks_duration: Option<i64>,
    pub notes: Option<String>,
}

/// Raw text of the client modal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub npwp: String,
    pub pks_number: String,
    pub pks_duration: String,
    pub notes: String,
}

impl ClientForm {
    pub fn from_client(client: &Client) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: client.name.clone(),
            email: text(&client.email),
            phone: text(&client.phone),
            address: text(&client.address),
            npwp: text(&client.npwp),
            pks_number: text(&client.pks_number),
            pks_duration: client
                .pks_duration
                .map(|months| months.to_string())
                .unwrap_or_default(),
            notes: text(&client.notes),
        }
    }

    /// `user_id` is only set on insert; updates leave ownership alone.
    pub fn to_draft(&self, user_id: Option<&str>) -> Result<ClientDraft, ValidationError> {
        let pks_duration = match non_empty(&self.pks_duration) {
            None => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .ok()
                    .filter(|months| *months >= 0)
                    .ok_or(ValidationError::InvalidNumber("Durasi PKS"))?,
            ),
        };
        Ok(ClientDraft {
            user_id: user_id.map(str::to_string),
            name: required(&self.name, "Nama mitra")?,
            email: non_empty(&self.email),
            phone: non_empty(&self.phone),
            address: non_empty(&self.address),
            npwp: non_empty(&self.npwp),
            pks_number: non_empty(&self.pks_number),
            pks_duration,
            notes: non_empty(&self.notes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Client {
        serde_json::from_value(json!({
            "id": "c-1",
            "user_id": "u-1",
            "name": "PT Tirta Sejahtera",
            "email": "finance@tirta.co.id",
            "phone": null,
            "npwp": "01.234.567.8-901.000",
            "pks_number": "PKS/2024/017",
            "pks_duration": "12",
            "created_at": "2024-05-01T08:00:00+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn reads_rows_with_missing_and_null_columns() {
        let client = sample();
        assert_eq!(client.phone, None);
        assert_eq!(client.address, None);
        assert_eq!(client.pks_duration_label(), "12 bulan");
    }

    #[test]
    fn search_covers_identifiers() {
        let client = sample();
        let fields = client.search_fields();
        assert!(fields.contains(&"PKS/2024/017"));
        assert!(fields.contains(&"01.234.567.8-901.000"));
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn blank_optional_fields_become_null() {
        let form = ClientForm {
            name: "  CV Maju  ".into(),
            email: " ".into(),
            pks_duration: "6".into(),
            ..ClientForm::default()
        };
        let draft = form.to_draft(Some("u-1")).unwrap();
        assert_eq!(draft.name, "CV Maju");
        assert_eq!(draft.email, None);
        assert_eq!(draft.pks_duration, Some(6));

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["email"], serde_json::Value::Null);
        assert_eq!(body["user_id"], "u-1");
    }

    #[test]
    fn update_payload_omits_owner() {
        let form = ClientForm::from_client(&sample());
        let body = serde_json::to_value(form.to_draft(None).unwrap()).unwrap();
        assert!(body.get("user_id").is_none());
        assert_eq!(body["pks_number"], "PKS/2024/017");
    }

    #[test]
    fn validates_name_and_duration() {
        let form = ClientForm::default();
        assert_eq!(form.to_draft(None), Err(ValidationError::Required("Nama mitra")));

        let form = ClientForm {
            name: "A".into(),
            pks_duration: "dua".into(),
            ..ClientForm::default()
        };
        assert_eq!(form.to_draft(None), Err(ValidationError::InvalidNumber("Durasi PKS")));
    }
}
