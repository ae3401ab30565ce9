use super::{Backend, BackendError, Order};
use crate::model::{Notification, NotificationDraft, ReadFlag};

const TABLE: &str = "notifications";
/// How many rows the header panel shows.
pub const PANEL_LIMIT: usize = 50;

pub async fn create(backend: &Backend, draft: &NotificationDraft) -> Result<(), BackendError> {
    backend.from(TABLE).insert(draft).await
}

pub async fn latest(backend: &Backend, user_id: &str) -> Result<Vec<Notification>, BackendError> {
    backend
        .from(TABLE)
        .eq("user_id", user_id)
        .order("created_at", Order::Desc)
        .limit(PANEL_LIMIT)
        .fetch()
        .await
}

pub async fn unread(backend: &Backend, user_id: &str) -> Result<Vec<Notification>, BackendError> {
    backend
        .from(TABLE)
        .eq("user_id", user_id)
        .eq("is_read", false)
        .order("created_at", Order::Desc)
        .fetch()
        .await
}

pub async fn mark_read(backend: &Backend, id: &str) -> Result<(), BackendError> {
    backend.from(TABLE).eq("id", id).update(&ReadFlag::READ).await
}

pub async fn mark_all_read(backend: &Backend, user_id: &str) -> Result<(), BackendError> {
    backend
        .from(TABLE)
        .eq("user_id", user_id)
        .eq("is_read", false)
        .update(&ReadFlag::READ)
        .await
}

pub fn unread_count(rows: &[Notification]) -> usize {
    rows.iter().filter(|row| !row.is_read).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_unread_rows() {
        let rows: Vec<Notification> = serde_json::from_value(json!([
            { "id": 1, "type": "info", "title": "a", "message": "", "is_read": false },
            { "id": 2, "type": "info", "title": "b", "message": "", "is_read": true },
            { "id": 3, "type": "recon_mismatch", "title": "c", "message": "" }
        ]))
        .unwrap();
        assert_eq!(unread_count(&rows), 2);
        assert_eq!(unread_count(&[]), 0);
    }
}
