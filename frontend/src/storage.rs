use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = local_storage()?.get_item(key).ok().flatten()?;
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("discarding unreadable `{}` from local storage: {}", key, err);
            None
        }
    }
}

pub fn save_json<T: Serialize>(key: &str, value: &T) {
    if let Some(storage) = local_storage() {
        if let Ok(raw) = serde_json::to_string(value) {
            if storage.set_item(key, &raw).is_err() {
                log::warn!("could not persist `{}` to local storage", key);
            }
        }
    }
}

pub fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}
