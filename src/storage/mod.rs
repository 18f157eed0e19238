use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "lettercard_token";
pub(crate) const LAST_DRAFT_KEY: &str = "lettercard_last_draft_id";

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

/// Remember the active draft so a reload resumes the same session.
pub(crate) fn save_last_draft_id(draft_id: &str) {
    if draft_id.trim().is_empty() {
        return;
    }
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(LAST_DRAFT_KEY, draft_id);
    }
}

pub(crate) fn load_last_draft_id() -> Option<String> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    storage
        .get_item(LAST_DRAFT_KEY)
        .ok()
        .flatten()
        .filter(|s| !s.trim().is_empty())
}

pub(crate) fn clear_last_draft_id() {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.remove_item(LAST_DRAFT_KEY);
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_last_draft_id_roundtrip() {
        clear_last_draft_id();
        assert!(load_last_draft_id().is_none());

        save_last_draft_id("draft-123");
        assert_eq!(load_last_draft_id().as_deref(), Some("draft-123"));

        clear_last_draft_id();
        assert!(load_last_draft_id().is_none());
    }

    #[wasm_bindgen_test]
    fn test_blank_draft_id_is_not_persisted() {
        clear_last_draft_id();
        save_last_draft_id("   ");
        assert!(load_last_draft_id().is_none());
    }

    #[wasm_bindgen_test]
    fn test_json_storage_roundtrip() {
        let key = "lettercard_test_json";
        save_json_to_storage(key, &vec!["a".to_string(), "b".to_string()]);
        let loaded: Option<Vec<String>> = load_json_from_storage(key);
        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));
    }
}
