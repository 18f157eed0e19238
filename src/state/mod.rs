pub(crate) mod draft_sync;

use crate::api::ApiClient;
use crate::letter::LetterDocument;
use crate::models::{PageQuota, SessionState};
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Full draft session. The canonical payload is flattened from this on
    /// every change; committed letter pages live here, not in `letter`.
    pub session: RwSignal<SessionState>,

    /// The letter being edited (per-page saved/in-progress buffers).
    pub letter: RwSignal<LetterDocument>,

    /// Entitlement consumed by add-page.
    pub page_quota: RwSignal<PageQuota>,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::load_from_storage();

        Self {
            api_client: RwSignal::new(stored_client),
            session: RwSignal::new(SessionState::default()),
            letter: RwSignal::new(LetterDocument::new()),
            page_quota: RwSignal::new(PageQuota::default()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
