use crate::pages::{CardEditorPage, RootPage};
use crate::state::draft_sync::DraftSyncController;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app_state = AppContext(AppState::new());
    provide_context(app_state.clone());

    // One sync controller for the app lifetime; unload/pagehide listeners
    // registered once.
    let sync = DraftSyncController::new(app_state);
    sync.start();
    provide_context(sync);

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("card/:draft_id") view=CardEditorPage />
                <Route path=path!("") view=RootPage />
            </Routes>
        </Router>
    }
}
