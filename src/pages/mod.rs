use crate::drafts::DraftPayload;
use crate::editor::LetterEditor;
use crate::letter::LetterDocument;
use crate::models::SessionState;
use crate::state::draft_sync::DraftSyncController;
use crate::state::AppContext;
use crate::storage::{clear_last_draft_id, load_last_draft_id, save_last_draft_id};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params;
use leptos_router::params::Params;

/// Entry route: resume the previous draft or start a new one, then move
/// to the editor.
#[component]
pub(crate) fn RootPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let started: RwSignal<bool> = RwSignal::new(false);

    Effect::new(move |_| {
        if started.get_untracked() {
            return;
        }
        started.set(true);

        // Resume the previous session's draft when one exists.
        if let Some(id) = load_last_draft_id() {
            let _ = window().location().set_href(&format!("/card/{}", id));
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let initial = DraftPayload::from_session(&SessionState::default());
            match api_client.create_card_draft(&initial).await {
                Ok(id) => {
                    save_last_draft_id(&id);
                    let _ = window().location().set_href(&format!("/card/{}", id));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    });

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-md flex-col justify-center px-4 py-12">
                <div class="mb-2 text-sm font-medium text-foreground">"Lettercard"</div>
                {move || match error.get() {
                    Some(e) => view! {
                        <div class="text-xs text-destructive">
                            {format!("Could not start a draft: {e}")}
                        </div>
                    }
                    .into_any(),
                    None => view! {
                        <div class="text-xs text-muted-foreground">"Starting a new card draft..."</div>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct CardRouteParams {
    pub draft_id: Option<String>,
}

/// The card editor: loads (or re-loads) the draft named in the route,
/// seeds the document store and the autosave baseline, and hosts the
/// letter editor.
#[component]
pub(crate) fn CardEditorPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let sync = expect_context::<DraftSyncController>();

    let app_sv = StoredValue::new(app_state.clone());
    let sync_sv = StoredValue::new(sync);

    let params = use_params::<CardRouteParams>();

    // Use a closure so params access happens inside a reactive tracking context.
    let draft_id = move || params.get().ok().and_then(|p| p.draft_id).unwrap_or_default();

    let loading: RwSignal<bool> = RwSignal::new(true);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let action_error: RwSignal<Option<String>> = RwSignal::new(None);

    // Load guard: ignore stale responses after rapid route changes.
    let load_req_id: RwSignal<u64> = RwSignal::new(0);

    let app_for_load = app_state.clone();
    let sync_for_load = sync_sv.get_value();
    Effect::new(move |_| {
        let id = draft_id();
        if id.trim().is_empty() {
            return;
        }

        let my_req = load_req_id.get_untracked() + 1;
        load_req_id.set(my_req);
        loading.set(true);
        load_error.set(None);

        let api_client = app_for_load.0.api_client.get_untracked();
        let app_state2 = app_for_load.clone();
        let sync2 = sync_for_load.clone();
        spawn_local(async move {
            match api_client.get_card_draft(&id).await {
                Ok(payload) => {
                    if load_req_id.get_untracked() != my_req {
                        return; // stale response
                    }

                    let session = payload.restore_session(&id);
                    app_state2.0.letter.set(LetterDocument::from_saved(
                        session.letter_pages.clone(),
                        session.recipient_name.clone(),
                        session.sender_name.clone(),
                    ));

                    // Baseline = the normalized form of what was loaded, so
                    // resuming a draft does not immediately re-save it.
                    sync2.seed_baseline(DraftPayload::from_session(&session));
                    app_state2.0.session.set(session);

                    save_last_draft_id(&id);
                    loading.set(false);
                }
                Err(e) => {
                    if load_req_id.get_untracked() != my_req {
                        return;
                    }
                    load_error.set(Some(e.to_string()));
                    loading.set(false);
                }
            }
        });
    });

    // Entitlement for add-page; on failure the default quota stands.
    Effect::new(move |_| {
        let api_client = app_sv.with_value(|a| a.0.api_client.get_untracked());
        let quota = app_sv.with_value(|a| a.0.page_quota);
        spawn_local(async move {
            if let Ok(q) = api_client.get_page_quota().await {
                quota.set(q);
            }
        });
    });

    let on_finalize = move |_| {
        let id = draft_id();
        if id.trim().is_empty() {
            return;
        }
        let api_client = app_sv.with_value(|a| a.0.api_client.get_untracked());
        spawn_local(async move {
            match api_client.finalize_card_draft(&id).await {
                Ok(_) => {
                    clear_last_draft_id();
                    let _ = window().location().set_href("/");
                }
                Err(e) => action_error.set(Some(e.to_string())),
            }
        });
    };

    let on_discard = move |_| {
        let confirmed = window()
            .confirm_with_message("Discard this draft? This cannot be undone.")
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let id = draft_id();
        if id.trim().is_empty() {
            return;
        }
        let api_client = app_sv.with_value(|a| a.0.api_client.get_untracked());
        spawn_local(async move {
            match api_client.discard_card_draft(&id).await {
                Ok(_) => {
                    clear_last_draft_id();
                    let _ = window().location().set_href("/");
                }
                Err(e) => action_error.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[720px] px-4 py-8">
                <div class="mb-4 flex items-center justify-between">
                    <div class="space-y-1">
                        <h1 class="text-xl font-semibold">"Lettercard"</h1>
                        <p class="text-xs text-muted-foreground">
                            {move || format!("Draft {}", draft_id())}
                        </p>
                    </div>

                    <div class="flex items-center gap-2">
                        <button
                            class="rounded-md border px-3 py-1 text-xs font-medium"
                            on:click=on_finalize
                        >
                            "Finalize card"
                        </button>
                        <button
                            class="rounded-md border px-3 py-1 text-xs text-muted-foreground"
                            on:click=on_discard
                        >
                            "Discard"
                        </button>
                    </div>
                </div>

                {move || {
                    load_error.get().map(|e| {
                        view! {
                            <div class="mb-3 rounded-md border border-destructive/30 px-3 py-2 text-xs text-destructive">
                                {e}
                            </div>
                        }
                    })
                }}
                {move || {
                    action_error.get().map(|e| {
                        view! {
                            <div class="mb-3 rounded-md border border-destructive/30 px-3 py-2 text-xs text-destructive">
                                {e}
                            </div>
                        }
                    })
                }}

                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="text-xs text-muted-foreground">"Loading draft..."</div>
                    }
                >
                    <LetterEditor />
                </Show>
            </div>
        </div>
    }
}
