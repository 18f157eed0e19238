use crate::letter::PageMode;
use crate::state::draft_sync::DraftSyncController;
use crate::state::AppContext;
use crate::util::format_clock_time;
use leptos::html;
use leptos::prelude::*;

/// The letter edit surface plus its page chrome.
///
/// The textarea is the active edit surface: save paths always pull its
/// live value (never a cached copy), and every input event runs the
/// defensive display-to-raw conversion in the document store.
#[component]
pub(crate) fn LetterEditor() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let sync = expect_context::<DraftSyncController>();
    let sync_sv = StoredValue::new(sync);

    let letter = app_state.0.letter;
    let session = app_state.0.session;
    let page_quota = app_state.0.page_quota;

    let surface_ref: NodeRef<html::Textarea> = NodeRef::new();
    let surface_text: RwSignal<String> =
        RwSignal::new(letter.with_untracked(|d| d.display_content(d.active_index())));

    let quota_error: RwSignal<Option<String>> = RwSignal::new(None);

    // Freshest display string straight from the surface; the mirror signal
    // only covers the instant before the node mounts.
    let pull_surface = move || -> String {
        surface_ref
            .get_untracked()
            .map(|el| el.value())
            .unwrap_or_else(|| surface_text.get_untracked())
    };

    let refresh_surface = move || {
        let text = letter.with_untracked(|d| d.display_content(d.active_index()));
        surface_text.set(text.clone());
        if let Some(el) = surface_ref.get_untracked() {
            el.set_value(&text);
        }
    };

    let on_input = move |ev: web_sys::Event| {
        let v = event_target_value(&ev);
        surface_text.set(v.clone());
        letter.update(|d| d.record_live_edit(&v));
    };

    let on_switch = move |i: usize| {
        let current = pull_surface();
        let switched = letter
            .try_update(|d| d.switch_page(i, &current))
            .unwrap_or(false);
        if switched {
            refresh_surface();
        }
    };

    let on_edit = move |_| {
        letter.update(|d| d.begin_edit());
        refresh_surface();
    };

    let on_save = move |_| {
        let current = pull_surface();
        let pages = letter
            .try_update(|d| d.save_active(&current))
            .unwrap_or_default();
        // The whole page list, so this save carries every page even after
        // rapid switching.
        session.update(|s| s.letter_pages = pages);
        sync_sv.with_value(|s| s.note_state_changed());
        refresh_surface();
    };

    let on_add_page = move |_| {
        let quota_ok =
            letter.with_untracked(|d| d.page_count()) < page_quota.get_untracked().max_pages;
        let added = letter.try_update(|d| d.add_page(quota_ok)).unwrap_or(false);
        if !added {
            quota_error.set(Some("Page limit reached for this card.".to_string()));
            return;
        }
        quota_error.set(None);
        refresh_surface();
    };

    let on_remove_page = move |i: usize| {
        let removed = letter.try_update(|d| d.remove_page(i)).unwrap_or(false);
        if !removed {
            // Structural refusal (last page / bad index): stays silent.
            return;
        }
        let pages = letter.with_untracked(|d| d.saved_pages());
        session.update(|s| s.letter_pages = pages);
        sync_sv.with_value(|s| s.note_state_changed());
        refresh_surface();
    };

    let on_recipient_input = move |ev: web_sys::Event| {
        let v = event_target_value(&ev);
        letter.update(|d| d.set_recipient_name(&v));
        session.update(|s| s.recipient_name = v);
        sync_sv.with_value(|s| s.note_state_changed());
        refresh_surface();
    };

    let on_sender_input = move |ev: web_sys::Event| {
        let v = event_target_value(&ev);
        letter.update(|d| d.set_sender_name(&v));
        session.update(|s| s.sender_name = v);
        sync_sv.with_value(|s| s.note_state_changed());
        refresh_surface();
    };

    let sync_status = move || {
        sync_sv.with_value(|s| {
            if let Some(e) = s.last_error() {
                format!("Save failed: {e}")
            } else if s.retry_count() > 0 {
                format!("Retrying ({}/2)...", s.retry_count())
            } else if s.is_saving() {
                "Saving...".to_string()
            } else if let Some(ts) = s.last_saved_at() {
                format!("Saved at {}", format_clock_time(ts))
            } else {
                "Not saved yet".to_string()
            }
        })
    };

    view! {
        <div class="rounded-md border p-3">
            <div class="mb-3 grid grid-cols-2 gap-3">
                <div class="flex flex-col gap-1">
                    <label class="text-xs text-muted-foreground" r#for="recipient">"To"</label>
                    <input
                        id="recipient"
                        class="rounded-md border px-2 py-1 text-sm"
                        placeholder="Recipient name"
                        prop:value=move || letter.with(|d| d.recipient_name().to_string())
                        on:input=on_recipient_input
                    />
                </div>
                <div class="flex flex-col gap-1">
                    <label class="text-xs text-muted-foreground" r#for="sender">"From"</label>
                    <input
                        id="sender"
                        class="rounded-md border px-2 py-1 text-sm"
                        placeholder="Sender name"
                        prop:value=move || letter.with(|d| d.sender_name().to_string())
                        on:input=on_sender_input
                    />
                </div>
            </div>

            <div class="mb-2 flex items-center gap-1">
                {move || {
                    let count = letter.with(|d| d.page_count());
                    let active = letter.with(|d| d.active_index());
                    (0..count)
                        .map(|i| {
                            let is_active = i == active;
                            view! {
                                <button
                                    class="rounded-md border px-2 py-1 text-xs"
                                    class=("bg-accent", move || is_active)
                                    on:click=move |_| on_switch(i)
                                >
                                    {format!("Page {}", i + 1)}
                                </button>
                            }
                        })
                        .collect_view()
                }}

                <button
                    class="rounded-md border px-2 py-1 text-xs text-muted-foreground"
                    on:click=on_add_page
                >
                    "+ Page"
                </button>
                <button
                    class="rounded-md border px-2 py-1 text-xs text-muted-foreground"
                    on:click=move |_| on_remove_page(letter.with_untracked(|d| d.active_index()))
                >
                    "Remove page"
                </button>
            </div>

            {move || {
                quota_error.get().map(|e| {
                    view! {
                        <div class="mb-2 rounded-md border border-destructive/30 px-3 py-2 text-xs text-destructive">
                            {e}
                        </div>
                    }
                })
            }}

            <textarea
                node_ref=surface_ref
                class="min-h-[240px] w-full resize-y rounded-md border px-3 py-2 text-sm"
                readonly=move || letter.with(|d| d.active_mode() == PageMode::Saved)
                prop:value=move || surface_text.get()
                on:input=on_input
            ></textarea>

            <div class="mt-2 flex items-center justify-between">
                <div class="flex items-center gap-2">
                    {move || {
                        if letter.with(|d| d.active_mode()) == PageMode::Editing {
                            view! {
                                <button
                                    class="rounded-md border px-3 py-1 text-xs font-medium"
                                    on:click=on_save
                                >
                                    "Save page"
                                </button>
                            }
                            .into_any()
                        } else {
                            view! {
                                <button
                                    class="rounded-md border px-3 py-1 text-xs font-medium"
                                    on:click=on_edit
                                >
                                    "Edit page"
                                </button>
                            }
                            .into_any()
                        }
                    }}
                    <span class="text-xs text-muted-foreground">
                        {move || letter.with(|d| d.active_mode().to_string())}
                    </span>
                </div>

                <div class="text-xs text-muted-foreground">{sync_status}</div>
            </div>
        </div>
    }
}
