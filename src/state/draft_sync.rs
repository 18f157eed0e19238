use crate::drafts::DraftPayload;
use crate::state::AppContext;
use crate::util::now_ms;
use futures::channel::oneshot;
use futures::future::{select, Either};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Debounce window for draft autosave.
const AUTOSAVE_MS: i32 = 800;

/// Backoff ladder for transient write failures: 1s, then 2s, then give up.
pub(crate) fn backoff_delay_ms(attempt: u32) -> Option<i32> {
    match attempt {
        1 => Some(1_000),
        2 => Some(2_000),
        _ => None,
    }
}

/// Whether the current canonical payload needs transmitting.
fn is_dirty(current: &DraftPayload, baseline: Option<&DraftPayload>) -> bool {
    baseline.map_or(true, |b| b != current)
}

/// Global autosave controller for the card draft.
///
/// Responsibilities:
/// - debounced autosave of the canonical payload (micro-edits coalesce)
/// - skip transmission when the payload equals the acknowledged baseline
/// - supersession: a newer write cancels the in-flight one at the transport
/// - retry with backoff on transient failures
/// - beforeunload confirmation + best-effort pagehide flush
///
/// Non-responsibilities:
/// - editor UI state (active page, buffers; see `letter::LetterDocument`)
#[derive(Clone)]
pub(crate) struct DraftSyncController {
    app_state: AppContext,

    autosave_ms: i32,
    debounce_timer_id: RwSignal<Option<i32>>,

    /// The payload most recently acknowledged by the backend. Equality
    /// against this gates every transmission.
    last_sent: RwSignal<Option<DraftPayload>>,

    /// Monotonic attempt sequence; a superseded attempt's completion is
    /// discarded even if its response still lands.
    attempt_seq: RwSignal<u64>,

    /// Cancel handle for the in-flight write, if any. Firing it drops the
    /// request future, which aborts the underlying fetch.
    cancel_tx: StoredValue<Option<oneshot::Sender<()>>>,

    retry_timer_id: RwSignal<Option<i32>>,

    /// Observational state for the saving indicator.
    is_saving: RwSignal<bool>,
    last_saved_at: RwSignal<Option<i64>>,
    last_error: RwSignal<Option<String>>,
    retry_count: RwSignal<u32>,

    /// Global listeners (keep handles alive).
    _unload_handle: StoredValue<Option<WindowListenerHandle>>,
    _pagehide_handle: StoredValue<Option<WindowListenerHandle>>,
}

impl DraftSyncController {
    pub fn new(app_state: AppContext) -> Self {
        Self {
            app_state,
            autosave_ms: AUTOSAVE_MS,
            debounce_timer_id: RwSignal::new(None),
            last_sent: RwSignal::new(None),
            attempt_seq: RwSignal::new(0),
            cancel_tx: StoredValue::new(None),
            retry_timer_id: RwSignal::new(None),
            is_saving: RwSignal::new(false),
            last_saved_at: RwSignal::new(None),
            last_error: RwSignal::new(None),
            retry_count: RwSignal::new(0),
            _unload_handle: StoredValue::new(None),
            _pagehide_handle: StoredValue::new(None),
        }
    }

    /// Register the unload listeners. Called once from `<App>`.
    pub fn start(&self) {
        self.start_global_listeners();
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving.get()
    }

    pub fn last_saved_at(&self) -> Option<i64> {
        self.last_saved_at.get()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count.get()
    }

    /// Adopt a freshly loaded draft as the acknowledged baseline so that
    /// resuming a draft does not immediately re-save it.
    pub fn seed_baseline(&self, payload: DraftPayload) {
        self.last_sent.set(Some(payload));
    }

    fn build_payload(&self) -> DraftPayload {
        self.app_state
            .0
            .session
            .with_untracked(DraftPayload::from_session)
    }

    /// Canonical payload iff it differs from the acknowledged baseline.
    fn dirty_payload(&self) -> Option<DraftPayload> {
        let payload = self.build_payload();
        if is_dirty(&payload, self.last_sent.with_untracked(|b| b.clone()).as_ref()) {
            Some(payload)
        } else {
            None
        }
    }

    /// Called after every named session mutation. Unchanged payloads are
    /// dropped here; changed ones (re)start the debounce window, so only
    /// the most recent state within the window gets sent.
    pub fn note_state_changed(&self) {
        if self.dirty_payload().is_none() {
            return;
        }
        self.schedule_flush();
    }

    /// Bypass the debounce window (unload path, explicit flush).
    pub fn force_save(&self) {
        self.clear_debounce_timer();
        self.flush();
    }

    fn schedule_flush(&self) {
        let Some(win) = web_sys::window() else {
            return;
        };

        if let Some(tid) = self.debounce_timer_id.get_untracked() {
            let _ = win.clear_timeout_with_handle(tid);
        }

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.debounce_timer_id.set(None);
            s2.flush();
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                self.autosave_ms,
            )
            .unwrap_or(0);

        self.debounce_timer_id.set(Some(tid));
    }

    fn clear_debounce_timer(&self) {
        if let Some(win) = web_sys::window() {
            if let Some(tid) = self.debounce_timer_id.get_untracked() {
                let _ = win.clear_timeout_with_handle(tid);
            }
        }
        self.debounce_timer_id.set(None);
    }

    fn clear_retry_timer(&self) {
        if let Some(win) = web_sys::window() {
            if let Some(tid) = self.retry_timer_id.get_untracked() {
                let _ = win.clear_timeout_with_handle(tid);
            }
        }
        self.retry_timer_id.set(None);
    }

    fn cancel_in_flight(&self) {
        let mut taken: Option<oneshot::Sender<()>> = None;
        self.cancel_tx.update_value(|slot| taken = slot.take());
        if let Some(tx) = taken {
            // The receiver side wins the select and drops the request.
            let _ = tx.send(());
        }
    }

    /// The payload is recomputed from live state at fire time, so the
    /// freshest edit always wins over whatever the timer was started for.
    fn flush(&self) {
        let Some(payload) = self.dirty_payload() else {
            return;
        };
        self.transmit(payload, 1);
    }

    fn transmit(&self, payload: DraftPayload, attempt: u32) {
        let draft_id = self
            .app_state
            .0
            .session
            .with_untracked(|s| s.draft_id.clone());
        if draft_id.trim().is_empty() {
            // Draft not created yet; the creation path will re-trigger.
            return;
        }

        // A newer write supersedes any in-flight or scheduled one.
        self.cancel_in_flight();
        self.clear_retry_timer();

        let seq = self.attempt_seq.get_untracked() + 1;
        self.attempt_seq.set(seq);

        let (tx, rx) = oneshot::channel::<()>();
        self.cancel_tx.set_value(Some(tx));

        self.is_saving.set(true);

        let api_client = self.app_state.0.api_client.get_untracked();
        let s2 = self.clone();
        spawn_local(async move {
            // The request future must borrow the payload across the await,
            // yet `payload` still needs to move into `mark_saved`/`handle_failure`
            // afterwards. Borrow an identical clone for the request (the API
            // clones the payload internally regardless) so the original stays
            // free to move out of the match arm.
            let send_payload = payload.clone();
            let send = Box::pin(api_client.update_card_draft(&draft_id, &send_payload));

            match select(send, rx).await {
                Either::Left((result, _rx)) => {
                    if s2.attempt_seq.get_untracked() != seq {
                        // Superseded while completing: a stale response must
                        // not become the baseline.
                        return;
                    }
                    s2.cancel_tx.set_value(None);

                    match result {
                        Ok(_) => s2.mark_saved(payload),
                        Err(e) => s2.handle_failure(payload, attempt, e),
                    }
                }
                Either::Right((_cancelled, send)) => {
                    // Superseded: dropping the request future aborts the
                    // underlying fetch, so the write never lands.
                    drop(send);
                }
            };
        });
    }

    fn mark_saved(&self, payload: DraftPayload) {
        self.last_sent.set(Some(payload));
        self.last_saved_at.set(Some(now_ms()));
        self.last_error.set(None);
        self.retry_count.set(0);
        self.is_saving.set(false);
    }

    fn handle_failure(&self, payload: DraftPayload, attempt: u32, err: crate::api::ApiError) {
        if err.is_transient() {
            if let Some(delay) = backoff_delay_ms(attempt) {
                self.retry_count.set(attempt);
                self.schedule_retry(payload, attempt + 1, delay);
                return;
            }
        }

        // Terminal: surface the error, keep local state authoritative.
        self.is_saving.set(false);
        self.last_error.set(Some(err.to_string()));
    }

    fn schedule_retry(&self, payload: DraftPayload, next_attempt: u32, delay_ms: i32) {
        let Some(win) = web_sys::window() else {
            return;
        };

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.retry_timer_id.set(None);
            // Same canonical payload; a newer flush would have cancelled
            // this timer in transmit().
            s2.transmit(payload, next_attempt);
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                delay_ms,
            )
            .unwrap_or(0);

        self.retry_timer_id.set(Some(tid));
    }

    fn start_global_listeners(&self) {
        // beforeunload -> blocking confirmation while unsaved changes exist.
        // Re-derived from live state; a snapshot could miss the newest edit.
        let s2 = self.clone();
        let unload = window_event_listener(ev::beforeunload, move |ev: web_sys::BeforeUnloadEvent| {
            let dirty = s2.dirty_payload().is_some() || s2.is_saving.get_untracked();
            if dirty {
                s2.force_save();
                ev.prevent_default();
                ev.set_return_value("You have unsaved changes.");
            }
        });
        self._unload_handle.set_value(Some(unload));

        // pagehide -> best-effort flush of whatever is still pending.
        let s3 = self.clone();
        let pagehide =
            window_event_listener(ev::pagehide, move |_ev: web_sys::PageTransitionEvent| {
                s3.force_save();
            });
        self._pagehide_handle.set_value(Some(pagehide));
    }
}
