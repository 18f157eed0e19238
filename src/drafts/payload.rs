use crate::letter::{join_pages, split_pages};
use crate::models::{OverlayItem, PhotoRef, SessionState};
use serde::{Deserialize, Serialize};

/// Fallback defaults for optional styling/catalog fields.
///
/// The autosave engine compares payloads for equality, so an absent value
/// and an explicitly chosen default must flatten to the same thing.
pub(crate) const DEFAULT_GRADIENT_ID: &str = "gradient-sunrise";
pub(crate) const DEFAULT_PATTERN_ID: &str = "pattern-none";
pub(crate) const DEFAULT_SEAL_ID: &str = "seal-classic";
pub(crate) const DEFAULT_FONT_FAMILY: &str = "serif";
pub(crate) const DEFAULT_TEXT_COLOR: &str = "#3d3d3d";

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Canonical wire form of a card draft.
///
/// Derived from `SessionState`, never primary state. Field order is fixed
/// and collections keep their session order, so serialization is
/// deterministic and two payloads built from equal sessions are equal.
/// Keys are kebab-case to match the backend contract. `#[serde(default)]`
/// keeps older persisted drafts (missing newer fields) parseable.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct DraftPayload {
    /// All letter pages joined with the reserved page-break token.
    #[serde(rename = "letter-content")]
    pub letter_content: String,

    #[serde(rename = "recipient-name")]
    pub recipient_name: String,

    #[serde(rename = "sender-name")]
    pub sender_name: String,

    #[serde(rename = "gradient-id")]
    pub gradient_id: String,

    #[serde(rename = "pattern-id")]
    pub pattern_id: String,

    #[serde(rename = "seal-id")]
    pub seal_id: String,

    #[serde(rename = "font-family")]
    pub font_family: String,

    #[serde(rename = "text-color")]
    pub text_color: String,

    pub photos: Vec<PhotoRef>,

    pub overlays: Vec<OverlayItem>,

    #[serde(rename = "signature-url")]
    pub signature_url: String,
}

impl DraftPayload {
    /// Flatten the session into its canonical wire form.
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            letter_content: join_pages(&session.letter_pages),
            recipient_name: session.recipient_name.clone(),
            sender_name: session.sender_name.clone(),
            gradient_id: or_default(&session.gradient_id, DEFAULT_GRADIENT_ID),
            pattern_id: or_default(&session.pattern_id, DEFAULT_PATTERN_ID),
            seal_id: or_default(&session.seal_id, DEFAULT_SEAL_ID),
            font_family: or_default(&session.font_family, DEFAULT_FONT_FAMILY),
            text_color: or_default(&session.text_color, DEFAULT_TEXT_COLOR),
            photos: session.photos.clone(),
            overlays: session.overlays.clone(),
            signature_url: session.signature_url.clone(),
        }
    }

    /// Inverse of `from_session`, used when resuming a persisted draft.
    pub fn restore_session(&self, draft_id: &str) -> SessionState {
        SessionState {
            draft_id: draft_id.to_string(),
            letter_pages: split_pages(&self.letter_content),
            recipient_name: self.recipient_name.clone(),
            sender_name: self.sender_name.clone(),
            gradient_id: self.gradient_id.clone(),
            pattern_id: self.pattern_id.clone(),
            seal_id: self.seal_id.clone(),
            font_family: self.font_family.clone(),
            text_color: self.text_color.clone(),
            photos: self.photos.clone(),
            overlays: self.overlays.clone(),
            signature_url: self.signature_url.clone(),
        }
    }
}
