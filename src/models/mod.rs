use serde::{Deserialize, Serialize};

/// Fallback page limit when the entitlement endpoint is unavailable.
pub(crate) const DEFAULT_MAX_PAGES: usize = 5;

/// Reference to an uploaded photo placed on the card.
///
/// Uploads themselves happen elsewhere; the session only tracks the
/// resulting URL and which slot it fills.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct PhotoRef {
    pub url: String,

    #[serde(rename = "slot-index")]
    pub slot_index: u32,
}

/// A decorative overlay (sticker) with its placement on the card.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct OverlayItem {
    #[serde(rename = "asset-id")]
    pub asset_id: String,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Page quota granted by the backend entitlement check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PageQuota {
    pub max_pages: usize,
}

impl Default for PageQuota {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Full state of one card-creation session.
///
/// Owned exclusively by the creation session: created on draft start,
/// mutated only through named operations in the editor, terminated on
/// finalize or discard. The wire form is `drafts::DraftPayload`, derived
/// from this on every change.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SessionState {
    pub draft_id: String,

    /// Raw (stored-form) content of each saved letter page, in order.
    pub letter_pages: Vec<String>,
    pub recipient_name: String,
    pub sender_name: String,

    /// Catalog selections; identifiers only, the catalog itself lives elsewhere.
    pub gradient_id: String,
    pub pattern_id: String,
    pub seal_id: String,

    pub font_family: String,
    pub text_color: String,

    pub photos: Vec<PhotoRef>,
    pub overlays: Vec<OverlayItem>,

    /// URL of the drawn signature image, empty when none.
    pub signature_url: String,
}
