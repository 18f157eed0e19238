use crate::letter::greeting::{to_display, to_raw};

/// Edit state of one letter page.
///
/// `Saved` means the page shows committed content; `Editing` means an
/// in-progress buffer may diverge from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum PageMode {
    Editing,
    Saved,
}

#[derive(Clone, Debug)]
pub(crate) struct LetterPage {
    /// Committed raw content, the form that gets persisted.
    pub saved_content: String,

    /// Raw content of the edit in progress. Equal to `saved_content`
    /// whenever the page is in `Saved` mode.
    pub in_progress_content: String,

    pub mode: PageMode,
}

impl LetterPage {
    /// A brand-new page: empty and immediately editable.
    fn fresh() -> Self {
        Self {
            saved_content: String::new(),
            in_progress_content: String::new(),
            mode: PageMode::Editing,
        }
    }

    /// A page restored from a persisted draft.
    fn loaded(content: String) -> Self {
        Self {
            saved_content: content.clone(),
            in_progress_content: content,
            mode: PageMode::Saved,
        }
    }
}

/// The multi-page letter being edited, plus the salutation names.
///
/// Pages are positional: removing a page shifts every later page down by
/// one. At least one page always exists. All operations are synchronous
/// and in-memory; refusals are reported values, never panics.
#[derive(Clone, Debug)]
pub(crate) struct LetterDocument {
    pages: Vec<LetterPage>,
    active: usize,
    recipient_name: String,
    sender_name: String,
}

impl LetterDocument {
    pub fn new() -> Self {
        Self {
            pages: vec![LetterPage::fresh()],
            active: 0,
            recipient_name: String::new(),
            sender_name: String::new(),
        }
    }

    /// Rebuild the document from persisted page contents. Loaded pages
    /// start out `Saved`.
    pub fn from_saved(pages: Vec<String>, recipient_name: String, sender_name: String) -> Self {
        let pages: Vec<LetterPage> = if pages.is_empty() {
            vec![LetterPage::loaded(String::new())]
        } else {
            pages.into_iter().map(LetterPage::loaded).collect()
        };

        Self {
            pages,
            active: 0,
            recipient_name,
            sender_name,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_mode(&self) -> PageMode {
        self.pages[self.active].mode
    }

    pub fn recipient_name(&self) -> &str {
        &self.recipient_name
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    /// Names feed the derived header/footer only; stored raw content is
    /// never touched by a rename.
    pub fn set_recipient_name(&mut self, name: &str) {
        self.recipient_name = name.to_string();
    }

    pub fn set_sender_name(&mut self, name: &str) {
        self.sender_name = name.to_string();
    }

    /// Committed raw content of every page, in order.
    pub fn saved_pages(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.saved_content.clone()).collect()
    }

    /// Display form of a page: the current buffer with the derived
    /// header/footer spliced in.
    pub fn display_content(&self, index: usize) -> String {
        let Some(page) = self.pages.get(index) else {
            return String::new();
        };

        let raw = match page.mode {
            PageMode::Editing => &page.in_progress_content,
            PageMode::Saved => &page.saved_content,
        };

        to_display(
            raw,
            index,
            self.pages.len(),
            &self.recipient_name,
            &self.sender_name,
        )
    }

    fn strip_derived(&self, display: &str, index: usize) -> String {
        to_raw(
            display,
            index,
            self.pages.len(),
            &self.recipient_name,
            &self.sender_name,
        )
    }

    /// Switch the active page, capturing the surface's current display
    /// content into the outgoing page's in-progress buffer first (when it
    /// is being edited). Edits survive page switches without being
    /// committed. Out-of-range targets are refused.
    pub fn switch_page(&mut self, new_index: usize, current_display: &str) -> bool {
        if new_index >= self.pages.len() {
            return false;
        }

        if self.pages[self.active].mode == PageMode::Editing {
            let raw = self.strip_derived(current_display, self.active);
            self.pages[self.active].in_progress_content = raw;
        }

        self.active = new_index;
        true
    }

    /// Start editing the active page, seeding the in-progress buffer from
    /// the committed content. No-op when already editing.
    pub fn begin_edit(&mut self) {
        let page = &mut self.pages[self.active];
        if page.mode == PageMode::Saved {
            page.in_progress_content = page.saved_content.clone();
            page.mode = PageMode::Editing;
        }
    }

    /// Per-keystroke callback from the edit surface. Strips derived
    /// content defensively so a fragment can never leak into the raw
    /// buffer, whatever the surface sends.
    pub fn record_live_edit(&mut self, current_display: &str) {
        if self.pages[self.active].mode != PageMode::Editing {
            return;
        }
        let raw = self.strip_derived(current_display, self.active);
        self.pages[self.active].in_progress_content = raw;
    }

    /// Commit the active page from the freshest surface string and return
    /// the committed content of the whole letter.
    ///
    /// Returning the entire page list (not just the saved page) means a
    /// save landing after rapid page switching still carries every page.
    pub fn save_active(&mut self, current_display: &str) -> Vec<String> {
        let raw = self.strip_derived(current_display, self.active);

        let page = &mut self.pages[self.active];
        page.saved_content = raw.clone();
        page.in_progress_content = raw;
        page.mode = PageMode::Saved;

        self.saved_pages()
    }

    /// Append an empty page and activate it. `quota_ok` is the external
    /// entitlement decision; a refusal is reported, not thrown.
    pub fn add_page(&mut self, quota_ok: bool) -> bool {
        if !quota_ok {
            return false;
        }

        self.pages.push(LetterPage::fresh());
        self.active = self.pages.len() - 1;
        true
    }

    /// Remove a page, re-indexing later pages. Removing the last remaining
    /// page (or an out-of-range index) is silently refused; preventing
    /// that is a UI concern. If the active page was removed, the previous
    /// page becomes active.
    pub fn remove_page(&mut self, index: usize) -> bool {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return false;
        }

        self.pages.remove(index);

        if self.active == index {
            self.active = index.saturating_sub(1);
        } else if self.active > index {
            self.active -= 1;
        }

        true
    }

    #[cfg(test)]
    pub fn page(&self, index: usize) -> &LetterPage {
        &self.pages[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(pages: &[&str]) -> LetterDocument {
        LetterDocument::from_saved(
            pages.iter().map(|s| s.to_string()).collect(),
            "Mai".to_string(),
            "An".to_string(),
        )
    }

    #[test]
    fn test_new_document_has_one_editing_page() {
        let doc = LetterDocument::new();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.active_index(), 0);
        assert_eq!(doc.active_mode(), PageMode::Editing);
    }

    #[test]
    fn test_loaded_pages_start_saved_with_equal_buffers() {
        let doc = doc_with(&["Hello", "World"]);
        for i in 0..2 {
            assert_eq!(doc.page(i).mode, PageMode::Saved);
            assert_eq!(doc.page(i).saved_content, doc.page(i).in_progress_content);
        }
    }

    #[test]
    fn test_from_saved_empty_list_still_has_one_page() {
        let doc = LetterDocument::from_saved(vec![], String::new(), String::new());
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page(0).saved_content, "");
    }

    #[test]
    fn test_display_content_splices_header_and_footer() {
        let doc = doc_with(&["Hello", "World"]);
        assert!(doc.display_content(0).starts_with("Dear Mai,\n\nHello"));
        assert!(doc.display_content(1).ends_with("World\n\nWith love, An"));
    }

    #[test]
    fn test_switch_page_captures_uncommitted_edit_as_raw() {
        let mut doc = doc_with(&["Hello", "World"]);
        doc.begin_edit();

        // The surface hands back the display form, header included.
        assert!(doc.switch_page(1, "Dear Mai,\n\nHello edited"));

        assert_eq!(doc.active_index(), 1);
        assert_eq!(doc.page(0).mode, PageMode::Editing);
        assert_eq!(doc.page(0).in_progress_content, "Hello edited");
        // Not committed: the saved side is untouched.
        assert_eq!(doc.page(0).saved_content, "Hello");
    }

    #[test]
    fn test_switch_page_out_of_range_is_refused() {
        let mut doc = doc_with(&["Hello"]);
        assert!(!doc.switch_page(3, "Hello"));
        assert_eq!(doc.active_index(), 0);
    }

    #[test]
    fn test_begin_edit_seeds_in_progress_from_saved() {
        let mut doc = doc_with(&["Hello"]);
        doc.begin_edit();
        assert_eq!(doc.active_mode(), PageMode::Editing);
        assert_eq!(doc.page(0).in_progress_content, "Hello");
    }

    #[test]
    fn test_save_active_commits_both_buffers_and_returns_all_pages() {
        let mut doc = doc_with(&["Hello", "World"]);
        doc.switch_page(1, "");
        doc.begin_edit();

        let pages = doc.save_active("World edited\n\nWith love, An");

        assert_eq!(pages, vec!["Hello".to_string(), "World edited".to_string()]);
        assert_eq!(doc.page(1).mode, PageMode::Saved);
        assert_eq!(doc.page(1).saved_content, "World edited");
        assert_eq!(doc.page(1).in_progress_content, "World edited");
    }

    #[test]
    fn test_record_live_edit_strips_derived_content() {
        let mut doc = doc_with(&["Hello", "World"]);
        doc.begin_edit();
        doc.record_live_edit("Dear Mai,\n\nHello!!");
        assert_eq!(doc.page(0).in_progress_content, "Hello!!");
    }

    #[test]
    fn test_record_live_edit_ignored_when_not_editing() {
        let mut doc = doc_with(&["Hello"]);
        doc.record_live_edit("stray callback");
        assert_eq!(doc.page(0).in_progress_content, "Hello");
        assert_eq!(doc.active_mode(), PageMode::Saved);
    }

    #[test]
    fn test_add_page_requires_quota_and_activates_new_page() {
        let mut doc = doc_with(&["Hello"]);

        assert!(!doc.add_page(false));
        assert_eq!(doc.page_count(), 1);

        assert!(doc.add_page(true));
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.active_index(), 1);
        assert_eq!(doc.active_mode(), PageMode::Editing);
        assert_eq!(doc.page(1).saved_content, "");
    }

    #[test]
    fn test_remove_page_reindexes_and_preserves_content() {
        let mut doc = doc_with(&["a", "b", "c"]);
        assert!(doc.remove_page(1));
        assert_eq!(doc.saved_pages(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_remove_active_page_activates_previous() {
        let mut doc = doc_with(&["a", "b", "c"]);
        doc.switch_page(2, "");
        assert!(doc.remove_page(2));
        assert_eq!(doc.active_index(), 1);
    }

    #[test]
    fn test_remove_first_page_while_active_keeps_index_zero() {
        let mut doc = doc_with(&["a", "b"]);
        assert!(doc.remove_page(0));
        assert_eq!(doc.active_index(), 0);
        assert_eq!(doc.saved_pages(), vec!["b".to_string()]);
    }

    #[test]
    fn test_remove_before_active_shifts_active_down() {
        let mut doc = doc_with(&["a", "b", "c"]);
        doc.switch_page(2, "");
        assert!(doc.remove_page(0));
        // Still pointing at the same page ("c"), now at index 1.
        assert_eq!(doc.active_index(), 1);
        assert_eq!(doc.page(1).saved_content, "c");
    }

    #[test]
    fn test_remove_last_remaining_page_is_silent_noop() {
        let mut doc = doc_with(&["only"]);
        assert!(!doc.remove_page(0));
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page(0).saved_content, "only");
    }

    #[test]
    fn test_rename_never_mutates_stored_content() {
        let mut doc = doc_with(&["Hello"]);
        doc.set_recipient_name("Linh");
        doc.set_sender_name("Binh");
        assert_eq!(doc.saved_pages(), vec!["Hello".to_string()]);
        assert!(doc.display_content(0).starts_with("Dear Linh,"));
    }
}
