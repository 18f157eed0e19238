/// Reserved token separating letter pages inside the persisted draft string.
///
/// There is no escaping scheme: content containing the token verbatim will
/// split into extra pages. Changing that would change the storage format
/// under existing drafts, so the limitation stands.
pub(crate) const PAGE_DELIMITER: &str = "---PAGE-BREAK---";

/// Join ordered page contents into the single persisted string.
///
/// Never trims page content; the delimiter carries its own surrounding
/// newlines so `split_pages` can recover the pages.
pub(crate) fn join_pages(pages: &[String]) -> String {
    pages.join(&format!("\n{PAGE_DELIMITER}\n"))
}

/// Split persisted content back into pages.
///
/// Drafts created before multi-page letters have no delimiter; the whole
/// content is page 0, returned unchanged. Empty input is a one-page letter
/// with empty content, never an empty list.
pub(crate) fn split_pages(content: &str) -> Vec<String> {
    if content.contains(PAGE_DELIMITER) {
        content
            .split(PAGE_DELIMITER)
            .map(|segment| segment.trim().to_string())
            .collect()
    } else {
        vec![content.to_string()]
    }
}
