//! Salutation header / closing footer spliced into the display form of a
//! letter page. Derived content only: it is attached for display and
//! stripped before anything is stored or transmitted.
//!
//! Both directions share the same fragment templates. If the attach and
//! strip sides ever disagree on wording, stripping stops matching and
//! duplicate fragments accumulate in stored content.

/// "Dear {recipient}," for page 0 only.
pub(crate) fn salutation_header(recipient: &str) -> String {
    format!("Dear {},", recipient.trim())
}

/// "With love, {sender}" for the last page only.
pub(crate) fn closing_footer(sender: &str) -> String {
    format!("With love, {}", sender.trim())
}

fn has_recipient(recipient: &str) -> bool {
    !recipient.trim().is_empty()
}

fn has_sender(sender: &str) -> bool {
    !sender.trim().is_empty()
}

fn is_first(page_index: usize) -> bool {
    page_index == 0
}

fn is_last(page_index: usize, page_count: usize) -> bool {
    page_count > 0 && page_index == page_count - 1
}

/// Project the display form of a page from its raw (stored) content.
///
/// A single-page letter gets both the header and the footer.
pub(crate) fn to_display(
    raw: &str,
    page_index: usize,
    page_count: usize,
    recipient: &str,
    sender: &str,
) -> String {
    let mut out = raw.to_string();

    if is_first(page_index) && has_recipient(recipient) {
        out = format!("{}\n\n{}", salutation_header(recipient), out);
    }

    if is_last(page_index, page_count) && has_sender(sender) {
        out = format!("{}\n\n{}", out, closing_footer(sender));
    }

    out
}

/// Recover the raw content from a display string.
///
/// Anchored: the header is only stripped from the very start, the footer
/// only from the very end, and only with the exact wording `to_display`
/// attaches. Tolerant of absence (the user may have deleted a fragment).
/// Blank lines between a fragment and the content collapse, so extra
/// newlines typed around a fragment do not leak into stored content.
pub(crate) fn to_raw(
    display: &str,
    page_index: usize,
    page_count: usize,
    recipient: &str,
    sender: &str,
) -> String {
    let mut s: &str = display;

    if is_first(page_index) && has_recipient(recipient) {
        let header = salutation_header(recipient);
        if let Some(rest) = s.strip_prefix(header.as_str()) {
            s = rest.trim_start_matches('\n');
        }
    }

    if is_last(page_index, page_count) && has_sender(sender) {
        let footer = closing_footer(sender);
        if let Some(rest) = s.strip_suffix(footer.as_str()) {
            s = rest.trim_end_matches('\n');
        }
    }

    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_display_gets_header() {
        let display = to_display("Hello", 0, 2, "Mai", "An");
        assert_eq!(display, "Dear Mai,\n\nHello");
    }

    #[test]
    fn test_last_page_display_gets_footer() {
        let display = to_display("World", 1, 2, "Mai", "An");
        assert_eq!(display, "World\n\nWith love, An");
    }

    #[test]
    fn test_middle_page_display_is_untouched() {
        assert_eq!(to_display("middle", 1, 3, "Mai", "An"), "middle");
    }

    #[test]
    fn test_single_page_gets_both_fragments() {
        let display = to_display("Hi", 0, 1, "Mai", "An");
        assert_eq!(display, "Dear Mai,\n\nHi\n\nWith love, An");
    }

    #[test]
    fn test_blank_names_attach_nothing() {
        assert_eq!(to_display("Hello", 0, 1, "", ""), "Hello");
        assert_eq!(to_display("Hello", 0, 1, "   ", "\t"), "Hello");
    }

    #[test]
    fn test_roundtrip_recovers_raw_exactly() {
        for raw in ["Hello", "World", "", "two\nlines", "  indented"] {
            for (idx, count) in [(0, 1), (0, 2), (1, 2), (1, 3)] {
                let display = to_display(raw, idx, count, "Mai", "An");
                assert_eq!(
                    to_raw(&display, idx, count, "Mai", "An"),
                    raw,
                    "raw={raw:?} idx={idx} count={count}"
                );
            }
        }
    }

    #[test]
    fn test_to_raw_tolerates_missing_fragments() {
        // The user deleted the header from the surface; nothing to strip.
        assert_eq!(to_raw("just text", 0, 1, "Mai", "An"), "just text");
    }

    #[test]
    fn test_to_raw_collapses_extra_blank_lines_after_header() {
        assert_eq!(to_raw("Dear Mai,\n\n\n\nHello", 0, 2, "Mai", "An"), "Hello");
    }

    #[test]
    fn test_to_raw_collapses_extra_blank_lines_before_footer() {
        assert_eq!(
            to_raw("World\n\n\n\nWith love, An", 1, 2, "Mai", "An"),
            "World"
        );
    }

    #[test]
    fn test_to_raw_header_only_strips_at_start() {
        let display = "note: Dear Mai, is the greeting";
        assert_eq!(to_raw(display, 0, 2, "Mai", "An"), display);
    }

    #[test]
    fn test_to_raw_footer_only_strips_at_end() {
        let display = "With love, An is how it ends";
        assert_eq!(to_raw(display, 1, 2, "Mai", "An"), display);
    }

    #[test]
    fn test_names_are_trimmed_in_fragments() {
        let display = to_display("Hi", 0, 1, " Mai ", " An ");
        assert_eq!(display, "Dear Mai,\n\nHi\n\nWith love, An");
        assert_eq!(to_raw(&display, 0, 1, " Mai ", " An "), "Hi");
    }

    #[test]
    fn test_empty_raw_single_page_roundtrip() {
        let display = to_display("", 0, 1, "Mai", "An");
        assert_eq!(display, "Dear Mai,\n\n\n\nWith love, An");
        assert_eq!(to_raw(&display, 0, 1, "Mai", "An"), "");
    }
}
