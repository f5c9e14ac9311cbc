//! Text helpers for LLM-facing Markdown.
//!
//! Counts are rendered with `,` as the thousands separator (`5,000`), matching
//! what the dataset's consumers already expect from earlier versions of the
//! server. Truncation helpers are char-aware; news bodies are Portuguese and
//! full of multi-byte characters.

/// Format an integer with `,` grouping every three digits.
///
/// ```
/// use govbrnews_core::util::text::group_thousands;
///
/// assert_eq!(group_thousands(5000), "5,000");
/// assert_eq!(group_thousands(999), "999");
/// ```
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build a snippet of at most `max_chars` characters.
///
/// When the text is longer than `max_chars`, the cut is moved back to the
/// last space if that space sits after `min_break` characters, and `...` is
/// appended.
pub fn snippet(text: &str, max_chars: usize, min_break: usize) -> String {
    let head = truncate_chars(text, max_chars).trim();
    if text.chars().count() <= max_chars {
        return head.to_string();
    }

    let mut cut = head;
    if let Some(space) = head.rfind(' ')
        && head[..space].chars().count() > min_break
    {
        cut = &head[..space];
    }
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands_small() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(7), "7");
        assert_eq!(group_thousands(999), "999");
    }

    #[test]
    fn test_group_thousands_large() {
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(10000), "10,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("educação", 6), "educaç");
        assert_eq!(truncate_chars("saúde", 10), "saúde");
    }

    #[test]
    fn test_snippet_short_text_untouched() {
        assert_eq!(snippet("  curto  ", 500, 400), "curto");
    }

    #[test]
    fn test_snippet_breaks_on_word() {
        let text = format!("{} final", "a".repeat(450));
        let out = snippet(&text, 455, 400);
        assert!(out.ends_with("..."));
        assert_eq!(out, format!("{}...", "a".repeat(450)));
    }

    #[test]
    fn test_snippet_hard_cut_when_space_too_early() {
        let text = format!("ab {}", "c".repeat(600));
        let out = snippet(&text, 500, 400);
        assert_eq!(out.chars().count(), 503);
        assert!(out.starts_with("ab "));
    }
}
