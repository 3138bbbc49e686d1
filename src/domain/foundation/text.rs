//! Text helpers for user-supplied strings.

/// Returns at most `max_chars` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}

/// Trims `s` and maps blank input to `None`.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_are_untouched() {
        assert_eq!(truncate_chars("thanks", 100), "thanks");
    }

    #[test]
    fn long_strings_are_cut_at_char_boundary() {
        let s = "é".repeat(150);
        let cut = truncate_chars(&s, 100);
        assert_eq!(cut.chars().count(), 100);
    }

    #[test]
    fn exact_length_is_kept() {
        let s = "a".repeat(1024);
        assert_eq!(truncate_chars(&s, 1024).len(), 1024);
    }

    #[test]
    fn blank_is_none() {
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" Ada ")), Some("Ada"));
    }
}
