//! Free-text scrubbing before a field leaves the form.
//!
//! This is a second line of defense; whoever renders the data downstream
//! still has to escape it for their own output context.

use std::sync::LazyLock;
use regex::Regex;

/// Longest value sent for a single field, in characters.
pub const MAX_FIELD_CHARS: usize = 1000;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

const STRIPPED: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Drop tag-like substrings and markup characters, trim, cap the length.
pub fn sanitize(input: &str) -> String {
    let without_tags = TAG.replace_all(input, "");
    let cleaned: String = without_tags.chars().filter(|c| !STRIPPED.contains(c)).collect();

    let truncated: String = cleaned.trim().chars().take(MAX_FIELD_CHARS).collect();
    truncated.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_tags_and_characters() {
        assert_eq!(sanitize("<b>Mari</b>"), "Mari");
        assert_eq!(sanitize("<script>alert('x')</script>hi"), "alert(x)hi");
        assert_eq!(sanitize("Tom & \"Jerry\""), "Tom  Jerry");
        assert_eq!(sanitize("a < b > c"), "a  c");
        assert_eq!(sanitize("  spaced  "), "spaced");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_unclosed_bracket_is_stripped() {
        assert_eq!(sanitize("5 < 6"), "5  6");
    }

    #[test]
    fn test_truncates_by_characters() {
        let long = "õ".repeat(1500);
        let out = sanitize(&long);
        assert_eq!(out.chars().count(), MAX_FIELD_CHARS);
    }

    #[test]
    fn test_whitespace_at_cut_is_trimmed() {
        let input = format!("{} tail", "a".repeat(MAX_FIELD_CHARS - 1));
        let out = sanitize(&input);
        assert_eq!(out.chars().count(), MAX_FIELD_CHARS - 1);
        assert!(!out.ends_with(' '));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("Sünnipäev 12 inimesele, 3h"), "Sünnipäev 12 inimesele, 3h");
    }

    proptest! {
        #[test]
        fn prop_output_is_clean_and_bounded(input in ".{0,1500}") {
            let out = sanitize(&input);
            prop_assert!(out.chars().count() <= MAX_FIELD_CHARS);
            prop_assert!(!out.contains(|c: char| STRIPPED.contains(&c)));
        }

        #[test]
        fn prop_idempotent(input in ".{0,1500}") {
            let once = sanitize(&input);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn prop_markup_free_short_input_only_trimmed(input in "[^<>\"'&]{0,1000}") {
            prop_assert_eq!(sanitize(&input), input.trim());
        }
    }
}
