use std::sync::LazyLock;

use regex::Regex;

/// An `@` at the start of the text or after a non-word character, followed by
/// a run of non-whitespace. Word characters are ASCII only, so a mention written
/// directly after Japanese text still matches.
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9A-Za-z_])(@[^ \t\n\r\f]+)").expect("mention pattern is valid")
});

/// Returns every mention token in `text`, in order of appearance.
///
/// Tokens keep their leading `@` and any trailing punctuation (`@bob!`).
/// Repeated mentions are returned once per occurrence.
pub fn extract_mentions(text: &str) -> Vec<&str> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_at_sign() {
        assert!(extract_mentions("").is_empty());
        assert!(extract_mentions("LGTM, merging now").is_empty());
    }

    #[test]
    fn test_trailing_punctuation_is_kept() {
        assert_eq!(extract_mentions("hi @alice and @bob!"), vec!["@alice", "@bob!"]);
    }

    #[test]
    fn test_mention_at_line_starts() {
        assert_eq!(
            extract_mentions("@alice\r\n@bob\tthanks\n@carol"),
            vec!["@alice", "@bob", "@carol"]
        );
    }

    #[test]
    fn test_email_address_is_not_a_mention() {
        assert!(extract_mentions("mail me at dev@example.com").is_empty());
        assert!(extract_mentions("foo_@bar").is_empty());
    }

    #[test]
    fn test_mention_after_japanese_text() {
        assert_eq!(extract_mentions("確認お願いします@alice"), vec!["@alice"]);
    }

    #[test]
    fn test_lone_at_sign() {
        assert!(extract_mentions("meet @ noon").is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(extract_mentions("@alice @alice"), vec!["@alice", "@alice"]);
    }

    #[test]
    fn test_adjacent_at_signs() {
        assert_eq!(extract_mentions("@@alice"), vec!["@@alice"]);
        assert_eq!(extract_mentions("x@@alice"), vec!["@alice"]);
    }

    #[test]
    fn test_punctuation_before_mention() {
        assert_eq!(extract_mentions("(@alice)"), vec!["@alice)"]);
    }
}
