//! Canonicalization of raw schedule-code input.

use std::sync::LazyLock;

use regex::Regex;

/// Tolerated punctuation separators between segments.
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;|/]+").unwrap());

/// Any run of whitespace, including non-breaking spaces.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Canonicalizes a raw schedule code.
///
/// Uppercases, turns separators and non-breaking spaces into single spaces,
/// trims, and rewrites the legacy `V` shift letter to `T`. Total and
/// idempotent; rejecting blank input is left to the caller.
pub fn normalize(raw: &str) -> String {
    let upper = raw.to_uppercase().replace('\u{00A0}', " ");
    let spaced = SEPARATOR_RE.replace_all(&upper, " ");
    let collapsed = WHITESPACE_RE.replace_all(&spaced, " ");
    collapsed.trim().replace('V', "T")
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(normalize("  35t12 "), "35T12");
    }

    #[test]
    fn separators_collapse_to_single_space() {
        assert_eq!(normalize("246N12,, 7N12;|35M56"), "246N12 7N12 35M56");
        assert_eq!(normalize("2M12 / 4M12"), "2M12 4M12");
    }

    #[test]
    fn non_breaking_space_is_whitespace() {
        assert_eq!(normalize("24M12\u{00A0}\u{00A0}6T34"), "24M12 6T34");
    }

    #[test]
    fn legacy_shift_letter_becomes_afternoon() {
        assert_eq!(normalize("35v12"), "35T12");
    }

    #[test]
    fn leading_separator_is_trimmed() {
        assert_eq!(normalize(",35T12;"), "35T12");
    }

    #[test]
    fn blank_input_normalizes_to_empty() {
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "[ -~\t\u{00A0}]{0,24}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_is_idempotent_on_code_like_input(raw in "[1-9 ,;|/mtnvMTNVx\u{00A0}]{0,20}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
