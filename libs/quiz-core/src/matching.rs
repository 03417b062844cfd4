//! Answer comparison for typed study modes.

/// Compare a typed answer to the expected value.
///
/// Leading/trailing whitespace is ignored and the comparison is
/// case-insensitive. Multiple-choice selections are compared with plain
/// string equality instead; this normalization applies to typed input only.
pub fn answers_match(typed: &str, expected: &str) -> bool {
    normalize(typed) == normalize(expected)
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(answers_match("本", "本"));
        assert!(answers_match("hello", "hello"));
    }

    #[test]
    fn case_is_ignored() {
        assert!(answers_match("Hello", "hello"));
        assert!(answers_match("RUST", "rust"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(answers_match("  りんご  ", "りんご"));
        assert!(answers_match("\tanswer\n", "answer"));
    }

    #[test]
    fn interior_differences_still_count() {
        assert!(!answers_match("helo", "hello"));
        assert!(!answers_match("hello world", "helloworld"));
    }
}
