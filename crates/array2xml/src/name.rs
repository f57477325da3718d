//! XML name legality check shared by both conversion directions.

/// Check whether a string is a legal XML element or attribute name.
///
/// The whole string must match: a leading ASCII letter or underscore,
/// followed by any number of ASCII alphanumerics, `_`, `-`, `.` or `:`,
/// and the name must not end with a colon. The same predicate is applied
/// to element tag names and attribute names.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();

    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')) {
        return false;
    }

    !name.ends_with(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_names() {
        assert!(is_valid_name("a"));
        assert!(is_valid_name("note"));
        assert!(is_valid_name("_private"));
        assert!(is_valid_name("a:b.c-d_9"));
    }

    #[test]
    fn test_leading_character() {
        assert!(!is_valid_name("1a"));
        assert!(!is_valid_name("-dash"));
        assert!(!is_valid_name(".dot"));
        assert!(!is_valid_name(":colon"));
    }

    #[test]
    fn test_trailing_colon() {
        assert!(!is_valid_name("a:"));
        assert!(!is_valid_name("ns:tag:"));
        assert!(is_valid_name("ns:tag"));
    }

    #[test]
    fn test_empty_and_whole_string() {
        assert!(!is_valid_name(""));
        // A legal prefix does not rescue an illegal tail.
        assert!(!is_valid_name("good name"));
        assert!(!is_valid_name("tag<"));
        assert!(!is_valid_name("a/b"));
    }
}
