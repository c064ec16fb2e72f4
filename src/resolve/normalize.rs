//! Backslash normalization for text-encoded configuration fragments.
//!
//! Configuration fragments sometimes arrive pre-serialized as JSON text.
//! On platforms whose path separator is the backslash, a strict JSON parse
//! would read every path separator as an escape introducer and fail, so
//! the fragment's backslashes are doubled before parsing. This is kept as
//! an explicit pure function rather than folded into the parser.

/// Double every backslash character in `s`.
///
/// Pure, stateless, total: no other characters are altered and there are
/// no error conditions.
pub fn double_backslashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Platform-aware entry point: doubles backslashes on Windows, identity
/// elsewhere.
pub fn normalize(s: &str) -> String {
    if cfg!(windows) {
        double_backslashes(s)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_backslashes(s: &str) -> usize {
        s.chars().filter(|c| *c == '\\').count()
    }

    #[test]
    fn test_doubles_every_backslash() {
        let input = r#"{"program":"C:\Users\me\main.py"}"#;
        let output = double_backslashes(input);

        assert_eq!(
            count_backslashes(&output),
            2 * count_backslashes(input)
        );
        assert_eq!(output, r#"{"program":"C:\\Users\\me\\main.py"}"#);
    }

    #[test]
    fn test_no_backslashes_is_identity() {
        let input = r#"{"program":"/home/me/main.py"}"#;
        assert_eq!(double_backslashes(input), input);
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(double_backslashes(""), "");
    }

    #[test]
    fn test_only_backslashes() {
        assert_eq!(double_backslashes(r"\\\"), r"\\\\\\");
    }

    #[test]
    fn test_other_characters_unaltered() {
        let input = "a\\b\"c\nd";
        let output = double_backslashes(input);

        let stripped: String = output.chars().filter(|c| *c != '\\').collect();
        let expected: String = input.chars().filter(|c| *c != '\\').collect();
        assert_eq!(stripped, expected);
    }

    #[test]
    fn test_already_doubled_doubles_again() {
        // The transform is not idempotent: it operates on characters,
        // not escape sequences.
        assert_eq!(double_backslashes(r"\\"), r"\\\\");
    }

    #[test]
    fn test_normalize_matches_platform() {
        let input = r"C:\path";
        if cfg!(windows) {
            assert_eq!(normalize(input), r"C:\\path");
        } else {
            assert_eq!(normalize(input), input);
        }
    }
}
