//! Free-text search term sanitization
//!
//! Terms are turned into the body of a `LIKE ... ESCAPE '\'` pattern: the
//! wildcard characters `%` and `_` and the escape character itself are
//! escaped, so a search for `50%` only matches the literal `50%`. Terms are
//! always bound as parameters, which covers quote characters.
//!
//! Sanitizing is idempotent: an escape pair already present in the input
//! (`\\`, `\%`, `\_`) is kept as is.

pub const ESCAPE_CHAR: char = '\\';

pub const DEFAULT_MAX_SEARCH_LENGTH: usize = 200;

/// Escape LIKE metacharacters and cap the term at `max_len` characters.
///
/// The cap counts an escape pair as a single character.
pub fn sanitize_search_term(raw: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.trim().chars().peekable();
    let mut taken = 0usize;

    while let Some(c) = chars.next() {
        if taken == max_len {
            break;
        }
        match c {
            ESCAPE_CHAR => match chars.peek() {
                Some(&next) if is_escapable(next) => {
                    out.push(ESCAPE_CHAR);
                    out.push(next);
                    chars.next();
                }
                _ => {
                    out.push(ESCAPE_CHAR);
                    out.push(ESCAPE_CHAR);
                }
            },
            '%' | '_' => {
                out.push(ESCAPE_CHAR);
                out.push(c);
            }
            other => out.push(other),
        }
        taken += 1;
    }

    out.trim_end().to_string()
}

/// Wrap a sanitized term into a substring pattern.
pub fn contains_pattern(sanitized: &str) -> String {
    format!("%{}%", sanitized)
}

fn is_escapable(c: char) -> bool {
    matches!(c, ESCAPE_CHAR | '%' | '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(raw: &str) -> String {
        sanitize_search_term(raw, DEFAULT_MAX_SEARCH_LENGTH)
    }

    #[test]
    fn escapes_wildcards_and_backslash() {
        assert_eq!(sanitize("50%"), r"50\%");
        assert_eq!(sanitize("a_b"), r"a\_b");
        assert_eq!(sanitize(r"c:\path"), r"c:\\path");
        assert_eq!(sanitize("l'ombre"), "l'ombre");
    }

    #[test]
    fn sanitizing_twice_is_a_no_op() {
        for raw in [
            "50%",
            r"\",
            r"\\%_",
            "  mixed % _ \\ ' text  ",
            r"already \% escaped",
            "",
        ] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn caps_length_counting_escape_pairs_once() {
        let long = "%".repeat(500);
        let out = sanitize(&long);
        assert_eq!(out.chars().count(), 400);
        assert_eq!(sanitize(&out), out);

        let words = "ab ".repeat(300);
        let capped = sanitize_search_term(&words, 200);
        assert!(capped.chars().count() <= 200);
        assert_eq!(sanitize_search_term(&capped, 200), capped);
    }

    #[test]
    fn pattern_wraps_term() {
        assert_eq!(contains_pattern(r"50\%"), r"%50\%%");
    }
}
