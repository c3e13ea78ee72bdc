//! core::persist::quoted
//!
//! C-style quoted strings.
//!
//! A quoted string is wrapped in `"`; embedded `"` and `\` are preceded by
//! a `\`. Everything else, newlines included, is written raw. On read, a
//! value that does not open with `"` is taken as a bare whitespace-delimited
//! word.

/// Append the quoted form of `value` to `out`.
pub fn write_quoted(out: &mut String, value: &str) {
    out.reserve(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// Quote `value` into a new string.
///
/// # Example
///
/// ```
/// use snapline::core::persist::quoted::quote;
///
/// assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
/// assert_eq!(quote(r"C:\tmp"), r#""C:\\tmp""#);
/// ```
pub fn quote(value: &str) -> String {
    let mut out = String::new();
    write_quoted(&mut out, value);
    out
}

/// A failed read of a quoted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotedError {
    /// Input ended before any value started.
    Missing,
    /// Input ended inside the quotes.
    Unterminated,
}

/// Read one value from the start of `input`, skipping leading whitespace.
///
/// Returns the decoded value and the number of bytes consumed.
pub fn read_quoted(input: &str) -> Result<(String, usize), QuotedError> {
    let start = input.len() - input.trim_start().len();
    let rest = &input[start..];

    let mut chars = rest.char_indices();
    match chars.next() {
        None => Err(QuotedError::Missing),
        Some((_, '"')) => {
            let mut value = String::new();
            while let Some((i, c)) = chars.next() {
                match c {
                    '"' => return Ok((value, start + i + 1)),
                    '\\' => match chars.next() {
                        Some((_, escaped)) => value.push(escaped),
                        None => return Err(QuotedError::Unterminated),
                    },
                    _ => value.push(c),
                }
            }
            Err(QuotedError::Unterminated)
        }
        Some(_) => {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            Ok((rest[..end].to_string(), start + end))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_text() {
        assert_eq!(quote("hello world"), "\"hello world\"");
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn escapes_quote_and_backslash_only() {
        assert_eq!(quote("a\"b\\c\nd\t"), "\"a\\\"b\\\\c\nd\t\"");
    }

    #[test]
    fn reads_quoted_value_and_reports_consumed() {
        let input = "  \"a \\\"b\\\" \\\\c\" tail";
        let (value, used) = read_quoted(input).unwrap();
        assert_eq!(value, "a \"b\" \\c");
        assert_eq!(&input[used..], " tail");
    }

    #[test]
    fn reads_multiline_value() {
        let (value, used) = read_quoted("\"line1\nline2\"\n----").unwrap();
        assert_eq!(value, "line1\nline2");
        assert_eq!(used, 13);
    }

    #[test]
    fn backslash_before_ordinary_char_is_dropped() {
        let (value, _) = read_quoted("\"\\n\"").unwrap();
        assert_eq!(value, "n");
    }

    #[test]
    fn bare_word_fallback() {
        let (value, used) = read_quoted(" main bhead 1").unwrap();
        assert_eq!(value, "main");
        assert_eq!(used, 5);
    }

    #[test]
    fn missing_and_unterminated() {
        assert_eq!(read_quoted("   \n"), Err(QuotedError::Missing));
        assert_eq!(read_quoted("\"open"), Err(QuotedError::Unterminated));
        assert_eq!(read_quoted("\"trailing\\"), Err(QuotedError::Unterminated));
    }

    #[test]
    fn read_inverts_write() {
        for value in ["", "plain", "with \"quotes\"", "back\\slash\\", "multi\nline\n"] {
            let (decoded, used) = read_quoted(&quote(value)).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(used, quote(value).len());
        }
    }
}
