//! Small helpers shared across handlers and pages.

/// Percent-encode a string for use as a query-string value.
///
/// Keeps `/` unescaped so redirect-target paths stay readable in URLs.
pub fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_unreserved_characters() {
        assert_eq!(urlencode("/plans/new"), "/plans/new");
        assert_eq!(urlencode("abc-123_~.x"), "abc-123_~.x");
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(urlencode("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(urlencode("?q=1"), "%3Fq%3D1");
    }

    #[test]
    fn encodes_multibyte_utf8_per_byte() {
        assert_eq!(urlencode("ü"), "%C3%BC");
    }
}
