/// Truncate a string to at most `max_bytes` bytes at a character boundary.
///
/// The result is always an exact prefix of the input, so budget-capped text
/// never reorders or re-wraps, it only stops early.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Extract the first balanced `{...}` region from free-form model output.
///
/// Models wrap JSON in prose, markdown fences, or trailing commentary; this
/// scans for the first `{`, then matches braces while skipping over string
/// literals and escapes. Returns `None` when no balanced region exists.
/// Deliberately not a full-text scan: callers parse the extracted region and
/// treat failure of either step as a malformed response.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
