//! Request path normalization.
//!
//! Classification runs on the normalized form so that `//dashboard`,
//! `/./dashboard` or `/%64ashboard` cannot slip past a protected entry
//! while the upstream application resolves them to `/dashboard`.

/// Normalize a request path for classification.
///
/// - Decodes percent-encoded unreserved characters (RFC 3986 §6.2.2.2)
/// - Collapses repeated slashes
/// - Resolves `.` and `..` segments (never above the root)
/// - Always returns a path starting with `/`
pub fn normalize(path: &str) -> String {
    let decoded = decode_unreserved(path);
    let trailing_slash = decoded.len() > 1 && decoded.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = String::with_capacity(decoded.len() + 1);
    for segment in &segments {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    } else if trailing_slash {
        out.push('/');
    }
    out
}

/// Normalized path without a trailing slash, for comparing configured
/// locations such as the login and home paths.
pub fn canonical(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn decode_unreserved(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = String::with_capacity(path.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                let c = (hi << 4) | lo;
                if c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'_' | b'~') {
                    out.push(c as char);
                    i += 3;
                    continue;
                }
            }
        }
        // Reserved escapes (e.g. %2F) stay encoded; they are not path separators.
        let ch = path[i..].chars().next().unwrap_or_default();
        out.push(ch);
        i += ch.len_utf8().max(1);
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
