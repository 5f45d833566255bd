//! URL normalization: free-form user input → routable canonical path.
//!
//! Splits on `/`, drops the empty segments produced by leading, trailing
//! or repeated slashes, percent-escapes each segment per a per-byte
//! policy, and rejoins. The policy decides, byte by byte, whether a byte
//! is escaped; an escaped space renders as `+`, everything else as `%XX`
//! with upper-case hex.

/// The built-in escape policy: escape everything except ASCII
/// alphanumerics and the unreserved URL characters. The transformation
/// syntax bytes `:()=,[]` fall under "everything" and are called out
/// explicitly so free URLs cannot smuggle filter syntax past the parser.
pub fn default_escape_byte(c: u8) -> bool {
    if c.is_ascii_alphanumeric() {
        return false;
    }
    match c {
        // Unreserved URL characters.
        b'-' | b'_' | b'.' | b'~' => false,
        // Escape output bytes; exempting them keeps normalize a fixed
        // point on its own output.
        b'%' | b'+' => false,
        // Transformation syntax.
        b':' | b'(' | b')' | b'=' | b',' | b'[' | b']' => true,
        _ => true,
    }
}

/// Normalize `path` under the given escape policy, or under
/// [`default_escape_byte`] when `None`.
///
/// The output has no leading, trailing or doubled slashes and, under the
/// default policy, no bytes outside the unreserved ASCII set plus `%`,
/// `+` and `/`.
pub fn normalize(path: &str, escape_byte: Option<&dyn Fn(u8) -> bool>) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match escape_byte {
            Some(policy) => escape_segment(segment, policy),
            None => escape_segment(segment, default_escape_byte),
        })
        .collect();
    segments.join("/")
}

fn escape_segment(segment: &str, should_escape: impl Fn(u8) -> bool) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out: Vec<u8> = Vec::with_capacity(segment.len());
    for &b in segment.as_bytes() {
        if should_escape(b) {
            if b == b' ' {
                out.push(b'+');
            } else {
                out.push(b'%');
                out.push(HEX[(b >> 4) as usize]);
                out.push(HEX[(b & 0x0f) as usize]);
            }
        } else {
            out.push(b);
        }
    }
    // A policy that escapes only part of a multi-byte character can leave
    // stray continuation bytes behind; degrade those instead of panicking.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
