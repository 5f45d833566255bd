//! Path signing.
//!
//! A signature is the HMAC-SHA1 of the canonical path under the shared
//! secret, spelled in the URL-safe base64 alphabet with the trailing `=`
//! retained: always 28 characters. The signer neither verifies nor
//! attaches; callers compare (`crate::pipeline::authorize`) or prepend
//! (`crate::imagepath::generate::generate`) as needed.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Sign `path` with `secret`.
pub fn sign(path: &str, secret: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(path.as_bytes());
    URL_SAFE.encode(mac.finalize().into_bytes())
}

/// Constant-time string comparison to prevent timing attacks on the
/// signature check.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
