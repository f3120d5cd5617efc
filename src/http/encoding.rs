//! Content-encoding negotiation and gzip compression.
//!
//! Negotiation is the route handler's job, not the response builder's:
//! the handler picks an encoding from the client's `Accept-Encoding`
//! list, compresses the body, and sets `Content-Encoding` before the
//! response is built. The builder then computes `Content-Length` over
//! the compressed bytes like any other body.

use flate2::{write::GzEncoder, Compression};
use std::io::Write;

/// Encodings this server can produce, in preference order.
const SUPPORTED: &[&str] = &["gzip"];

/// Picks the first client-offered encoding the server supports.
///
/// `accept_encoding` is the raw `Accept-Encoding` header value, a
/// comma-separated token list. Returns `None` when nothing in the list
/// is supported or the list is empty; the caller then sends the body
/// as-is with no `Content-Encoding` header.
///
/// # Examples
/// ```
/// use scratch_web::select_encoding;
///
/// assert_eq!(select_encoding("identity, gzip, br"), Some("gzip"));
/// assert_eq!(select_encoding("br"), None);
/// ```
pub fn select_encoding(accept_encoding: &str) -> Option<&'static str> {
    accept_encoding
        .split(',')
        .map(str::trim)
        .find_map(|offered| SUPPORTED.iter().copied().find(|&name| name == offered))
}

/// Compresses `data` into a standard gzip (DEFLATE) stream.
///
/// Infallible: the encoder writes into a `Vec`, which cannot fail.
pub fn gzip_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .expect("writing to a Vec cannot fail");
    encoder.finish().expect("writing to a Vec cannot fail")
}
