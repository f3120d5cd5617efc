//! Transport-level bounds for a single connection.
//!
//! The parser itself is a pure function over a byte buffer; everything
//! here bounds how that buffer is filled from the socket.

use std::time::Duration;

/// Per-connection read/write bounds.
///
/// Defaults are conservative: they fit every request the built-in routes
/// expect while keeping a slow or hostile peer from pinning a task or
/// growing the request buffer without end.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum size of the accumulated request buffer in bytes
    /// (default: `64 KiB`).
    ///
    /// A request that does not parse within this many bytes is answered
    /// with `413 Payload Too Large` and the connection is closed.
    pub max_request_size: usize,

    /// Size of a single socket read in bytes (default: `1024`).
    ///
    /// Reads of this size are appended to the request buffer until the
    /// parser either succeeds or rejects the input.
    pub read_chunk_size: usize,

    /// Maximum duration of a single socket read (default: `5 seconds`).
    ///
    /// A peer that stops sending mid-request is cut off after this long.
    pub read_timeout: Duration,

    /// Maximum duration of writing the serialized response
    /// (default: `5 seconds`).
    pub write_timeout: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_request_size: 64 * 1024,
            read_chunk_size: 1024,
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
        }
    }
}
