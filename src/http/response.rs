/// An HTTP/1.1 response under construction.
///
/// The route handler supplies every part: status code, reason phrase
/// (the two are never cross-checked - the caller owns that pairing),
/// headers, and the body bytes. [`Response::build`] serializes the value
/// to wire bytes.
///
/// Do not set `Content-Length` yourself: the builder computes it from
/// the body's byte length whenever the body is non-empty. For a
/// compressed body that is the compressed length, which is why
/// compression happens before the `Response` is constructed.
///
/// # Examples
/// ```
/// use scratch_web::Response;
///
/// let wire = Response::new(200, "OK")
///     .header("Content-Type", "text/plain")
///     .body("abc")
///     .build();
///
/// assert_eq!(
///     wire,
///     b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// Starts a response with the given status code and reason phrase.
    #[inline]
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Response {
            status,
            reason: reason.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Appends a header. Headers are serialized in the order they were
    /// added, so output stays deterministic.
    #[inline]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body bytes, replacing any previous body.
    #[inline]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes the response to wire bytes.
    ///
    /// Status line, then each header, then - only when the body is
    /// non-empty - a `Content-Length` computed from the body's byte
    /// length, the empty line, and the body verbatim. Pure: equal
    /// responses always build byte-identical output.
    pub fn build(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(64 + self.body.len());

        wire.extend_from_slice(format!("HTTP/1.1 {} {}\r\n", self.status, self.reason).as_bytes());
        for (name, value) in &self.headers {
            wire.extend_from_slice(name.as_bytes());
            wire.extend_from_slice(b": ");
            wire.extend_from_slice(value.as_bytes());
            wire.extend_from_slice(b"\r\n");
        }
        if !self.body.is_empty() {
            wire.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }
        wire.extend_from_slice(b"\r\n");
        wire.extend_from_slice(&self.body);

        wire
    }
}
