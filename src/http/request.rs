use crate::errors::ParseError;
use memchr::{memchr, memmem};
use std::{collections::HashMap, ops::Range};

const CRLF: &[u8] = b"\r\n";
const HEADER_SEP: &[u8] = b": ";

/// A parsed HTTP/1.1 request.
///
/// Produced once per connection by [`Request::parse`] and immutable
/// afterwards. The parser is deliberately permissive about token content:
///
/// - `method` is any token before the first space, not checked against a
///   verb list.
/// - `path` is kept opaque, never URL-decoded.
/// - `version` is recorded but nothing branches on it.
/// - header names are stored exactly as received (case preserved); a
///   duplicate name overwrites the earlier value. Lookups through
///   [`Request::header`] match names case-insensitively per RFC 7230
///   without touching the stored keys.
/// - `body` is raw bytes, sized by `Content-Length` alone. There is no
///   chunked transfer-encoding and no read-to-close body.
///
/// The request line and header section must be UTF-8; the body may be
/// arbitrary bytes, including NUL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: String,
    version: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Request {
    /// Parses one complete request from `buffer`.
    ///
    /// The buffer is scanned left to right: a space ends the method,
    /// another space ends the path, CRLF ends the version, then each
    /// header line is split on its first `": "` until an empty line
    /// closes the section. The remaining bytes form the body region, of
    /// which exactly `Content-Length` bytes are taken (zero when the
    /// header is absent); anything past that is ignored.
    ///
    /// Truncated input yields an error whose
    /// [`is_incomplete`](ParseError::is_incomplete) is `true`, which a
    /// caller feeding the parser from a socket can treat as "read more".
    pub fn parse(buffer: &[u8]) -> Result<Request, ParseError> {
        let line_end = memmem::find(buffer, CRLF).ok_or(ParseError::TruncatedRequestLine)?;
        let request_line = &buffer[..line_end];

        let method_end = memchr(b' ', request_line).ok_or(ParseError::TruncatedRequestLine)?;
        let path_end = method_end
            + 1
            + memchr(b' ', &request_line[method_end + 1..])
                .ok_or(ParseError::TruncatedRequestLine)?;

        let mut cursor = line_end + 2;
        let mut fields: Vec<(Range<usize>, Range<usize>)> = Vec::new();
        loop {
            if buffer.len() >= cursor + 2 && buffer[cursor..cursor + 2] == *CRLF {
                cursor += 2;
                break;
            }

            let line_len = memmem::find(&buffer[cursor..], CRLF)
                .ok_or(ParseError::UnterminatedHeaderSection)?;
            let line = &buffer[cursor..cursor + line_len];

            // Only the first `": "` splits; values keep embedded colons.
            let sep = memmem::find(line, HEADER_SEP).ok_or(ParseError::MalformedHeaderLine)?;
            fields.push((cursor..cursor + sep, cursor + sep + 2..cursor + line_len));

            cursor += line_len + 2;
        }

        let head =
            simdutf8::basic::from_utf8(&buffer[..cursor]).map_err(|_| ParseError::HeadNotUtf8)?;

        let mut headers = HashMap::with_capacity(fields.len());
        for (name, value) in fields {
            headers.insert(head[name].to_owned(), head[value].to_owned());
        }

        let body = match find_header(&headers, "Content-Length") {
            Some(value) => {
                let expected = ascii_decimal(value).ok_or(ParseError::InvalidContentLength)?;
                let available = buffer.len() - cursor;
                if available < expected {
                    return Err(ParseError::BodyShorterThanContentLength {
                        expected,
                        available,
                    });
                }
                buffer[cursor..cursor + expected].to_vec()
            }
            None => Vec::new(),
        };

        Ok(Request {
            method: head[..method_end].to_owned(),
            path: head[method_end + 1..path_end].to_owned(),
            version: head[path_end + 1..line_end].to_owned(),
            headers,
            body,
        })
    }
}

// Public API
impl Request {
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All headers, names exactly as they appeared on the wire.
    #[inline]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns a header value with case-insensitive name matching
    /// (per [RFC 7230](https://tools.ietf.org/html/rfc7230#section-3.2)).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

// Stricter than `str::parse`: digits only, no sign, no surrounding space.
fn ascii_decimal(value: &str) -> Option<usize> {
    if value.is_empty() {
        return None;
    }

    let mut result: usize = 0;
    for byte in value.bytes() {
        if !byte.is_ascii_digit() {
            return None;
        }
        result = result
            .checked_mul(10)?
            .checked_add((byte - b'0') as usize)?;
    }
    Some(result)
}
