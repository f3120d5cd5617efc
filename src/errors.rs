use thiserror::Error;

/// Failure modes of [`Request::parse`](crate::Request::parse).
///
/// Every malformed or truncated buffer maps to exactly one of these
/// variants; the parser never indexes past the buffer end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A space or the terminating CRLF of the request line is missing
    /// before the buffer ends.
    #[error("request line is missing a delimiter before the end of the buffer")]
    TruncatedRequestLine,

    /// A header line carries no `": "` separator and is not the empty
    /// line that closes the header section.
    #[error("header line has no `: ` separator")]
    MalformedHeaderLine,

    /// The buffer ends before the empty line that closes the header
    /// section.
    #[error("header section is not terminated by an empty line")]
    UnterminatedHeaderSection,

    /// `Content-Length` declares more bytes than the buffer holds after
    /// the header section.
    #[error("declared Content-Length of {expected} exceeds the {available} bytes available")]
    BodyShorterThanContentLength { expected: usize, available: usize },

    /// The `Content-Length` value is not a plain ASCII decimal that fits
    /// in `usize`.
    #[error("Content-Length value is not a valid decimal length")]
    InvalidContentLength,

    /// The request line or header section contains invalid UTF-8. The
    /// body is raw bytes and is never checked.
    #[error("request line or headers are not valid UTF-8")]
    HeadNotUtf8,
}

impl ParseError {
    /// Whether the error can be caused by a partial read of a request
    /// that is still arriving. The connection read loop keeps reading on
    /// these and rejects immediately on everything else.
    pub const fn is_incomplete(&self) -> bool {
        matches!(
            self,
            ParseError::TruncatedRequestLine
                | ParseError::UnterminatedHeaderSection
                | ParseError::BodyShorterThanContentLength { .. }
        )
    }
}
