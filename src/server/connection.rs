use crate::{http::response::Response, limits::Limits, server::server_impl::Handler, Request};
use std::io;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::{sleep, timeout},
};
use tracing::{debug, warn};

/// Drives one connection from first byte to written response.
///
/// Socket bytes accumulate in a buffer that is re-parsed after every
/// read: an incomplete parse means "keep reading", any other parse
/// failure is answered with `400 Bad Request`, and a buffer that grows
/// past [`Limits::max_request_size`] with `413 Payload Too Large`. One
/// request is served, the response is written, and the connection ends.
///
/// Transport errors are returned to the caller, which terminates only
/// this connection's task.
pub(crate) async fn serve_connection<S, H>(
    stream: &mut S,
    handler: &H,
    limits: &Limits,
) -> Result<(), io::Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
    H: Handler,
{
    let mut buffer = Vec::with_capacity(limits.read_chunk_size);

    let response = loop {
        let read = read_chunk(stream, &mut buffer, limits).await?;

        match Request::parse(&buffer) {
            Ok(request) => {
                debug!(
                    method = request.method(),
                    path = request.path(),
                    body_len = request.body().len(),
                    "request parsed"
                );
                break handler.handle(&request).await;
            }
            Err(error) if error.is_incomplete() => {
                if read == 0 {
                    debug!(%error, "peer closed mid-request");
                    break Response::new(400, "Bad Request");
                }
                if buffer.len() >= limits.max_request_size {
                    warn!(buffered = buffer.len(), "request exceeds size limit");
                    break Response::new(413, "Payload Too Large");
                }
            }
            Err(error) => {
                debug!(%error, "rejecting malformed request");
                break Response::new(400, "Bad Request");
            }
        }
    };

    write_response(stream, &response.build(), limits).await
}

/// One bounded read appended to the request buffer. Returns the number
/// of bytes read; zero means the peer closed its half.
async fn read_chunk<S>(
    stream: &mut S,
    buffer: &mut Vec<u8>,
    limits: &Limits,
) -> Result<usize, io::Error>
where
    S: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; limits.read_chunk_size];

    tokio::select! {
        biased;

        read_result = stream.read(&mut chunk) => {
            let read = read_result?;
            buffer.extend_from_slice(&chunk[..read]);
            Ok(read)
        }
        _ = sleep(limits.read_timeout) => {
            Err(io::Error::new(io::ErrorKind::TimedOut, "read timeout"))
        }
    }
}

async fn write_response<S>(stream: &mut S, wire: &[u8], limits: &Limits) -> Result<(), io::Error>
where
    S: AsyncWrite + Unpin,
{
    timeout(limits.write_timeout, stream.write_all(wire))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "write timeout"))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct StatusHandler;

    impl Handler for StatusHandler {
        async fn handle(&self, request: &Request) -> Response {
            Response::new(200, "OK").body(format!("{} {}", request.method(), request.path()))
        }
    }

    /// Feeds `chunks` down an in-memory stream with a pause between
    /// each, runs the connection, and returns the response bytes.
    async fn drive(chunks: Vec<Vec<u8>>, limits: Limits) -> Vec<u8> {
        let (mut client, mut server) = tokio::io::duplex(16 * 1024);

        let feeder = tokio::spawn(async move {
            for chunk in chunks {
                client.write_all(&chunk).await.unwrap();
                sleep(Duration::from_millis(2)).await;
            }
            client.shutdown().await.unwrap();
            client
        });

        serve_connection(&mut server, &StatusHandler, &limits)
            .await
            .unwrap();
        drop(server);

        let mut client = feeder.await.unwrap();
        let mut wire = Vec::new();
        client.read_to_end(&mut wire).await.unwrap();
        wire
    }

    #[tokio::test]
    async fn single_write_request() {
        let wire = drive(
            vec![b"GET /status HTTP/1.1\r\nHost: x\r\n\r\n".to_vec()],
            Limits::default(),
        )
        .await;

        assert_eq!(
            wire,
            b"HTTP/1.1 200 OK\r\nContent-Length: 11\r\n\r\nGET /status"
        );
    }

    #[tokio::test]
    async fn request_arriving_byte_by_byte() {
        let request = b"POST /status HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi";
        let chunks = request.iter().map(|byte| vec![*byte]).collect();

        let wire = drive(chunks, Limits::default()).await;

        assert_eq!(
            wire,
            b"HTTP/1.1 200 OK\r\nContent-Length: 12\r\n\r\nPOST /status"
        );
    }

    #[tokio::test]
    async fn trailing_bytes_beyond_content_length_are_ignored() {
        let wire = drive(
            vec![b"POST /status HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi-and-junk".to_vec()],
            Limits::default(),
        )
        .await;

        assert!(wire.starts_with(b"HTTP/1.1 200 OK\r\n"));
    }

    #[tokio::test]
    async fn malformed_header_is_rejected_with_400() {
        let wire = drive(
            vec![b"GET / HTTP/1.1\r\nbroken-line\r\n\r\n".to_vec()],
            Limits::default(),
        )
        .await;

        assert_eq!(wire, b"HTTP/1.1 400 Bad Request\r\n\r\n");
    }

    #[tokio::test]
    async fn eof_mid_request_is_rejected_with_400() {
        let wire = drive(
            vec![b"GET /status HTTP/1.1\r\nHost: loc".to_vec()],
            Limits::default(),
        )
        .await;

        assert_eq!(wire, b"HTTP/1.1 400 Bad Request\r\n\r\n");
    }

    #[tokio::test]
    async fn oversized_request_is_rejected_with_413() {
        let limits = Limits {
            max_request_size: 64,
            read_chunk_size: 16,
            ..Limits::default()
        };

        // Headers alone exceed the cap and never finish parsing.
        let wire = drive(
            vec![format!("GET / HTTP/1.1\r\nX-Pad: {}\r\n", "y".repeat(96)).into_bytes()],
            limits,
        )
        .await;

        assert_eq!(wire, b"HTTP/1.1 413 Payload Too Large\r\n\r\n");
    }
}
