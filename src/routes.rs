//! The built-in route table.
//!
//! Application logic layered over the protocol core: the dispatcher
//! matches on method and path, builds a [`Response`], and leaves all
//! serialization to [`Response::build`]. Configuration arrives as an
//! explicit [`ServeConfig`] value at construction - there is no global
//! state to reach for.

use crate::{
    http::encoding::{gzip_compress, select_encoding},
    Handler, Request, Response,
};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

/// Configuration for the built-in routes.
#[derive(Debug, Clone, Default)]
pub struct ServeConfig {
    /// Directory backing the `/files/{name}` routes. With `None`, those
    /// routes answer `404 Not Found`.
    pub files_dir: Option<PathBuf>,
}

/// Dispatches requests to the fixed route set:
///
/// | Route                | Behavior                                        |
/// |----------------------|-------------------------------------------------|
/// | `GET /`              | `200 OK`, empty body                            |
/// | `GET /echo/{s}`      | `{s}` back as `text/plain`, gzip when accepted  |
/// | `GET /user-agent`    | the request's `User-Agent` value as `text/plain`|
/// | `GET /files/{name}`  | file contents as `application/octet-stream`     |
/// | `POST /files/{name}` | writes the request body, answers `201 Created`  |
///
/// Everything else, including unknown methods, is `404 Not Found`.
pub struct AppRouter {
    config: ServeConfig,
}

impl AppRouter {
    #[inline]
    pub fn new(config: ServeConfig) -> Self {
        AppRouter { config }
    }

    fn echo(&self, request: &Request, text: &str) -> Response {
        let response = Response::new(200, "OK").header("Content-Type", "text/plain");

        // Compression happens here, before the response is built, so
        // Content-Length is computed over the compressed bytes.
        match request.header("Accept-Encoding").and_then(select_encoding) {
            Some(encoding) => response
                .header("Content-Encoding", encoding)
                .body(gzip_compress(text.as_bytes())),
            None => response.body(text),
        }
    }

    fn user_agent(&self, request: &Request) -> Response {
        let agent = request.header("User-Agent").unwrap_or_default();
        Response::new(200, "OK")
            .header("Content-Type", "text/plain")
            .body(agent)
    }

    async fn read_file(&self, name: &str) -> Response {
        let Some(path) = self.file_path(name) else {
            return not_found();
        };

        match fs::read(&path).await {
            Ok(contents) => Response::new(200, "OK")
                .header("Content-Type", "application/octet-stream")
                .body(contents),
            Err(error) => {
                debug!(?path, %error, "file not served");
                not_found()
            }
        }
    }

    async fn write_file(&self, name: &str, body: &[u8]) -> Response {
        let Some(path) = self.file_path(name) else {
            return not_found();
        };

        match fs::write(&path, body).await {
            Ok(()) => Response::new(201, "Created"),
            Err(error) => {
                warn!(?path, %error, "file write failed");
                Response::new(500, "Internal Server Error")
            }
        }
    }

    /// Resolves a `/files/{name}` name inside the configured directory.
    /// Names that are empty or step upwards with `..` never resolve.
    fn file_path(&self, name: &str) -> Option<PathBuf> {
        let dir = self.config.files_dir.as_ref()?;

        if name.is_empty() || name.split('/').any(|segment| segment == "..") {
            return None;
        }
        Some(dir.join(name))
    }
}

impl Handler for AppRouter {
    async fn handle(&self, request: &Request) -> Response {
        match (request.method(), request.path()) {
            ("GET", "/") => Response::new(200, "OK"),
            ("GET", "/user-agent") => self.user_agent(request),
            ("GET", path) => {
                if let Some(text) = path.strip_prefix("/echo/") {
                    self.echo(request, text)
                } else if let Some(name) = path.strip_prefix("/files/") {
                    self.read_file(name).await
                } else {
                    not_found()
                }
            }
            ("POST", path) => {
                if let Some(name) = path.strip_prefix("/files/") {
                    self.write_file(name, request.body()).await
                } else {
                    not_found()
                }
            }
            _ => not_found(),
        }
    }
}

#[inline]
fn not_found() -> Response {
    Response::new(404, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::{
        io::Read,
        sync::atomic::{AtomicUsize, Ordering},
    };

    fn request(raw: &str) -> Request {
        Request::parse(raw.as_bytes()).unwrap()
    }

    async fn dispatch(raw: &str) -> Vec<u8> {
        AppRouter::new(ServeConfig::default())
            .handle(&request(raw))
            .await
            .build()
    }

    /// Splits built wire bytes into (head, body) at the empty line.
    fn split_wire(wire: &[u8]) -> (String, Vec<u8>) {
        let at = wire.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        (
            String::from_utf8(wire[..at + 2].to_vec()).unwrap(),
            wire[at + 4..].to_vec(),
        )
    }

    fn scratch_dir() -> PathBuf {
        static SEQ: AtomicUsize = AtomicUsize::new(0);

        let dir = std::env::temp_dir().join(format!(
            "scratch_web-test-{}-{}",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn root_probe() {
        let wire = dispatch("GET / HTTP/1.1\r\n\r\n").await;
        assert_eq!(wire, b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[tokio::test]
    async fn unknown_routes_and_methods_404() {
        #[rustfmt::skip]
        let cases = [
            "GET /missing HTTP/1.1\r\n\r\n",
            "GET /echo HTTP/1.1\r\n\r\n",
            "POST / HTTP/1.1\r\n\r\n",
            "DELETE /files/x HTTP/1.1\r\n\r\n",
        ];

        for raw in cases {
            let wire = dispatch(raw).await;
            assert_eq!(wire, b"HTTP/1.1 404 Not Found\r\n\r\n", "{raw:?}");
        }
    }

    #[tokio::test]
    async fn echo_returns_the_path_remainder() {
        let wire = dispatch("GET /echo/abc HTTP/1.1\r\nHost: x\r\n\r\n").await;

        assert_eq!(
            wire,
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc"
        );
    }

    #[tokio::test]
    async fn echo_compresses_when_gzip_is_accepted() {
        let wire =
            dispatch("GET /echo/squeeze-me HTTP/1.1\r\nAccept-Encoding: identity, gzip\r\n\r\n")
                .await;
        let (head, body) = split_wire(&wire);

        assert!(head.contains("Content-Encoding: gzip\r\n"), "{head}");
        assert!(
            head.contains(&format!("Content-Length: {}\r\n", body.len())),
            "{head}"
        );

        let mut plain = Vec::new();
        GzDecoder::new(body.as_slice())
            .read_to_end(&mut plain)
            .unwrap();
        assert_eq!(plain, b"squeeze-me");
    }

    #[tokio::test]
    async fn echo_skips_unsupported_encodings() {
        let wire = dispatch("GET /echo/plain HTTP/1.1\r\nAccept-Encoding: br\r\n\r\n").await;
        let (head, body) = split_wire(&wire);

        assert!(!head.contains("Content-Encoding"), "{head}");
        assert_eq!(body, b"plain");
    }

    #[tokio::test]
    async fn user_agent_is_reflected() {
        let wire = dispatch("GET /user-agent HTTP/1.1\r\nuser-agent: foo/1.2\r\n\r\n").await;
        let (_, body) = split_wire(&wire);

        assert_eq!(body, b"foo/1.2");
    }

    #[tokio::test]
    async fn user_agent_absent_means_empty_body() {
        let wire = dispatch("GET /user-agent HTTP/1.1\r\n\r\n").await;
        assert_eq!(
            wire,
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn files_post_then_get_round_trips() {
        let dir = scratch_dir();
        let router = AppRouter::new(ServeConfig {
            files_dir: Some(dir.clone()),
        });

        let wire = router
            .handle(&request(
                "POST /files/note.bin HTTP/1.1\r\nContent-Length: 5\r\n\r\nab\x00cd",
            ))
            .await
            .build();
        assert_eq!(wire, b"HTTP/1.1 201 Created\r\n\r\n");

        let wire = router
            .handle(&request("GET /files/note.bin HTTP/1.1\r\n\r\n"))
            .await
            .build();
        let (head, body) = split_wire(&wire);
        assert!(head.contains("Content-Type: application/octet-stream\r\n"));
        assert_eq!(body, b"ab\x00cd");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn files_get_missing_is_404() {
        let dir = scratch_dir();
        let router = AppRouter::new(ServeConfig {
            files_dir: Some(dir.clone()),
        });

        let wire = router
            .handle(&request("GET /files/nope HTTP/1.1\r\n\r\n"))
            .await
            .build();
        assert_eq!(wire, b"HTTP/1.1 404 Not Found\r\n\r\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn files_without_configured_dir_is_404() {
        let wire = dispatch("GET /files/anything HTTP/1.1\r\n\r\n").await;
        assert_eq!(wire, b"HTTP/1.1 404 Not Found\r\n\r\n");
    }

    #[tokio::test]
    async fn files_never_escape_the_directory() {
        let dir = scratch_dir();
        let router = AppRouter::new(ServeConfig {
            files_dir: Some(dir.clone()),
        });

        #[rustfmt::skip]
        let cases = [
            "GET /files/../outside HTTP/1.1\r\n\r\n",
            "GET /files/a/../../outside HTTP/1.1\r\n\r\n",
            "POST /files/../outside HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi",
        ];

        for raw in cases {
            let wire = router.handle(&request(raw)).await.build();
            assert_eq!(wire, b"HTTP/1.1 404 Not Found\r\n\r\n", "{raw:?}");
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
