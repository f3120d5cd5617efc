//! scratch_web - minimal HTTP/1.1 server on a byte-level protocol core
//!
//! The crate is split into a small protocol core and thin server glue
//! around it:
//!
//! - [`Request::parse`] turns a raw byte buffer into a structured request
//!   by scanning for the HTTP/1.1 delimiters (space, space, CRLF, `": "`,
//!   empty line). Malformed or truncated input is always an explicit
//!   [`ParseError`], never an out-of-bounds access.
//! - [`Response`] is built by the route handler and serialized with
//!   [`Response::build`], which emits the status line, the headers in
//!   insertion order, a computed `Content-Length` for non-empty bodies,
//!   and the raw body bytes.
//! - [`select_encoding`] and [`gzip_compress`] implement the
//!   `Accept-Encoding` negotiation (gzip only) used by the `/echo` route.
//! - [`Server`] accepts TCP connections and serves one request per
//!   connection on its own Tokio task, reading until the parser succeeds
//!   or rejects, bounded by [`Limits`].
//!
//! # Example
//!
//! ```no_run
//! use scratch_web::{Handler, Limits, Request, Response, Server};
//! use tokio::net::TcpListener;
//!
//! struct Hello;
//!
//! impl Handler for Hello {
//!     async fn handle(&self, _req: &Request) -> Response {
//!         Response::new(200, "OK").body("Hello world!")
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     Server::builder()
//!         .listener(TcpListener::bind("127.0.0.1:4221").await.unwrap())
//!         .handler(Hello)
//!         .limits(Limits::default())
//!         .build()
//!         .launch()
//!         .await;
//! }
//! ```
//!
//! Not supported, by design: chunked transfer-encoding, keep-alive
//! connections, pipelining, HTTP/2, TLS. A connection carries exactly one
//! request and one response.

pub(crate) mod http {
    pub(crate) mod encoding;
    pub(crate) mod request;
    pub(crate) mod response;
}
pub(crate) mod server {
    pub(crate) mod connection;
    pub(crate) mod server_impl;
}
pub(crate) mod errors;
pub mod limits;
pub mod routes;

pub use crate::{
    errors::ParseError,
    http::{
        encoding::{gzip_compress, select_encoding},
        request::Request,
        response::Response,
    },
    limits::Limits,
    routes::{AppRouter, ServeConfig},
    server::server_impl::{Handler, Server, ServerBuilder},
};
