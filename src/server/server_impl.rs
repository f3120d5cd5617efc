use crate::{
    http::{request::Request, response::Response},
    limits::Limits,
    server::connection::serve_connection,
};
use std::{future::Future, sync::Arc};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Turns a parsed request into a response.
///
/// The server calls this once per connection; parsing has already
/// happened and serialization happens afterwards, so implementations
/// deal only in structured values. Handlers hold no per-connection
/// state - a handler instance is shared by every connection task.
///
/// # Examples
/// ```
/// use scratch_web::{Handler, Request, Response};
///
/// struct Probe;
///
/// impl Handler for Probe {
///     async fn handle(&self, request: &Request) -> Response {
///         match request.path() {
///             "/" => Response::new(200, "OK"),
///             _ => Response::new(404, "Not Found"),
///         }
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request) -> impl Future<Output = Response> + Send;
}

/// An HTTP/1.1 server serving one request per connection.
///
/// Every accepted connection runs on its own Tokio task with no state
/// shared between connections, so nothing needs synchronization: the
/// parser and builder are pure functions and the handler is borrowed
/// immutably.
pub struct Server<H: Handler> {
    listener: TcpListener,
    handler: Arc<H>,
    limits: Arc<Limits>,
}

impl<H: Handler> Server<H> {
    /// Creates a builder for configuring the server.
    #[inline]
    pub fn builder() -> ServerBuilder<H> {
        ServerBuilder {
            listener: None,
            handler: None,
            limits: None,
        }
    }

    /// Accepts connections forever, spawning a task per connection.
    ///
    /// A failed accept is logged and skipped; a connection task that
    /// hits a transport error dies alone without touching its siblings.
    pub async fn launch(self) {
        info!(
            addr = ?self.listener.local_addr().ok(),
            "accepting connections"
        );

        loop {
            let (mut stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(error) => {
                    warn!(%error, "accept failed");
                    continue;
                }
            };

            let handler = Arc::clone(&self.handler);
            let limits = Arc::clone(&self.limits);
            tokio::spawn(async move {
                debug!(%peer, "connection accepted");
                if let Err(error) = serve_connection(&mut stream, handler.as_ref(), &limits).await {
                    debug!(%peer, %error, "connection ended with transport error");
                }
            });
        }
    }
}

/// Builder for [`Server`]. The listener and handler are required; limits
/// default to [`Limits::default`].
pub struct ServerBuilder<H: Handler> {
    listener: Option<TcpListener>,
    handler: Option<Arc<H>>,
    limits: Option<Limits>,
}

impl<H: Handler> ServerBuilder<H> {
    /// Sets the TCP listener the server accepts from. Required.
    #[inline]
    pub fn listener(mut self, listener: TcpListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Sets the handler that produces responses. Required.
    #[inline]
    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Overrides the per-connection transport bounds.
    #[inline]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Finalizes the builder.
    ///
    /// # Panics
    /// Panics when [`listener`](Self::listener) or
    /// [`handler`](Self::handler) was not called.
    #[track_caller]
    pub fn build(self) -> Server<H> {
        Server {
            listener: self
                .listener
                .expect("The `listener` method must be called to create"),
            handler: self
                .handler
                .expect("The `handler` method must be called to create"),
            limits: Arc::new(self.limits.unwrap_or_default()),
        }
    }
}
