//! Async TCP server using Tokio.
//!
//! Accepts TCP connections and dispatches HTTP/1.1 requests to a [`Router`].
//! Connections are persistent (keep-alive) unless the client asks otherwise.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::http::{
    StatusCode,
    request::{Request, RequestError},
    response::Response,
};
use crate::model::ErrorBody;
use crate::router::Router;

/// Errors produced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Largest request we buffer before answering `413` (1 MiB). Lookups are
/// body-less GETs, so anything near this is not a legitimate client.
const MAX_REQUEST_SIZE: usize = 1024 * 1024;

/// Initial read buffer capacity per connection.
const INITIAL_BUF_SIZE: usize = 4096;

/// The HTTP front end of the lookup service.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use country_search::{Router, Server};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = Server::bind("127.0.0.1:8080").await?;
/// server
///     .serve(Arc::new(Router::new()), async {
///         let _ = tokio::signal::ctrl_c().await;
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound
    /// (e.g. port already in use, insufficient permissions).
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_owned(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections and dispatches their requests to `router` until
    /// `shutdown` resolves.
    ///
    /// Each connection runs on its own Tokio task. Connections already being
    /// served when `shutdown` fires finish their current request on their own;
    /// no new connections are accepted.
    ///
    /// # Errors
    ///
    /// Accept failures are logged and skipped, so in practice this returns
    /// `Ok(())` once `shutdown` completes.
    pub async fn serve(
        self,
        router: Arc<Router>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ServerError> {
        info!(address = %self.local_addr, "country-search listening");
        tokio::pin!(shutdown);

        loop {
            let (stream, peer_addr) = tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!(error = %e, "failed to accept connection");
                        continue;
                    }
                },
            };

            debug!(peer = %peer_addr, "connection accepted");
            let router = Arc::clone(&router);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, router).await {
                    warn!(peer = %peer_addr, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Serves one TCP connection, one request per loop iteration, until the peer
/// closes it or asks for `Connection: close`.
///
/// Bytes already buffered are parsed before reading again, so pipelined
/// requests are answered in order without waiting on the socket.
async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    router: Arc<Router>,
) -> Result<(), std::io::Error> {
    let mut buf = BytesMut::with_capacity(INITIAL_BUF_SIZE);

    loop {
        let (request, body_offset) = match Request::parse(&buf) {
            Ok(pair) => pair,
            Err(RequestError::Incomplete) => {
                if buf.len() > MAX_REQUEST_SIZE {
                    warn!(peer = %peer_addr, "request headers too large, sending 413");
                    reject_too_large(&mut stream).await?;
                    break;
                }
                if !read_more(&mut stream, &mut buf, peer_addr).await? {
                    break;
                }
                continue;
            }
            Err(e) => {
                warn!(peer = %peer_addr, error = %e, "bad request, sending 400");
                let response =
                    Response::json(StatusCode::BadRequest, &ErrorBody::new(e.to_string()))
                        .keep_alive(false);
                stream.write_all(&response.into_bytes()).await?;
                break;
            }
        };

        // Content-Length is client-controlled; check it before waiting for a body.
        let content_length = request.content_length().unwrap_or(0);
        let Some(total_needed) = body_offset
            .checked_add(content_length)
            .filter(|&total| total <= MAX_REQUEST_SIZE)
        else {
            warn!(peer = %peer_addr, content_length, "declared body too large, sending 413");
            reject_too_large(&mut stream).await?;
            break;
        };

        if buf.len() < total_needed {
            if !read_more(&mut stream, &mut buf, peer_addr).await? {
                break;
            }
            continue;
        }

        let keep_alive = request.is_keep_alive();

        debug!(
            peer = %peer_addr,
            method = %request.method(),
            path = %request.path(),
            "dispatching request"
        );

        let response = router.route(request).await.keep_alive(keep_alive);
        stream.write_all(&response.into_bytes()).await?;
        stream.flush().await?;

        let _ = buf.split_to(total_needed);

        if !keep_alive {
            debug!(peer = %peer_addr, "Connection: close, shutting down");
            break;
        }
    }

    Ok(())
}

/// Reads more bytes into `buf`. Returns `false` once the peer has closed.
async fn read_more(
    stream: &mut TcpStream,
    buf: &mut BytesMut,
    peer_addr: SocketAddr,
) -> Result<bool, std::io::Error> {
    if stream.read_buf(buf).await? == 0 {
        debug!(peer = %peer_addr, "connection closed by peer");
        return Ok(false);
    }
    Ok(true)
}

async fn reject_too_large(stream: &mut TcpStream) -> Result<(), std::io::Error> {
    let response = Response::json(
        StatusCode::PayloadTooLarge,
        &ErrorBody::new("Request entity too large"),
    )
    .keep_alive(false);
    stream.write_all(&response.into_bytes()).await
}
