//! Middleware pipeline: composable before/after request handler logic.
//!
//! Each middleware wraps the next layer, and the innermost layer is the
//! matched route handler. A middleware may pass the request through,
//! short-circuit with its own [`Response`], or decorate the downstream one.
//!
//! - [`Middleware`]: trait implemented by all middleware.
//! - [`Next`]: cursor into the remaining chain; call [`Next::run`] to advance.
//! - [`MiddlewareHandler`]: type-erased, cheaply-cloneable middleware function.
//! - [`LoggerMiddleware`]: one structured `tracing` record per request.

use std::{future::Future, pin::Pin, sync::Arc};
use tokio::time::Instant;

use crate::{Response, context::Context, router::Handler};

/// A type-erased, reference-counted middleware function.
pub type MiddlewareHandler = Arc<
    dyn Fn(Context, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static,
>;

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |ctx: Context, next: Next| middleware.handle(ctx, next))
}

/// A cursor into the remaining middleware chain for a single request.
///
/// `Next` is consumed by [`run`](Self::run), so a middleware can forward a
/// request at most once. Once every middleware has run, the route handler
/// the cursor was created with produces the response.
pub struct Next {
    middlewares: Arc<[MiddlewareHandler]>,
    index: usize,
    endpoint: Handler,
}

impl Next {
    /// Creates a cursor positioned at the start of `middlewares`, ending in `endpoint`.
    pub fn new(middlewares: Arc<[MiddlewareHandler]>, endpoint: Handler) -> Self {
        Self {
            middlewares,
            index: 0,
            endpoint,
        }
    }

    /// Invokes the next middleware, or the endpoint when none remain.
    pub async fn run(mut self, ctx: Context) -> Response {
        match self.middlewares.get(self.index).cloned() {
            Some(handler) => {
                self.index += 1;
                handler(ctx, self).await
            }
            None => (self.endpoint)(ctx).await,
        }
    }
}

/// The core trait for all middleware.
///
/// Implementations are shared across Tokio tasks and must not hold `&mut`
/// references to shared state across an `.await` point.
pub trait Middleware: Send + Sync {
    /// Handle the request and optionally delegate to the next middleware.
    fn handle(&self, ctx: Context, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

/// Logs the method, path, status, and duration of every request.
///
/// The record is emitted at `info` after the downstream handler completes.
/// The query string is logged as well since it carries the looked-up name.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn handle(&self, ctx: Context, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin(async move {
            let start = Instant::now();
            let method = ctx.request().method().as_str().to_owned();
            let path = ctx.request().path().to_owned();
            let query = ctx.request().query_string().unwrap_or_default().to_owned();

            let response = next.run(ctx).await;

            tracing::info!(
                %method,
                %path,
                %query,
                status = response.status().as_u16(),
                elapsed = ?start.elapsed(),
                "request handled"
            );

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{Request, StatusCode};

    fn context(path: &str) -> Context {
        let raw = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let (req, _) = Request::parse(raw.as_bytes()).unwrap();
        Context::new(req)
    }

    fn ok_endpoint() -> Handler {
        Arc::new(
            |_ctx: Context| -> Pin<Box<dyn Future<Output = Response> + Send>> {
                Box::pin(async { Response::new(StatusCode::Ok) })
            },
        )
    }

    struct Tag {
        name: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Middleware for Tag {
        fn handle(
            &self,
            ctx: Context,
            next: Next,
        ) -> Pin<Box<dyn Future<Output = Response> + Send>> {
            let name = self.name;
            let seen = Arc::clone(&self.seen);
            Box::pin(async move {
                seen.lock().unwrap().push(name);
                let mut response = next.run(ctx).await;
                response.set_header("X-Last-Layer", name);
                response
            })
        }
    }

    struct Reject;

    impl Middleware for Reject {
        fn handle(
            &self,
            _ctx: Context,
            _next: Next,
        ) -> Pin<Box<dyn Future<Output = Response> + Send>> {
            Box::pin(async { Response::new(StatusCode::BadRequest) })
        }
    }

    #[tokio::test]
    async fn empty_chain_runs_endpoint() {
        let next = Next::new(Arc::from(Vec::<MiddlewareHandler>::new()), ok_endpoint());
        assert_eq!(next.run(context("/")).await.status(), StatusCode::Ok);
    }

    #[tokio::test]
    async fn layers_run_in_order_and_unwind_in_reverse() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let layers: Vec<MiddlewareHandler> = vec![
            from_middleware(Arc::new(Tag {
                name: "outer",
                seen: Arc::clone(&seen),
            })),
            from_middleware(Arc::new(Tag {
                name: "inner",
                seen: Arc::clone(&seen),
            })),
        ];

        let response = Next::new(Arc::from(layers), ok_endpoint())
            .run(context("/"))
            .await;

        assert_eq!(*seen.lock().unwrap(), vec!["outer", "inner"]);
        // The outer layer decorates last.
        assert_eq!(response.headers().get("x-last-layer"), Some("outer"));
    }

    #[tokio::test]
    async fn short_circuit_skips_endpoint() {
        let layers: Vec<MiddlewareHandler> = vec![from_middleware(Arc::new(Reject))];
        let response = Next::new(Arc::from(layers), ok_endpoint())
            .run(context("/"))
            .await;
        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[tokio::test]
    async fn logger_passes_response_through() {
        let layers: Vec<MiddlewareHandler> = vec![from_middleware(Arc::new(LoggerMiddleware))];
        let response = Next::new(Arc::from(layers), ok_endpoint())
            .run(context("/api/countries/search?name=Peru"))
            .await;
        assert_eq!(response.status(), StatusCode::Ok);
    }
}
