//! Request routing: map exact paths and HTTP methods to handler functions.
//!
//! Trailing slashes are normalized on both registered and incoming paths, so
//! `/api/countries/search/` reaches the same handler as `/api/countries/search`.
//! Routes are matched in registration order and every response, including
//! the `404`/`405` fallbacks, passes through the registered middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::middleware::{Middleware, MiddlewareHandler, Next, from_middleware};
use crate::model::ErrorBody;
use crate::{Method, Request, Response, StatusCode};

/// Type-erased, heap-allocated async handler that turns a [`Context`] into a
/// [`Response`].
pub type Handler =
    Arc<dyn Fn(Context) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this trait through the blanket impl.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given context, boxing the returned future.
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(ctx))
    }
}

fn into_handler(handler: impl IntoHandler) -> Handler {
    Arc::new(move |ctx| handler.call(ctx))
}

fn trim_trailing_slash(path: &str) -> &str {
    if path != "/" {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// HTTP request router.
///
/// # Examples
///
/// ```rust,no_run
/// use country_search::{Context, Router, Response, StatusCode};
/// use country_search::middleware::LoggerMiddleware;
///
/// let mut router = Router::new();
/// router.get("/ping", |_ctx: Context| async { Response::new(StatusCode::Ok) });
/// router.layer(LoggerMiddleware);
/// ```
pub struct Router {
    routes: Vec<Route>,
    middlewares: Arc<[MiddlewareHandler]>,
    not_found: Handler,
    method_not_allowed: Handler,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            middlewares: Arc::from(Vec::<MiddlewareHandler>::new()),
            not_found: into_handler(|_ctx: Context| async {
                Response::json(StatusCode::NotFound, &ErrorBody::new("Not Found"))
            }),
            method_not_allowed: into_handler(|_ctx: Context| async {
                Response::json(
                    StatusCode::MethodNotAllowed,
                    &ErrorBody::new("Method Not Allowed"),
                )
                .header("Allow", "GET")
            }),
        }
    }

    /// Register a handler for `GET` requests matching `path`.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.routes.push(Route {
            method: Method::Get,
            path: trim_trailing_slash(path).to_owned(),
            handler: into_handler(handler),
        });
    }

    /// Appends `middleware` to the chain. The first layer added is the outermost.
    pub fn layer(&mut self, middleware: impl Middleware + 'static) {
        let mut layers = self.middlewares.to_vec();
        layers.push(from_middleware(Arc::new(middleware)));
        self.middlewares = Arc::from(layers);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatch `request` through the middleware chain to the first matching route.
    ///
    /// A path that matches only under another method gets `405 Method Not
    /// Allowed`; a path matching nothing gets `404 Not Found`.
    pub async fn route(&self, request: Request) -> Response {
        let path = trim_trailing_slash(request.path());
        let mut path_matched = false;
        let mut selected = None;

        for route in self.routes.iter().filter(|route| route.path == path) {
            if &route.method == request.method() {
                selected = Some(Arc::clone(&route.handler));
                break;
            }
            path_matched = true;
        }

        let endpoint = match selected {
            Some(handler) => handler,
            None if path_matched => Arc::clone(&self.method_not_allowed),
            None => Arc::clone(&self.not_found),
        };

        Next::new(Arc::clone(&self.middlewares), endpoint)
            .run(Context::new(request))
            .await
    }
}
