//! HTTP endpoints of the lookup service.

use std::sync::Arc;

use tracing::warn;

use crate::context::Context;
use crate::middleware::LoggerMiddleware;
use crate::model::ErrorBody;
use crate::router::Router;
use crate::service::CountrySearchService;
use crate::{Response, StatusCode};

/// Path of the country lookup endpoint.
pub const SEARCH_PATH: &str = "/api/countries/search";

/// Builds the service's route table with request logging layered on.
pub fn routes(service: Arc<CountrySearchService>) -> Router {
    let mut router = Router::new();
    router.get(SEARCH_PATH, move |ctx: Context| {
        let service = Arc::clone(&service);
        async move { search_countries(&service, &ctx).await }
    });
    router.layer(LoggerMiddleware);
    router
}

/// `GET /api/countries/search?name={name}`
///
/// - `400 {"error":"Name is required"}` when `name` is absent or empty.
/// - `200` with the country summary on success.
/// - `500 {"error": <message>}` for any upstream failure.
pub async fn search_countries(service: &CountrySearchService, ctx: &Context) -> Response {
    let Some(name) = ctx.query("name").filter(|name| !name.is_empty()) else {
        warn!("country search rejected: name is required");
        return Response::json(StatusCode::BadRequest, &ErrorBody::new("Name is required"));
    };

    match service.search(name).await {
        Ok(summary) => Response::json(StatusCode::Ok, &summary),
        Err(e) => Response::json(
            StatusCode::InternalServerError,
            &ErrorBody::new(e.to_string()),
        ),
    }
}
