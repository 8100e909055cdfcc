use core::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{
        HeaderValue, Method, Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE},
    },
    middleware as ax_middleware,
    response::IntoResponse,
    routing::{self, get},
};
use floorboard_common::{API_PREFIX, ENDPOINT_FILE_ROUTE};
use tower::ServiceBuilder;
use tower_http::{
    ServiceBuilderExt as _,
    cors::{AllowOrigin, CorsLayer},
    request_id::MakeRequestUuid,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    app::AppState,
    http::{
        api,
        middleware::secure_headers_middleware,
    },
    network::OriginSet,
};

/// Creates the application router: the API under [`API_PREFIX`] and the published
/// endpoint file under [`ENDPOINT_FILE_ROUTE`].
pub(crate) fn create_app_router() -> Router<AppState> {
    Router::new()
        .nest(API_PREFIX, api::routes())
        .route(ENDPOINT_FILE_ROUTE, get(api::server_info))
}

/// CORS policy admitting exactly the given origins.
pub(crate) fn cors_layer(origins: &OriginSet) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring CORS origin that is not a valid header value");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

pub(crate) fn create_app(app_state: AppState, origins: &OriginSet) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .sensitive_headers([AUTHORIZATION, COOKIE])
        .set_x_request_id(MakeRequestUuid)
        .propagate_x_request_id()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer(origins))
        .layer(ax_middleware::from_fn(secure_headers_middleware));

    create_app_router()
        .with_state(app_state)
        .fallback(routing::any(|req: Request<Body>| async move {
            warn!(method = %req.method(), uri = %req.uri(), "Unhandled request");
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }))
        .layer(middleware_stack)
}
