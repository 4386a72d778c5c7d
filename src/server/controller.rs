use super::open_api;
use crate::{modules::car::routes::create_car_router, services::image_storage::ImageUploader};
use axum::{routing::get, Router};
use http::{header, HeaderValue, Method, StatusCode};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// The main application state, cloned for every request so its fields
/// should contain types that are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub image_uploader: ImageUploader,
}

/// Creates the main axum router/controller to be served over https
pub fn new(image_uploader: ImageUploader) -> Router {
    let state = AppState { image_uploader };

    let allowed_origins = vec!["http://localhost:5173".parse::<HeaderValue>().unwrap()];

    let cors = CorsLayer::new()
        .allow_methods([
            Method::PATCH,
            Method::POST,
            Method::GET,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(allowed_origins)
        .allow_credentials(true)
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(open_api::create_openapi_router())
        .nest("/car", create_car_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[utoipa::path(
    get,
    tag = "meta",
    path = "/healthcheck",
    responses((status = OK)),
)]
pub async fn healthcheck() -> StatusCode {
    StatusCode::OK
}
