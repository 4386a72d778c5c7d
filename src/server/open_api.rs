use crate::modules::{car, common};
use crate::server::controller;
use axum::Router;
use utoipa::openapi::{InfoBuilder, OpenApiBuilder};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(
        common::responses::SimpleError,
        common::responses::ValidationProblem,
        common::responses::ValidationMessage,
        car::dto::CarFormDto,
        car::dto::Car,
    )),
    paths(
        controller::healthcheck,
        car::routes::create_car,
        car::routes::update_car,
    )
)]
struct ApiDoc;

pub fn create_openapi_router() -> Router<controller::AppState> {
    let builder: OpenApiBuilder = ApiDoc::openapi().into();

    let info = InfoBuilder::new()
        .title("Car Catalog API")
        .description(Some("Car rental catalog management api."))
        .version("0.0.1")
        .build();

    let api_doc = builder.info(info).build();

    Router::new().merge(SwaggerUi::new("/swagger").url("/docs/swagger.json", api_doc))
}
