use super::dto::{Car, CarFormDto};
use super::validation::{self, FieldError};
use crate::{
    modules::common::{
        multipart_form_data::{check_uploaded_image, UploadedFile},
        responses::{internal_error_msg, SimpleError, ValidationProblem},
    },
    server::controller::AppState,
    services::image_storage::UploadError,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use axum_typed_multipart::TypedMultipart;
use http::StatusCode;

pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_car))
        .route("/:car_id", put(update_car))
}

/// how a car request got rejected before reaching persistence
#[derive(Debug)]
enum CarRejection {
    /// the attached file failed the file check, carries that single message
    File(String),

    /// one or more field rules failed, the collected errors
    Fields(Vec<FieldError>),

    /// the image upload failed after validation passed
    Upload(UploadError),
}

impl IntoResponse for CarRejection {
    fn into_response(self) -> Response {
        match self {
            CarRejection::File(msg) => ValidationProblem::single(msg).into_response(),

            CarRejection::Fields(errors) => {
                let messages = errors
                    .into_iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();

                ValidationProblem::from_messages(messages).into_response()
            }

            CarRejection::Upload(err) => match err {
                UploadError::InvalidInput => {
                    (StatusCode::BAD_REQUEST, SimpleError::from(err.to_string())).into_response()
                }
                _ => internal_error_msg(&err.to_string()).into_response(),
            },
        }
    }
}

/// Validates a car form and, if a image was attached, uploads it, returning
/// the normalized record ready for persistence.
///
/// The file check runs after the field rules but fails the request on its own,
/// a broken file is reported even when unrelated field errors exist and those
/// field errors never make it into the file rejection body.
async fn validate_and_upload(
    state: &AppState,
    form: &CarFormDto,
    image: Option<UploadedFile>,
) -> Result<Car, CarRejection> {
    let field_result = validation::validate_car_form(form);

    if let Some(file) = &image {
        if let Err(msg) = check_uploaded_image(file) {
            return Err(CarRejection::File(msg));
        }
    }

    let mut car = field_result.map_err(CarRejection::Fields)?;

    if let Some(file) = image {
        let url = state
            .image_uploader
            .upload(&file)
            .await
            .map_err(CarRejection::Upload)?;

        car.image = Some(url);
    }

    Ok(car)
}

/// Creates a new car
#[utoipa::path(
    post,
    path = "/car",
    tag = "car",
    request_body(content = CarFormDto, content_type = "multipart/form-data"),
    responses(
        (
            status = OK,
            description = "the normalized car record",
            body = Car,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "one or more fields or the attached image failed validation",
            body = ValidationProblem,
        ),
        (
            status = INTERNAL_SERVER_ERROR,
            description = "the car image could not be uploaded",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_car(
    State(state): State<AppState>,
    TypedMultipart(mut form): TypedMultipart<CarFormDto>,
) -> Result<Json<Car>, Response> {
    let image = form.image.take().map(UploadedFile::from);

    let car = validate_and_upload(&state, &form, image)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(car))
}

/// Updates a existing car, revalidating the whole form
#[utoipa::path(
    put,
    path = "/car/{car_id}",
    tag = "car",
    params(("car_id" = i32, Path, description = "id of the car to update")),
    request_body(content = CarFormDto, content_type = "multipart/form-data"),
    responses(
        (
            status = OK,
            description = "the normalized car record",
            body = Car,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "one or more fields or the attached image failed validation",
            body = ValidationProblem,
        ),
        (
            status = INTERNAL_SERVER_ERROR,
            description = "the car image could not be uploaded",
            body = SimpleError,
        ),
    ),
)]
pub async fn update_car(
    State(state): State<AppState>,
    Path(car_id): Path<i32>,
    TypedMultipart(mut form): TypedMultipart<CarFormDto>,
) -> Result<Json<Car>, Response> {
    tracing::debug!("validating update for car {}", car_id);

    let image = form.image.take().map(UploadedFile::from);

    let car = validate_and_upload(&state, &form, image)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(car))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::image_storage::{ImageUploader, ObjectStorage};
    use axum::{async_trait, body::Bytes};
    use std::{sync::Arc, time::Duration};

    struct NoopStorage;

    #[async_trait]
    impl ObjectStorage for NoopStorage {
        async fn put(&self, _key: &str, _bytes: Bytes) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn test_state() -> AppState {
        AppState {
            image_uploader: ImageUploader::new(
                Arc::new(NoopStorage),
                String::from("https://cdn.example.com"),
                Duration::from_millis(50),
            ),
        }
    }

    fn valid_form() -> CarFormDto {
        CarFormDto {
            image: None,
            plate: Some(String::from("B 1234 XYZ")),
            manufacture: Some(String::from("Toyota")),
            model: Some(String::from("Avanza")),
            rent_per_day: Some(String::from("350000")),
            capacity: Some(String::from("7")),
            description: Some(String::from("7 seater family car")),
            available_at: Some(String::from("2024-01-01")),
            transmission: Some(String::from("automatic")),
            available: Some(String::from("true")),
            car_type: Some(String::from("MPV")),
            year: Some(String::from("2020")),
            options: None,
            specs: None,
        }
    }

    fn file(content_type: &str) -> UploadedFile {
        UploadedFile {
            filename: Some(String::from("front-view.png")),
            content_type: Some(String::from(content_type)),
            contents: Bytes::from_static(b"not really an image"),
        }
    }

    #[tokio::test]
    async fn a_broken_file_rejects_on_its_own_even_with_field_errors_present() {
        let mut form = valid_form();
        form.plate = Some(String::from("   "));

        let rejection = validate_and_upload(&test_state(), &form, Some(file("application/pdf")))
            .await
            .expect_err("the pdf should be rejected");

        // the file rejection wins and carries only its own message, the
        // blank plate error never makes it into this response
        match rejection {
            CarRejection::File(msg) => assert!(msg.contains("unsupported file type")),
            other => panic!("expected a file rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn field_errors_reach_the_aggregate_gate_when_the_file_is_fine() {
        let mut form = valid_form();
        form.plate = Some(String::from("   "));

        let rejection = validate_and_upload(&test_state(), &form, Some(file("image/png")))
            .await
            .expect_err("the blank plate should be rejected");

        match rejection {
            CarRejection::Fields(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "plate");
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn a_valid_form_with_a_valid_image_gets_the_uploaded_url() {
        let car = validate_and_upload(&test_state(), &valid_form(), Some(file("image/png")))
            .await
            .expect("form and image are valid");

        let url = car.image.expect("the image url should be set");
        assert!(url.starts_with("https://cdn.example.com/car/"));
    }
}
