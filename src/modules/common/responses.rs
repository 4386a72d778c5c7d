use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

/// A struct for simple API error responses, contains a timestamp from the moment
/// of its creation and a error message
///
/// its meant to be sent as JSON so its `IntoResponse` implementation will set the
/// response body to JSON
#[derive(Serialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimpleError {
    error: String,
    timestamp: DateTime<Utc>,
}

impl SimpleError {
    /// Creates a simple error with a generic 'internal server error message'
    /// ideally this should be used whenever something that should almost never
    /// fail on the request lifecycle does fail.
    pub fn internal() -> SimpleError {
        SimpleError::from("internal server error")
    }
}

impl From<String> for SimpleError {
    fn from(v: String) -> Self {
        SimpleError {
            error: v,
            timestamp: Utc::now(),
        }
    }
}

impl From<&str> for SimpleError {
    fn from(v: &str) -> Self {
        SimpleError::from(String::from(v))
    }
}

impl IntoResponse for SimpleError {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

pub fn internal_error_msg(msg: &str) -> (StatusCode, SimpleError) {
    (StatusCode::INTERNAL_SERVER_ERROR, SimpleError::from(msg))
}

/// Body of every request validation failure, a fixed `status: false` marker
/// plus one message per broken rule
#[derive(Serialize, Clone, ToSchema)]
pub struct ValidationProblem {
    status: bool,
    errors: Vec<ValidationMessage>,
}

#[derive(Serialize, Clone, ToSchema)]
pub struct ValidationMessage {
    msg: String,
}

impl ValidationProblem {
    pub fn single(msg: String) -> ValidationProblem {
        ValidationProblem::from_messages(vec![msg])
    }

    pub fn from_messages(messages: Vec<String>) -> ValidationProblem {
        ValidationProblem {
            status: false,
            errors: messages
                .into_iter()
                .map(|msg| ValidationMessage { msg })
                .collect(),
        }
    }
}

impl IntoResponse for ValidationProblem {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}
