use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Raw multipart payload for creating or updating a car.
///
/// Every body field arrives as an optional string token, never rejecting at
/// extraction time, so the validation rules can report missing and malformed
/// fields uniformly.
#[derive(TryFromMultipart, ToSchema)]
#[try_from_multipart(rename_all = "camelCase")]
pub struct CarFormDto {
    #[schema(value_type = String, format = Binary)]
    pub image: Option<FieldData<Bytes>>,

    pub plate: Option<String>,

    pub manufacture: Option<String>,

    pub model: Option<String>,

    pub rent_per_day: Option<String>,

    pub capacity: Option<String>,

    pub description: Option<String>,

    pub available_at: Option<String>,

    pub transmission: Option<String>,

    pub available: Option<String>,

    #[form_data(field_name = "type")]
    pub car_type: Option<String>,

    pub year: Option<String>,

    /// JSON encoded array, eg: `["sunroof", "gps"]`
    pub options: Option<String>,

    /// JSON encoded array, eg: `["1500cc"]`
    pub specs: Option<String>,
}

/// A car record after every validation rule passed, with all fields
/// normalized to their target types.
#[derive(Serialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub plate: String,

    pub manufacture: String,

    pub model: String,

    pub rent_per_day: i32,

    pub capacity: i32,

    pub description: String,

    /// normalized to UTC, serialized as a ISO 8601 timestamp
    pub available_at: DateTime<Utc>,

    pub transmission: String,

    pub available: bool,

    #[serde(rename = "type")]
    pub car_type: String,

    pub year: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specs: Option<Vec<serde_json::Value>>,

    /// public URL of the uploaded car image, set after a successful upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
