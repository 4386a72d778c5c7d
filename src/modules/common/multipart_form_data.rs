use axum::body::Bytes;
use axum_typed_multipart::FieldData;

/// max accepted size for a uploaded image (50 MiB)
pub const MAX_IMAGE_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// mime types a uploaded car image is allowed to have
pub const ALLOWED_IMAGE_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// a file taken out of a multipart/form-data request part, keeping only
/// the part metadata the upload pipeline cares about
#[derive(Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub contents: Bytes,
}

impl From<FieldData<Bytes>> for UploadedFile {
    fn from(field: FieldData<Bytes>) -> Self {
        UploadedFile {
            filename: field.metadata.file_name,
            content_type: field.metadata.content_type,
            contents: field.contents,
        }
    }
}

/// asserts a uploaded file is a image the car endpoints accept, returning the
/// rejection message otherwise
///
/// this check is meant to fail the whole request on its own, it does not feed
/// the per field validation error list
pub fn check_uploaded_image(file: &UploadedFile) -> Result<(), String> {
    let has_filename = file.filename.as_deref().map_or(false, |f| !f.is_empty());

    if !has_filename || file.contents.is_empty() {
        return Err(String::from(
            "invalid file, a filename and file data must be present",
        ));
    }

    let content_type = file.content_type.as_deref().unwrap_or_default();

    if !ALLOWED_IMAGE_MIME_TYPES.contains(&content_type) {
        return Err(String::from(
            "unsupported file type, use JPEG, PNG or GIF",
        ));
    }

    if file.contents.len() > MAX_IMAGE_SIZE_BYTES {
        return Err(String::from("file too large, max size is 50MB"));
    }

    Ok(())
}

/// creates a object filename from a uploaded file with the following format:
///
/// `<original_name_stem>_<now_timestamp>.<original_extension>`
///
/// eg: `front-view_02-10-2023_10:20:59.jpeg`
pub fn filename_with_timestamp(original_filename: &str) -> String {
    let timestamp = chrono::Utc::now().format("%d-%m-%Y_%H:%M:%S");

    match original_filename.rsplit_once('.') {
        Some((stem, extension)) => format!("{}_{}.{}", stem, timestamp, extension),
        None => format!("{}_{}", original_filename, timestamp),
    }
}
