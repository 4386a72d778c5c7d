pub mod multipart_form_data;
pub mod responses;
