//! JSON body extractor with domain error rejections.
//!
//! axum's default `Json` rejects malformed bodies with 422 and a
//! plain-text message. The API treats a bad payload as a validation
//! error (400 with the `{"code","message"}` body), so request handlers
//! take this wrapper instead.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::http::error::AppError;

/// JSON request body. Deserialization failures surface through
/// [`AppError::Validation`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
