//! Extractors whose rejections go through `AppError`, so malformed
//! requests get the same `{"error","kind"}` body as every other failure.

use axum::extract::{FromRequest, FromRequestParts, Path};

use crate::error::AppError;

/// JSON body. Syntax, type and missing-field errors are `invalid_input`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters. An id that does not parse names no entity, so it is
/// `not_found`.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
