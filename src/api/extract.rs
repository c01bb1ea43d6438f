use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `Json` whose rejections are reported as [`AppError`] JSON bodies
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Path` whose rejections are reported as [`AppError`] JSON bodies
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
