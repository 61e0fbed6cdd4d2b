//! Request failures that end with the generic error page

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use docchat_core::Error;

use crate::page::render_error_page;

#[derive(Debug)]
pub struct WebError(pub Error);

impl From<Error> for WebError {
    fn from(error: Error) -> Self {
        WebError(error)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Html(render_error_page())).into_response()
    }
}
