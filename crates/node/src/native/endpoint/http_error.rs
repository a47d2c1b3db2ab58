use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::prelude::chordring_core;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (code, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (code, msg).into_response()
    }
}

impl From<chordring_core::error::Error> for HttpError {
    fn from(e: chordring_core::error::Error) -> Self {
        use chordring_core::error::Error;
        match e {
            Error::Failed { .. } => HttpError::Unavailable(e.to_string()),
            Error::Invalid(_)
            | Error::InvalidIdSpace(_)
            | Error::URLParse(_) => HttpError::BadRequest(e.to_string()),
            _ => {
                tracing::error!("internal error: {}", e);
                HttpError::Internal(e.to_string())
            }
        }
    }
}
