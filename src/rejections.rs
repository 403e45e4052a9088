use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::QuizError;

/// Everything a handler can fail with. Rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    /// A request that could not be decoded.
    Input(String),
    Quiz(QuizError),
}

impl From<QuizError> for AppError {
    fn from(e: QuizError) -> Self {
        Self::Quiz(e)
    }
}

fn status_for(e: &QuizError) -> StatusCode {
    match e {
        QuizError::InvalidToken => StatusCode::UNAUTHORIZED,
        QuizError::NotLoggedIn => StatusCode::FORBIDDEN,
        QuizError::Storage(_) | QuizError::Serialization(_) | QuizError::Hashing(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        QuizError::Validation(_)
        | QuizError::NotFound(_)
        | QuizError::IncorrectPassword
        | QuizError::NotOwner(_)
        | QuizError::InvalidState { .. }
        | QuizError::Conflict(_)
        | QuizError::LimitReached(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::Input(message) => (StatusCode::BAD_REQUEST, message),
            Self::Quiz(e) => {
                let code = status_for(&e);
                if code.is_server_error() {
                    tracing::error!("request failed: {e}");
                }
                (code, e.to_string())
            }
        };

        (code, Json(json!({ "error": message }))).into_response()
    }
}

pub trait ResultExt<T> {
    /// Turns any error into a 400 carrying `message` and the cause.
    fn reject_input(self, message: &str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject_input(self, message: &str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::debug!("{message}: {e}");
            AppError::Input(format!("{message}: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::SessionState;

    #[test]
    fn errors_map_to_their_status_codes() {
        let cases = [
            (QuizError::InvalidToken, StatusCode::UNAUTHORIZED),
            (QuizError::NotLoggedIn, StatusCode::FORBIDDEN),
            (QuizError::NotOwner(1), StatusCode::BAD_REQUEST),
            (QuizError::IncorrectPassword, StatusCode::BAD_REQUEST),
            (
                QuizError::invalid_state("answering", SessionState::Lobby),
                StatusCode::BAD_REQUEST,
            ),
            (
                QuizError::Hashing("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn input_errors_are_bad_requests() {
        let result: Result<(), &str> = Err("expected value");
        let err = result.reject_input("invalid request body").unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
