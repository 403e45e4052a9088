use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    db::models::AuthUser,
    error::QuizError,
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

/// `Json` whose failures are reported like every other error.
pub struct JsonBody<T>(pub T);

impl<S: Send + Sync, T: DeserializeOwned> FromRequest<S> for JsonBody<T> {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .reject_input("invalid request body")?;
        Ok(JsonBody(value))
    }
}

/// `Path` with `AppError` rejections, so a bad id is a JSON 400.
pub struct PathParam<T>(pub T);

impl<S: Send + Sync, T: DeserializeOwned + Send> FromRequestParts<S> for PathParam<T> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .reject_input("invalid path")?;
        Ok(PathParam(value))
    }
}

pub struct QueryParam<T>(pub T);

impl<S: Send + Sync, T: DeserializeOwned> FromRequestParts<S> for QueryParam<T> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .reject_input("invalid query")?;
        Ok(QueryParam(value))
    }
}

/// Guard extractor that resolves the `token` header to a logged in user.
///
/// A missing, empty or non-numeric token is rejected as malformed (401); a
/// well formed token that is not in the store is rejected as logged out (403).
pub struct AuthGuard(pub AuthUser);

impl FromRequestParts<AppState> for AuthGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(names::TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .trim();

        if !is_well_formed(token) {
            return Err(QuizError::InvalidToken.into());
        }

        let user_id = state
            .db
            .user_for_token(token)
            .await?
            .ok_or(QuizError::NotLoggedIn)?;

        Ok(AuthGuard(AuthUser {
            user_id,
            token: token.to_string(),
        }))
    }
}

fn is_well_formed(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_shape() {
        assert!(is_well_formed("2088123421490213"));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("12a4"));
        assert!(!is_well_formed("-12"));
    }
}
