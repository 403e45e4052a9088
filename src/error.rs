//! Domain errors shared by the store, the services and the HTTP boundary.

use crate::lifecycle::SessionState;

pub type Result<T, E = QuizError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// A referenced user, quiz, question, session or player does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("password is incorrect")]
    IncorrectPassword,

    /// The token is empty or not a numeric string.
    #[error("token is not a valid structure")]
    InvalidToken,

    /// The token is well formed but does not belong to a logged in user.
    #[error("token is not for a currently logged in session")]
    NotLoggedIn,

    #[error("user does not own quiz {0}")]
    NotOwner(i32),

    /// The session (or the action requested on it) is in the wrong state.
    #[error("{action} is not allowed while the session is in {state}")]
    InvalidState {
        action: String,
        state: SessionState,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    LimitReached(String),

    #[error("could not hash password: {0}")]
    Hashing(String),

    #[error("could not persist data: {0}")]
    Storage(#[from] std::io::Error),

    #[error("could not encode data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QuizError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(action: impl Into<String>, state: SessionState) -> Self {
        Self::InvalidState {
            action: action.into(),
            state,
        }
    }
}
