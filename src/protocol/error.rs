use serde::Serialize;
use thiserror::Error;

/// The stable error taxonomy from spec.md §7. `Display` is the exact string
/// placed in an outbound reply's `error` field, so wording changes here are
/// wire-format changes.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameError {
    #[error("game not found")]
    GameNotFound,

    #[error("game already started")]
    GameAlreadyStarted,

    #[error("game has no questions")]
    NoQuestions,

    #[error("game is not accepting answers")]
    GameNotAcceptingAnswers,

    #[error("operation not valid in the current game state")]
    WrongState,

    #[error("unknown team")]
    UnknownTeam,

    #[error("{0}")]
    BadRequest(String),

    #[error("could not allocate a game PIN")]
    PinExhausted,
}

impl GameError {
    /// Stable machine-readable tag, independent of the human `Display` text,
    /// so clients can branch on error kind without string-matching.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::GameNotFound => "game_not_found",
            GameError::GameAlreadyStarted => "game_already_started",
            GameError::NoQuestions => "no_questions",
            GameError::GameNotAcceptingAnswers => "game_not_accepting_answers",
            GameError::WrongState => "wrong_state",
            GameError::UnknownTeam => "unknown_team",
            GameError::BadRequest(_) => "bad_request",
            GameError::PinExhausted => "pin_exhausted",
        }
    }
}
