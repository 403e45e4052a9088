//! The live session state machine.
//!
//! A session starts in [`SessionState::Lobby`] and is driven forward by the
//! quiz owner's actions. Two transitions are timed: the countdown before a
//! question opens and the question's own duration. Timers are owned by the
//! store; this module only decides which moves are legal.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Lobby,
    QuestionCountdown,
    QuestionOpen,
    QuestionClose,
    AnswerShow,
    FinalResults,
    End,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lobby => "LOBBY",
            Self::QuestionCountdown => "QUESTION_COUNTDOWN",
            Self::QuestionOpen => "QUESTION_OPEN",
            Self::QuestionClose => "QUESTION_CLOSE",
            Self::AnswerShow => "ANSWER_SHOW",
            Self::FinalResults => "FINAL_RESULTS",
            Self::End => "END",
        }
    }

    /// Every state except `END` counts against the live session cap.
    pub fn is_active(&self) -> bool {
        *self != Self::End
    }

    /// Returns the state reached by `transition`, or `None` if the move is
    /// not allowed from here.
    pub fn next(self, transition: Transition) -> Option<SessionState> {
        use SessionAction::*;
        use SessionState::*;

        match (self, transition) {
            (End, _) => None,
            (_, Transition::Action(EndSession)) => Some(End),

            (Lobby | QuestionClose | AnswerShow, Transition::Action(NextQuestion)) => {
                Some(QuestionCountdown)
            }
            (QuestionCountdown, Transition::Action(SkipCountdown))
            | (QuestionCountdown, Transition::CountdownElapsed) => Some(QuestionOpen),
            (QuestionOpen, Transition::DurationElapsed) => Some(QuestionClose),
            (QuestionOpen | QuestionClose, Transition::Action(GoToAnswer)) => Some(AnswerShow),
            (AnswerShow | QuestionClose, Transition::Action(GoToFinalResults)) => {
                Some(FinalResults)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner-issued actions accepted by `PUT /admin/quiz/{id}/session/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    NextQuestion,
    SkipCountdown,
    GoToAnswer,
    GoToFinalResults,
    EndSession,
}

impl SessionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextQuestion => "NEXT_QUESTION",
            Self::SkipCountdown => "SKIP_COUNTDOWN",
            Self::GoToAnswer => "GO_TO_ANSWER",
            Self::GoToFinalResults => "GO_TO_FINAL_RESULTS",
            Self::EndSession => "END",
        }
    }
}

impl FromStr for SessionAction {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEXT_QUESTION" => Ok(Self::NextQuestion),
            "SKIP_COUNTDOWN" => Ok(Self::SkipCountdown),
            "GO_TO_ANSWER" => Ok(Self::GoToAnswer),
            "GO_TO_FINAL_RESULTS" => Ok(Self::GoToFinalResults),
            "END" | "END_SESSION" => Ok(Self::EndSession),
            other => Err(QuizError::validation(format!(
                "'{other}' is not a valid session action"
            ))),
        }
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can move a session: an owner action or an elapsed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Action(SessionAction),
    CountdownElapsed,
    DurationElapsed,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(action) => action.fmt(f),
            Self::CountdownElapsed => f.write_str("countdown elapsed"),
            Self::DurationElapsed => f.write_str("question duration elapsed"),
        }
    }
}
