// Stored records and the views handed back to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lifecycle::SessionState;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i32,
    pub email: String,
    pub password_hash: String,
    pub name_first: String,
    pub name_last: String,
    pub num_successful_logins: u32,
    pub num_failed_passwords_since_last_login: u32,
    #[serde(default)]
    pub previous_password_hashes: Vec<String>,
}

/// The identity resolved from a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub num_successful_logins: u32,
    pub num_failed_passwords_since_last_login: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub quiz_id: i32,
    pub name: String,
    pub description: String,
    pub creator_id: i32,
    pub time_created: i64,
    pub time_last_edited: i64,
    pub questions: Vec<Question>,
    /// Next question id to hand out; question ids are never reused in a quiz.
    pub next_question_id: i32,
}

impl Quiz {
    pub fn duration(&self) -> u32 {
        self.questions.iter().map(|q| q.duration).sum()
    }

    pub fn question_position(&self, question_id: i32) -> Option<usize> {
        self.questions.iter().position(|q| q.question_id == question_id)
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            quiz_id: self.quiz_id,
            name: self.name.clone(),
        }
    }

    pub fn info(&self) -> QuizInfo {
        QuizInfo {
            quiz_id: self.quiz_id,
            name: self.name.clone(),
            time_created: self.time_created,
            time_last_edited: self.time_last_edited,
            description: self.description.clone(),
            num_questions: self.questions.len(),
            questions: self.questions.clone(),
            duration: self.duration(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: i32,
    pub question: String,
    pub duration: u32,
    pub points: u32,
    pub answers: Vec<Answer>,
}

impl Question {
    pub fn correct_answer_ids(&self) -> Vec<i32> {
        self.answers
            .iter()
            .filter(|a| a.correct)
            .map(|a| a.answer_id)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub answer_id: i32,
    pub answer: String,
    pub colour: String,
    pub correct: bool,
}

/// Question as submitted by the quiz owner.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBody {
    pub question: String,
    pub duration: i64,
    pub points: i64,
    pub answers: Vec<AnswerBody>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnswerBody {
    pub answer: String,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub quiz_id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizInfo {
    pub quiz_id: i32,
    pub name: String,
    pub time_created: i64,
    pub time_last_edited: i64,
    pub description: String,
    pub num_questions: usize,
    pub questions: Vec<Question>,
    pub duration: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: i32,
    pub quiz_id: i32,
    /// Copy of the quiz taken when the session started.
    pub metadata: Quiz,
    pub state: SessionState,
    pub auto_start_num: u32,
    pub at_question: u32,
    pub players: Vec<String>,
    /// When each question (by 1-based position) opened, in epoch millis.
    pub opened_at: BTreeMap<u32, i64>,
    /// Fresh on every transition; a timer armed in an earlier phase sees a
    /// different id when it fires and does nothing.
    pub phase_id: String,
}

impl Session {
    pub fn num_questions(&self) -> u32 {
        self.metadata.questions.len() as u32
    }

    /// The question at a 1-based position.
    pub fn question_at(&self, position: u32) -> Option<&Question> {
        position
            .checked_sub(1)
            .and_then(|idx| self.metadata.questions.get(idx as usize))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: i32,
    pub session_id: i32,
    pub name: String,
    /// Latest response per 1-based question position.
    pub responses: BTreeMap<u32, Response>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub answer_ids: Vec<i32>,
    pub submitted_at: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub state: SessionState,
    pub at_question: u32,
    pub players: Vec<String>,
    pub metadata: QuizInfo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionList {
    pub active_sessions: Vec<i32>,
    pub inactive_sessions: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub state: SessionState,
    pub num_questions: u32,
    pub at_question: u32,
}

/// A question as shown to players: correctness is withheld.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_id: i32,
    pub question: String,
    pub duration: u32,
    pub points: u32,
    pub answers: Vec<AnswerView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub answer_id: i32,
    pub answer: String,
    pub colour: String,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            question_id: q.question_id,
            question: q.question.clone(),
            duration: q.duration,
            points: q.points,
            answers: q
                .answers
                .iter()
                .map(|a| AnswerView {
                    answer_id: a.answer_id,
                    answer: a.answer.clone(),
                    colour: a.colour.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub name: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: i32,
    /// Correct players in the order they answered, with what each earned.
    pub players_correct_list: Vec<PlayerScore>,
    pub average_answer_time: i64,
    pub percent_correct: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResults {
    pub users_ranked_by_score: Vec<PlayerScore>,
    pub question_results: Vec<QuestionResult>,
}
