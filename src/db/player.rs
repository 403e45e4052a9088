use std::collections::{BTreeMap, HashSet};

use super::models::{
    Player, PlayerStatus, QuestionResult, QuestionView, Response, Session, SessionResults,
};
use super::{Data, Db};
use crate::error::{QuizError, Result};
use crate::lifecycle::{SessionAction, SessionState, Transition};
use crate::utils;

impl Data {
    fn player_session(&self, player_id: i32) -> Result<(&Player, &Session)> {
        let player = self.player(player_id)?;
        let session = self.sessions.get(&player.session_id).ok_or_else(|| {
            QuizError::not_found(format!("session {} does not exist", player.session_id))
        })?;
        Ok((player, session))
    }
}

/// `position` must be in range and be the question the session is on.
fn check_position(session: &Session, position: u32) -> Result<()> {
    if position < 1 || position > session.num_questions() {
        return Err(QuizError::validation(format!(
            "question position {position} is not valid for this session"
        )));
    }
    if position != session.at_question {
        return Err(QuizError::validation(format!(
            "session is not currently on question {position}"
        )));
    }
    Ok(())
}

impl Db {
    /// Adds a player to a session in the lobby. A blank name is replaced by a
    /// generated one. Reaching the session's auto start count starts it.
    pub async fn join_session(&self, session_id: i32, name: &str) -> Result<i32> {
        let name = match name.trim() {
            "" => utils::random_player_name(),
            name => name.to_string(),
        };

        let player_id = self
            .write(|data| {
                let session = data.session_mut(session_id)?;
                if session.state != SessionState::Lobby {
                    return Err(QuizError::invalid_state("joining", session.state));
                }
                if session.players.contains(&name) {
                    return Err(QuizError::Conflict(format!(
                        "name '{name}' is already taken in this session"
                    )));
                }

                session.players.push(name.clone());
                let auto_start = session.auto_start_num > 0
                    && session.players.len() >= session.auto_start_num as usize;
                if auto_start {
                    self.apply_transition(session, Transition::Action(SessionAction::NextQuestion))?;
                }

                data.player_count += 1;
                let player_id = data.player_count;
                data.players.insert(
                    player_id,
                    Player {
                        player_id,
                        session_id,
                        name: name.clone(),
                        responses: BTreeMap::new(),
                    },
                );
                Ok(player_id)
            })
            .await?;

        tracing::info!("player {player_id} '{name}' joined session {session_id}");
        Ok(player_id)
    }

    pub async fn player_status(&self, player_id: i32) -> Result<PlayerStatus> {
        self.read(|data| {
            let (_, session) = data.player_session(player_id)?;
            Ok(PlayerStatus {
                state: session.state,
                num_questions: session.num_questions(),
                at_question: session.at_question,
            })
        })
        .await
    }

    pub async fn player_question(&self, player_id: i32, position: u32) -> Result<QuestionView> {
        self.read(|data| {
            let (_, session) = data.player_session(player_id)?;
            if matches!(
                session.state,
                SessionState::Lobby
                    | SessionState::QuestionCountdown
                    | SessionState::FinalResults
                    | SessionState::End
            ) {
                return Err(QuizError::invalid_state("viewing a question", session.state));
            }
            check_position(session, position)?;
            session
                .question_at(position)
                .map(QuestionView::from)
                .ok_or_else(|| QuizError::validation(format!("no question at position {position}")))
        })
        .await
    }

    /// Records the player's answer to the open question, replacing any
    /// earlier answer they gave to it.
    pub async fn submit_answer(&self, player_id: i32, position: u32, answer_ids: &[i32]) -> Result<()> {
        self.write(|data| {
            let (_, session) = data.player_session(player_id)?;
            if session.state != SessionState::QuestionOpen {
                return Err(QuizError::invalid_state("answering", session.state));
            }
            check_position(session, position)?;

            if answer_ids.is_empty() {
                return Err(QuizError::validation("at least one answer must be chosen"));
            }
            let unique: HashSet<i32> = answer_ids.iter().copied().collect();
            if unique.len() != answer_ids.len() {
                return Err(QuizError::validation("answer ids must not repeat"));
            }
            let question = session
                .question_at(position)
                .ok_or_else(|| QuizError::validation(format!("no question at position {position}")))?;
            if let Some(bad) = answer_ids
                .iter()
                .find(|id| !question.answers.iter().any(|a| a.answer_id == **id))
            {
                return Err(QuizError::validation(format!(
                    "answer {bad} is not an option for this question"
                )));
            }

            let player = data
                .players
                .get_mut(&player_id)
                .ok_or_else(|| QuizError::not_found(format!("player {player_id} does not exist")))?;
            player.responses.insert(
                position,
                Response {
                    answer_ids: answer_ids.to_vec(),
                    submitted_at: utils::now_millis(),
                },
            );
            Ok(())
        })
        .await
    }

    /// Results for one question, available while its answer is on show.
    pub async fn player_question_results(&self, player_id: i32, position: u32) -> Result<QuestionResult> {
        self.read(|data| {
            let (player, session) = data.player_session(player_id)?;
            if session.state != SessionState::AnswerShow {
                return Err(QuizError::invalid_state("viewing question results", session.state));
            }
            check_position(session, position)?;
            super::question_results(session, &data.session_players(player.session_id), position)
                .ok_or_else(|| QuizError::validation(format!("no question at position {position}")))
        })
        .await
    }

    pub async fn player_results(&self, player_id: i32) -> Result<SessionResults> {
        self.read(|data| {
            let (player, session) = data.player_session(player_id)?;
            if session.state != SessionState::FinalResults {
                return Err(QuizError::invalid_state("viewing results", session.state));
            }
            Ok(super::session_results(
                session,
                &data.session_players(player.session_id),
            ))
        })
        .await
    }
}
