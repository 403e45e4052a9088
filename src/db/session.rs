use std::time::Duration;

use ulid::Ulid;

use super::models::{Player, Session, SessionList, SessionResults, SessionStatus};
use super::{Data, Db};
use crate::error::{QuizError, Result};
use crate::lifecycle::{SessionAction, SessionState, Transition};
use crate::{names, utils};

impl Data {
    /// A session of a live quiz owned by `user_id`.
    fn owned_session(&self, user_id: i32, quiz_id: i32, session_id: i32) -> Result<&Session> {
        self.owned_quiz(user_id, quiz_id)?;
        self.sessions
            .get(&session_id)
            .filter(|s| s.quiz_id == quiz_id)
            .ok_or_else(|| {
                QuizError::not_found(format!(
                    "session {session_id} does not exist for quiz {quiz_id}"
                ))
            })
    }

    pub(super) fn session_players(&self, session_id: i32) -> Vec<&Player> {
        self.players
            .values()
            .filter(|p| p.session_id == session_id)
            .collect()
    }
}

impl Db {
    pub async fn start_session(&self, user_id: i32, quiz_id: i32, auto_start_num: i64) -> Result<i32> {
        if !(0..=names::MAX_AUTO_START_NUM).contains(&auto_start_num) {
            return Err(QuizError::validation(format!(
                "autoStartNum must be between 0 and {}",
                names::MAX_AUTO_START_NUM
            )));
        }

        let session_id = self
            .write(|data| {
                let quiz = data.owned_quiz(user_id, quiz_id)?;
                if quiz.questions.is_empty() {
                    return Err(QuizError::validation(format!(
                        "quiz {quiz_id} has no questions"
                    )));
                }
                if data.active_sessions() >= names::MAX_ACTIVE_SESSIONS {
                    return Err(QuizError::LimitReached(format!(
                        "there are already {} sessions running",
                        names::MAX_ACTIVE_SESSIONS
                    )));
                }

                let metadata = quiz.clone();
                data.session_count += 1;
                let session_id = data.session_count;
                data.sessions.insert(
                    session_id,
                    Session {
                        session_id,
                        quiz_id,
                        metadata,
                        state: SessionState::Lobby,
                        auto_start_num: auto_start_num as u32,
                        at_question: 0,
                        players: Vec::new(),
                        opened_at: Default::default(),
                        phase_id: Ulid::new().to_string(),
                    },
                );
                Ok(session_id)
            })
            .await?;

        tracing::info!(
            "session created for quiz={quiz_id}: session_id={session_id}, auto_start_num={auto_start_num}"
        );
        Ok(session_id)
    }

    pub async fn sessions(&self, user_id: i32, quiz_id: i32) -> Result<SessionList> {
        self.read(|data| {
            data.owned_quiz(user_id, quiz_id)?;
            let (active, inactive): (Vec<&Session>, Vec<&Session>) = data
                .sessions
                .values()
                .filter(|s| s.quiz_id == quiz_id)
                .partition(|s| s.state.is_active());
            Ok(SessionList {
                active_sessions: active.iter().map(|s| s.session_id).collect(),
                inactive_sessions: inactive.iter().map(|s| s.session_id).collect(),
            })
        })
        .await
    }

    pub async fn session_status(
        &self,
        user_id: i32,
        quiz_id: i32,
        session_id: i32,
    ) -> Result<SessionStatus> {
        self.read(|data| {
            let session = data.owned_session(user_id, quiz_id, session_id)?;
            let mut players = session.players.clone();
            players.sort();
            Ok(SessionStatus {
                state: session.state,
                at_question: session.at_question,
                players,
                metadata: session.metadata.info(),
            })
        })
        .await
    }

    /// Applies an owner action and returns the state the session ends up in.
    pub async fn update_session_state(
        &self,
        user_id: i32,
        quiz_id: i32,
        session_id: i32,
        action: SessionAction,
    ) -> Result<SessionState> {
        self.write(|data| {
            data.owned_session(user_id, quiz_id, session_id)?;
            let session = data.session_mut(session_id)?;
            self.apply_transition(session, Transition::Action(action))?;
            Ok(session.state)
        })
        .await
    }

    pub async fn session_results(
        &self,
        user_id: i32,
        quiz_id: i32,
        session_id: i32,
    ) -> Result<SessionResults> {
        self.read(|data| {
            let session = data.owned_session(user_id, quiz_id, session_id)?;
            if session.state != SessionState::FinalResults {
                return Err(QuizError::invalid_state("viewing results", session.state));
            }
            Ok(super::session_results(session, &data.session_players(session_id)))
        })
        .await
    }

    /// Moves `session` along `transition`, arming whichever timer the new
    /// state needs. Nothing changes if the move is illegal.
    pub(super) fn apply_transition(&self, session: &mut Session, transition: Transition) -> Result<()> {
        let from = session.state;
        let to = from
            .next(transition)
            .ok_or_else(|| QuizError::invalid_state(transition.to_string(), from))?;
        if to == SessionState::QuestionCountdown && session.at_question >= session.num_questions() {
            return Err(QuizError::invalid_state(
                format!("{transition} after the last question"),
                from,
            ));
        }

        match to {
            SessionState::QuestionCountdown => session.at_question += 1,
            SessionState::FinalResults | SessionState::End => session.at_question = 0,
            _ => {}
        }
        session.state = to;
        session.phase_id = Ulid::new().to_string();

        match to {
            SessionState::QuestionCountdown => {
                self.arm_timer(session, Transition::CountdownElapsed, self.countdown);
            }
            SessionState::QuestionOpen => {
                session.opened_at.insert(session.at_question, utils::now_millis());
                let secs = session
                    .question_at(session.at_question)
                    .map_or(0, |q| u64::from(q.duration));
                self.arm_timer(session, Transition::DurationElapsed, Duration::from_secs(secs));
            }
            _ => {}
        }

        tracing::info!(
            "session {}: {from} -> {to} on {transition}, at question {}",
            session.session_id,
            session.at_question
        );
        Ok(())
    }

    /// Fires `transition` after `delay` unless the session has moved on by then.
    fn arm_timer(&self, session: &Session, transition: Transition, delay: Duration) {
        let db = self.clone();
        let session_id = session.session_id;
        let phase_id = session.phase_id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = db.fire_timer(session_id, &phase_id, transition).await {
                tracing::error!("timer for session {session_id} failed: {e}");
            }
        });
    }

    async fn fire_timer(&self, session_id: i32, phase_id: &str, transition: Transition) -> Result<()> {
        self.write(|data| {
            let Some(session) = data.sessions.get_mut(&session_id) else {
                return Ok(());
            };
            if session.phase_id != phase_id {
                tracing::debug!("session {session_id}: stale timer for {transition} ignored");
                return Ok(());
            }
            self.apply_transition(session, transition)
        })
        .await
    }
}
