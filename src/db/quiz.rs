use super::models::{Quiz, QuizInfo, QuizSummary};
use super::Db;
use crate::error::{QuizError, Result};
use crate::lifecycle::{SessionAction, Transition};
use crate::{utils, validate};

impl Db {
    /// Live quizzes owned by `user_id`, oldest first.
    pub async fn quizzes(&self, user_id: i32) -> Result<Vec<QuizSummary>> {
        self.read(|data| {
            Ok(data
                .quizzes
                .values()
                .filter(|q| q.creator_id == user_id)
                .map(Quiz::summary)
                .collect())
        })
        .await
    }

    pub async fn create_quiz(&self, user_id: i32, name: &str, description: &str) -> Result<i32> {
        validate::quiz_name(name)?;
        validate::description(description)?;

        let quiz_id = self
            .write(|data| {
                if data.quiz_name_taken(user_id, name, None) {
                    return Err(QuizError::validation(format!(
                        "you already have a quiz named '{name}'"
                    )));
                }

                data.quiz_count += 1;
                let quiz_id = data.quiz_count;
                let now = utils::now_secs();
                data.quizzes.insert(
                    quiz_id,
                    Quiz {
                        quiz_id,
                        name: name.to_string(),
                        description: description.to_string(),
                        creator_id: user_id,
                        time_created: now,
                        time_last_edited: now,
                        questions: Vec::new(),
                        next_question_id: 1,
                    },
                );
                Ok(quiz_id)
            })
            .await?;

        tracing::info!("new quiz created with id: {quiz_id} for user_id: {user_id}");
        Ok(quiz_id)
    }

    /// Moves the quiz to the trash and ends any of its sessions still running.
    pub async fn remove_quiz(&self, user_id: i32, quiz_id: i32) -> Result<()> {
        let ended = self
            .write(|data| {
                data.owned_quiz(user_id, quiz_id)?;

                let mut quiz = data
                    .quizzes
                    .remove(&quiz_id)
                    .ok_or_else(|| QuizError::not_found(format!("quiz {quiz_id} does not exist")))?;
                quiz.time_last_edited = utils::now_secs();
                data.trash.insert(quiz_id, quiz);

                let mut ended = 0;
                for session in data
                    .sessions
                    .values_mut()
                    .filter(|s| s.quiz_id == quiz_id && s.state.is_active())
                {
                    self.apply_transition(session, Transition::Action(SessionAction::EndSession))?;
                    ended += 1;
                }
                Ok(ended)
            })
            .await?;

        tracing::info!("quiz {quiz_id} moved to trash, {ended} running sessions ended");
        Ok(())
    }

    pub async fn quiz_info(&self, user_id: i32, quiz_id: i32) -> Result<QuizInfo> {
        self.read(|data| Ok(data.owned_quiz(user_id, quiz_id)?.info()))
            .await
    }

    pub async fn rename_quiz(&self, user_id: i32, quiz_id: i32, name: &str) -> Result<()> {
        validate::quiz_name(name)?;

        self.write(|data| {
            data.owned_quiz(user_id, quiz_id)?;
            if data.quiz_name_taken(user_id, name, Some(quiz_id)) {
                return Err(QuizError::validation(format!(
                    "you already have a quiz named '{name}'"
                )));
            }
            let quiz = data.owned_quiz_mut(user_id, quiz_id)?;
            quiz.name = name.to_string();
            quiz.time_last_edited = utils::now_secs();
            Ok(())
        })
        .await?;

        tracing::info!("renamed quiz {quiz_id} to '{name}'");
        Ok(())
    }

    pub async fn update_quiz_description(
        &self,
        user_id: i32,
        quiz_id: i32,
        description: &str,
    ) -> Result<()> {
        validate::description(description)?;

        self.write(|data| {
            let quiz = data.owned_quiz_mut(user_id, quiz_id)?;
            quiz.description = description.to_string();
            quiz.time_last_edited = utils::now_secs();
            Ok(())
        })
        .await
    }

    /// Hands the quiz to the user registered as `email`.
    pub async fn transfer_quiz(&self, user_id: i32, quiz_id: i32, email: &str) -> Result<()> {
        let new_owner = self
            .write(|data| {
                let quiz = data.owned_quiz(user_id, quiz_id)?;
                let new_owner = data
                    .users
                    .values()
                    .find(|u| u.email == email)
                    .map(|u| u.user_id)
                    .ok_or_else(|| QuizError::validation(format!("{email} is not a registered user")))?;

                if new_owner == user_id {
                    return Err(QuizError::validation("you already own this quiz"));
                }
                if data.quiz_name_taken(new_owner, &quiz.name, None) {
                    return Err(QuizError::validation(format!(
                        "{email} already has a quiz named '{}'",
                        quiz.name
                    )));
                }
                if let Some(session) = data
                    .sessions
                    .values()
                    .find(|s| s.quiz_id == quiz_id && s.state.is_active())
                {
                    return Err(QuizError::invalid_state("transfer", session.state));
                }

                let quiz = data.owned_quiz_mut(user_id, quiz_id)?;
                quiz.creator_id = new_owner;
                quiz.time_last_edited = utils::now_secs();
                Ok(new_owner)
            })
            .await?;

        tracing::info!("quiz {quiz_id} transferred from user {user_id} to user {new_owner}");
        Ok(())
    }
}
