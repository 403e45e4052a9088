use super::models::{Quiz, QuizSummary};
use super::Db;
use crate::error::{QuizError, Result};
use crate::utils;

impl Db {
    pub async fn trash(&self, user_id: i32) -> Result<Vec<QuizSummary>> {
        self.read(|data| {
            Ok(data
                .trash
                .values()
                .filter(|q| q.creator_id == user_id)
                .map(Quiz::summary)
                .collect())
        })
        .await
    }

    /// Brings a trashed quiz back, provided its name is still free.
    pub async fn restore_quiz(&self, user_id: i32, quiz_id: i32) -> Result<()> {
        self.write(|data| {
            let quiz = data
                .trash
                .get(&quiz_id)
                .ok_or_else(|| QuizError::validation(format!("quiz {quiz_id} is not in the trash")))?;
            if quiz.creator_id != user_id {
                return Err(QuizError::NotOwner(quiz_id));
            }
            if data.quiz_name_taken(user_id, &quiz.name, None) {
                return Err(QuizError::validation(format!(
                    "a live quiz is already named '{}'",
                    quiz.name
                )));
            }

            if let Some(mut quiz) = data.trash.remove(&quiz_id) {
                quiz.time_last_edited = utils::now_secs();
                data.quizzes.insert(quiz_id, quiz);
            }
            Ok(())
        })
        .await?;

        tracing::info!("quiz {quiz_id} restored from trash");
        Ok(())
    }

    /// Permanently deletes the given quizzes. Every id must be in the
    /// caller's trash or nothing is deleted.
    pub async fn empty_trash(&self, user_id: i32, quiz_ids: &[i32]) -> Result<()> {
        self.write(|data| {
            for quiz_id in quiz_ids {
                match data.trash.get(quiz_id) {
                    None => {
                        return Err(QuizError::validation(format!(
                            "quiz {quiz_id} is not in the trash"
                        )))
                    }
                    Some(quiz) if quiz.creator_id != user_id => {
                        return Err(QuizError::NotOwner(*quiz_id))
                    }
                    Some(_) => {}
                }
            }
            for quiz_id in quiz_ids {
                data.trash.remove(quiz_id);
            }
            Ok(())
        })
        .await?;

        tracing::info!("emptied {} quizzes from trash for user {user_id}", quiz_ids.len());
        Ok(())
    }
}
