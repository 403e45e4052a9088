use super::models::{Answer, Question, QuestionBody, Quiz};
use super::Db;
use crate::error::{QuizError, Result};
use crate::{names, utils, validate};

fn build_answers(body: &QuestionBody) -> Vec<Answer> {
    body.answers
        .iter()
        .enumerate()
        .map(|(idx, a)| Answer {
            answer_id: idx as i32 + 1,
            answer: a.answer.clone(),
            colour: names::ANSWER_COLOURS[idx % names::ANSWER_COLOURS.len()].to_string(),
            correct: a.correct,
        })
        .collect()
}

/// Fails if the quiz would run longer than the cap once `added` seconds are
/// added and `removed` seconds are taken away.
fn check_total_duration(quiz: &Quiz, added: u32, removed: u32) -> Result<()> {
    let total = u64::from(quiz.duration()) - u64::from(removed) + u64::from(added);
    if total > u64::from(names::MAX_QUIZ_DURATION_SECS) {
        return Err(QuizError::validation(format!(
            "quiz duration would be {total}s, the limit is {}s",
            names::MAX_QUIZ_DURATION_SECS
        )));
    }
    Ok(())
}

fn question_index(quiz: &Quiz, question_id: i32) -> Result<usize> {
    quiz.question_position(question_id).ok_or_else(|| {
        QuizError::validation(format!(
            "question {question_id} is not part of quiz {}",
            quiz.quiz_id
        ))
    })
}

impl Db {
    pub async fn create_question(
        &self,
        user_id: i32,
        quiz_id: i32,
        body: &QuestionBody,
    ) -> Result<i32> {
        validate::question(body)?;
        let duration = u32::try_from(body.duration).unwrap_or(u32::MAX);

        let question_id = self
            .write(|data| {
                let quiz = data.owned_quiz_mut(user_id, quiz_id)?;
                check_total_duration(quiz, duration, 0)?;

                let question_id = quiz.next_question_id;
                quiz.next_question_id += 1;
                quiz.questions.push(Question {
                    question_id,
                    question: body.question.clone(),
                    duration,
                    points: body.points as u32,
                    answers: build_answers(body),
                });
                quiz.time_last_edited = utils::now_secs();
                Ok(question_id)
            })
            .await?;

        tracing::info!("question {question_id} added to quiz {quiz_id}");
        Ok(question_id)
    }

    pub async fn update_question(
        &self,
        user_id: i32,
        quiz_id: i32,
        question_id: i32,
        body: &QuestionBody,
    ) -> Result<()> {
        validate::question(body)?;
        let duration = u32::try_from(body.duration).unwrap_or(u32::MAX);

        self.write(|data| {
            let quiz = data.owned_quiz_mut(user_id, quiz_id)?;
            let idx = question_index(quiz, question_id)?;
            check_total_duration(quiz, duration, quiz.questions[idx].duration)?;

            quiz.questions[idx] = Question {
                question_id,
                question: body.question.clone(),
                duration,
                points: body.points as u32,
                answers: build_answers(body),
            };
            quiz.time_last_edited = utils::now_secs();
            Ok(())
        })
        .await
    }

    pub async fn delete_question(&self, user_id: i32, quiz_id: i32, question_id: i32) -> Result<()> {
        self.write(|data| {
            let quiz = data.owned_quiz_mut(user_id, quiz_id)?;
            let idx = question_index(quiz, question_id)?;
            quiz.questions.remove(idx);
            quiz.time_last_edited = utils::now_secs();
            Ok(())
        })
        .await?;

        tracing::info!("question {question_id} removed from quiz {quiz_id}");
        Ok(())
    }

    /// Moves a question to a new 0-based position.
    pub async fn move_question(
        &self,
        user_id: i32,
        quiz_id: i32,
        question_id: i32,
        new_position: i64,
    ) -> Result<()> {
        self.write(|data| {
            let quiz = data.owned_quiz_mut(user_id, quiz_id)?;
            let idx = question_index(quiz, question_id)?;
            let last = quiz.questions.len() as i64 - 1;
            if !(0..=last).contains(&new_position) {
                return Err(QuizError::validation(format!(
                    "new position must be between 0 and {last}"
                )));
            }
            let new_position = new_position as usize;
            if new_position == idx {
                return Err(QuizError::validation(
                    "new position is the question's current position",
                ));
            }

            let question = quiz.questions.remove(idx);
            quiz.questions.insert(new_position, question);
            quiz.time_last_edited = utils::now_secs();
            Ok(())
        })
        .await
    }

    /// Copies a question to the slot right after it and returns the copy's id.
    pub async fn duplicate_question(
        &self,
        user_id: i32,
        quiz_id: i32,
        question_id: i32,
    ) -> Result<i32> {
        self.write(|data| {
            let quiz = data.owned_quiz_mut(user_id, quiz_id)?;
            let idx = question_index(quiz, question_id)?;
            check_total_duration(quiz, quiz.questions[idx].duration, 0)?;

            let new_question_id = quiz.next_question_id;
            quiz.next_question_id += 1;
            let copy = Question {
                question_id: new_question_id,
                ..quiz.questions[idx].clone()
            };
            quiz.questions.insert(idx + 1, copy);
            quiz.time_last_edited = utils::now_secs();
            Ok(new_question_id)
        })
        .await
    }
}
