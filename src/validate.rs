//! Input checks shared by registration, quiz and question authoring.
//!
//! Every check runs before the store is touched, so a failure never leaves
//! partial state behind.

use std::collections::HashSet;

use crate::{
    db::models::QuestionBody,
    error::{QuizError, Result},
    names,
};

fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn email(email: &str) -> Result<()> {
    let invalid = || QuizError::validation(format!("'{email}' is not a valid email"));

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// First and last names: 2–20 letters, spaces, hyphens or apostrophes.
pub fn user_name(name: &str, field: &str) -> Result<()> {
    let len = char_len(name);
    if !(names::MIN_USER_NAME_LENGTH..=names::MAX_USER_NAME_LENGTH).contains(&len) {
        return Err(QuizError::validation(format!(
            "{field} must be between {} and {} characters",
            names::MIN_USER_NAME_LENGTH,
            names::MAX_USER_NAME_LENGTH
        )));
    }
    if name.trim().is_empty() {
        return Err(QuizError::validation(format!("{field} cannot be blank")));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || matches!(c, ' ' | '-' | '\''))
    {
        return Err(QuizError::validation(format!(
            "{field} may only contain letters, spaces, hyphens or apostrophes"
        )));
    }
    Ok(())
}

pub fn password(password: &str) -> Result<()> {
    if char_len(password) < names::MIN_PASSWORD_LENGTH {
        return Err(QuizError::validation(format!(
            "password must be at least {} characters",
            names::MIN_PASSWORD_LENGTH
        )));
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(QuizError::validation(
            "password must contain at least one letter and one number",
        ));
    }
    Ok(())
}

pub fn quiz_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(QuizError::validation("quiz name cannot be blank"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        return Err(QuizError::validation(
            "quiz name may only contain letters, numbers and spaces",
        ));
    }
    let len = char_len(name);
    if !(names::MIN_QUIZ_NAME_LENGTH..=names::MAX_QUIZ_NAME_LENGTH).contains(&len) {
        return Err(QuizError::validation(format!(
            "quiz name must be between {} and {} characters",
            names::MIN_QUIZ_NAME_LENGTH,
            names::MAX_QUIZ_NAME_LENGTH
        )));
    }
    Ok(())
}

pub fn description(description: &str) -> Result<()> {
    if char_len(description) > names::MAX_DESCRIPTION_LENGTH {
        return Err(QuizError::validation(format!(
            "description must be at most {} characters",
            names::MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

/// Checks a question on its own. The aggregate quiz duration is checked by
/// the caller, which knows the other questions.
pub fn question(body: &QuestionBody) -> Result<()> {
    let len = char_len(&body.question);
    if !(names::MIN_QUESTION_LENGTH..=names::MAX_QUESTION_LENGTH).contains(&len) {
        return Err(QuizError::validation(format!(
            "question must be between {} and {} characters",
            names::MIN_QUESTION_LENGTH,
            names::MAX_QUESTION_LENGTH
        )));
    }

    let count = body.answers.len();
    if !(names::MIN_ANSWERS..=names::MAX_ANSWERS).contains(&count) {
        return Err(QuizError::validation(format!(
            "a question must have between {} and {} answers",
            names::MIN_ANSWERS,
            names::MAX_ANSWERS
        )));
    }

    if body.duration <= 0 {
        return Err(QuizError::validation("question duration must be positive"));
    }

    if !(names::MIN_POINTS..=names::MAX_POINTS).contains(&body.points) {
        return Err(QuizError::validation(format!(
            "points must be between {} and {}",
            names::MIN_POINTS,
            names::MAX_POINTS
        )));
    }

    let mut seen = HashSet::new();
    for answer in &body.answers {
        let len = char_len(&answer.answer);
        if !(names::MIN_ANSWER_LENGTH..=names::MAX_ANSWER_LENGTH).contains(&len) {
            return Err(QuizError::validation(format!(
                "answers must be between {} and {} characters",
                names::MIN_ANSWER_LENGTH,
                names::MAX_ANSWER_LENGTH
            )));
        }
        if !seen.insert(answer.answer.as_str()) {
            return Err(QuizError::validation(format!(
                "answer '{}' appears more than once",
                answer.answer
            )));
        }
    }

    if !body.answers.iter().any(|a| a.correct) {
        return Err(QuizError::validation("at least one answer must be correct"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::AnswerBody;

    fn body(question: &str, answers: &[(&str, bool)]) -> QuestionBody {
        QuestionBody {
            question: question.to_string(),
            duration: 10,
            points: 5,
            answers: answers
                .iter()
                .map(|(answer, correct)| AnswerBody {
                    answer: answer.to_string(),
                    correct: *correct,
                })
                .collect(),
        }
    }

    #[test]
    fn emails() {
        assert!(email("hayden.smith@unsw.edu.au").is_ok());
        for bad in ["", "plain", "a@b", "@b.com", "a@@b.com", "a b@c.com", "a@b..com"] {
            assert!(email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn user_names() {
        assert!(user_name("Mary-Jane O'Neil", "first name").is_ok());
        assert!(user_name("A", "first name").is_err());
        assert!(user_name("   ", "first name").is_err());
        assert!(user_name("R2D2", "first name").is_err());
        assert!(user_name("abcdefghijklmnopqrstu", "first name").is_err());
    }

    #[test]
    fn passwords_need_letters_and_digits() {
        assert!(password("abcdefg1").is_ok());
        assert!(password("abc1").is_err());
        assert!(password("abcdefgh").is_err());
        assert!(password("12345678").is_err());
    }

    #[test]
    fn quiz_names() {
        assert!(quiz_name("Cats 101").is_ok());
        assert!(quiz_name("ab").is_err());
        assert!(quiz_name("    ").is_err());
        assert!(quiz_name("cats!").is_err());
        assert!(quiz_name(&"a".repeat(31)).is_err());
    }

    #[test]
    fn descriptions_are_capped() {
        assert!(description("").is_ok());
        assert!(description(&"a".repeat(100)).is_ok());
        assert!(description(&"a".repeat(101)).is_err());
    }

    #[test]
    fn question_needs_a_correct_answer() {
        let q = body("Who is the Monarch?", &[("Charles", false), ("Elizabeth", false)]);
        assert!(question(&q).is_err());
    }

    #[test]
    fn question_rejects_duplicate_answers() {
        let q = body("Who is the Monarch?", &[("Charles", true), ("Charles", false)]);
        assert!(question(&q).is_err());
    }

    #[test]
    fn question_bounds() {
        let ok = body("Who is the Monarch?", &[("Charles", true), ("Anne", false)]);
        assert!(question(&ok).is_ok());

        assert!(question(&body("Who?", &[("Charles", true), ("Anne", false)])).is_err());
        assert!(question(&body("Who is the Monarch?", &[("Charles", true)])).is_err());

        let mut zero = ok.clone();
        zero.duration = 0;
        assert!(question(&zero).is_err());

        let mut too_many_points = ok.clone();
        too_many_points.points = 11;
        assert!(question(&too_many_points).is_err());

        let empty_answer = body("Who is the Monarch?", &[("", true), ("Anne", false)]);
        assert!(question(&empty_answer).is_err());
    }
}
