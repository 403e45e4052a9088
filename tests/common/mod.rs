#![allow(dead_code)]

use std::path::PathBuf;

use quizhost::db::{
    models::{AnswerBody, QuestionBody},
    Db,
};

pub fn create_test_db() -> Db {
    Db::in_memory()
}

/// A fresh path in the temp dir for a file-backed store.
pub fn test_data_path() -> PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("quizhost_test_{}_{}.json", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    path
}

pub async fn create_user(db: &Db, email: &str) -> i32 {
    db.create_user(email, "password123", "Hayden", "Smith")
        .await
        .expect("create user")
}

/// A valid question; `correct` lists the 0-based indices of correct answers.
pub fn question(text: &str, duration: i64, points: i64, correct: &[usize]) -> QuestionBody {
    QuestionBody {
        question: text.to_string(),
        duration,
        points,
        answers: ["Prince Charles", "Prince William", "Princess Anne"]
            .iter()
            .enumerate()
            .map(|(idx, answer)| AnswerBody {
                answer: answer.to_string(),
                correct: correct.contains(&idx),
            })
            .collect(),
    }
}

/// A quiz owned by `user_id` holding `durations.len()` questions, each with
/// the first answer correct and worth 10 points.
pub async fn create_quiz_with_questions(db: &Db, user_id: i32, name: &str, durations: &[i64]) -> i32 {
    let quiz_id = db
        .create_quiz(user_id, name, "A quiz")
        .await
        .expect("create quiz");
    for (idx, duration) in durations.iter().enumerate() {
        db.create_question(
            user_id,
            quiz_id,
            &question(&format!("Question number {}", idx + 1), *duration, 10, &[0]),
        )
        .await
        .expect("create question");
    }
    quiz_id
}

pub mod http {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use quizhost::{names, router, AppState};

    pub fn app() -> Router {
        router(AppState::new(super::create_test_db()))
    }

    /// Sends one request and returns the status with the decoded JSON body.
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(names::TOKEN_HEADER, token);
        }
        let body = match body {
            Some(json) => {
                req = req.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let resp = app
            .clone()
            .oneshot(req.body(body).expect("request build should succeed"))
            .await
            .expect("router should respond");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Registers a user and returns their token.
    pub async fn register(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/admin/auth/register",
            None,
            Some(serde_json::json!({
                "email": email,
                "password": "password123",
                "nameFirst": "Hayden",
                "nameLast": "Smith",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }
}
