// Data store - every table lives in memory behind one lock and is written
// back to a single JSON file after each mutation.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{QuizError, Result};
use crate::names;

pub mod models;
pub use models::*;

mod player;
mod question;
mod quiz;
mod report;
mod session;
mod trash;
mod user;

pub use report::{question_results, session_results};

/// Everything that gets persisted.
#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Data {
    users: BTreeMap<i32, User>,
    tokens: HashMap<String, i32>,
    quizzes: BTreeMap<i32, Quiz>,
    trash: BTreeMap<i32, Quiz>,
    sessions: BTreeMap<i32, Session>,
    players: BTreeMap<i32, Player>,
    user_count: i32,
    quiz_count: i32,
    session_count: i32,
    player_count: i32,
}

impl Data {
    /// A live quiz owned by `user_id`.
    fn owned_quiz(&self, user_id: i32, quiz_id: i32) -> Result<&Quiz> {
        let quiz = self
            .quizzes
            .get(&quiz_id)
            .ok_or_else(|| QuizError::not_found(format!("quiz {quiz_id} does not exist")))?;
        if quiz.creator_id != user_id {
            return Err(QuizError::NotOwner(quiz_id));
        }
        Ok(quiz)
    }

    fn owned_quiz_mut(&mut self, user_id: i32, quiz_id: i32) -> Result<&mut Quiz> {
        self.owned_quiz(user_id, quiz_id)?;
        self.quizzes
            .get_mut(&quiz_id)
            .ok_or_else(|| QuizError::not_found(format!("quiz {quiz_id} does not exist")))
    }

    fn session_mut(&mut self, session_id: i32) -> Result<&mut Session> {
        self.sessions
            .get_mut(&session_id)
            .ok_or_else(|| QuizError::not_found(format!("session {session_id} does not exist")))
    }

    fn player(&self, player_id: i32) -> Result<&Player> {
        self.players
            .get(&player_id)
            .ok_or_else(|| QuizError::not_found(format!("player {player_id} does not exist")))
    }

    fn active_sessions(&self) -> usize {
        self.sessions
            .values()
            .filter(|s| s.state.is_active())
            .count()
    }

    fn quiz_name_taken(&self, owner_id: i32, name: &str, except: Option<i32>) -> bool {
        self.quizzes
            .values()
            .any(|q| q.creator_id == owner_id && q.name == name && Some(q.quiz_id) != except)
    }
}

// Main database handle
#[derive(Clone)]
pub struct Db {
    data: Arc<Mutex<Data>>,
    path: Option<Arc<PathBuf>>,
    countdown: Duration,
}

impl Db {
    /// Opens the store backed by `path`, restoring whatever was saved there.
    /// A missing file starts an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Data>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no data file at {}, starting empty", path.display());
                Data::default()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "data restored from {}: {} users, {} quizzes, {} sessions",
            path.display(),
            data.users.len(),
            data.quizzes.len(),
            data.sessions.len()
        );

        Ok(Self {
            data: Arc::new(Mutex::new(data)),
            path: Some(Arc::new(path)),
            countdown: Duration::from_secs(names::DEFAULT_COUNTDOWN_SECS),
        })
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            data: Arc::new(Mutex::new(Data::default())),
            path: None,
            countdown: Duration::from_secs(names::DEFAULT_COUNTDOWN_SECS),
        }
    }

    /// How long a question counts down before it opens.
    pub fn with_countdown(mut self, countdown: Duration) -> Self {
        self.countdown = countdown;
        self
    }

    /// Resets every table and counter.
    pub async fn clear(&self) -> Result<()> {
        self.write(|data| {
            *data = Data::default();
            Ok(())
        })
        .await?;
        tracing::info!("all data cleared");
        Ok(())
    }

    async fn read<T>(&self, f: impl FnOnce(&Data) -> Result<T>) -> Result<T> {
        let data = self.data.lock().await;
        f(&data)
    }

    /// Runs `f` under the lock and persists the result. `f` must validate
    /// before it mutates: an error aborts without writing.
    async fn write<T>(&self, f: impl FnOnce(&mut Data) -> Result<T>) -> Result<T> {
        let mut data = self.data.lock().await;
        let out = f(&mut data)?;
        self.persist(&data).await?;
        Ok(out)
    }

    async fn persist(&self, data: &Data) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(data)?;
        let tmp = path.with_extension("json.tmp");
        let result = async {
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, path.as_ref()).await
        }
        .await;

        if let Err(e) = result {
            tracing::error!("could not write {}: {e}", path.display());
            return Err(e.into());
        }
        Ok(())
    }
}
