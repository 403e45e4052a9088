use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::models::{User, UserDetails};
use super::Db;
use crate::error::{QuizError, Result};
use crate::utils;

impl Db {
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.read(|data| Ok(data.users.values().any(|u| u.email == email)))
            .await
    }

    /// Registering counts as the user's first successful login.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name_first: &str,
        name_last: &str,
    ) -> Result<i32> {
        let password_hash = hash_password(password)?;

        let user_id = self
            .write(|data| {
                if data.users.values().any(|u| u.email == email) {
                    return Err(QuizError::validation(format!(
                        "email '{email}' is already in use"
                    )));
                }

                data.user_count += 1;
                let user_id = data.user_count;
                data.users.insert(
                    user_id,
                    User {
                        user_id,
                        email: email.to_string(),
                        password_hash,
                        name_first: name_first.to_string(),
                        name_last: name_last.to_string(),
                        num_successful_logins: 1,
                        num_failed_passwords_since_last_login: 0,
                        previous_password_hashes: Vec::new(),
                    },
                );
                Ok(user_id)
            })
            .await?;

        tracing::info!("new user created: id={user_id}, email={email}");
        Ok(user_id)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<i32>> {
        self.read(|data| {
            Ok(data
                .users
                .values()
                .find(|u| u.email == email)
                .map(|u| u.user_id))
        })
        .await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        let stored_hash = self
            .read(|data| {
                Ok(data
                    .users
                    .values()
                    .find(|u| u.email == email)
                    .map(|u| u.password_hash.clone()))
            })
            .await?;

        Ok(stored_hash.is_some_and(|hash| verify_password(password, &hash)))
    }

    /// Bumps the login counters: a success resets the failure streak.
    pub async fn record_login(&self, user_id: i32, success: bool) -> Result<()> {
        self.write(|data| {
            let user = data
                .users
                .get_mut(&user_id)
                .ok_or_else(|| QuizError::not_found(format!("user {user_id} does not exist")))?;
            if success {
                user.num_successful_logins += 1;
                user.num_failed_passwords_since_last_login = 0;
            } else {
                user.num_failed_passwords_since_last_login += 1;
            }
            Ok(())
        })
        .await
    }

    pub async fn create_token(&self, user_id: i32) -> Result<String> {
        let token = utils::new_token();
        self.write(|data| {
            data.tokens.insert(token.clone(), user_id);
            Ok(())
        })
        .await?;

        tracing::info!("new token issued for user_id={user_id}");
        Ok(token)
    }

    pub async fn user_for_token(&self, token: &str) -> Result<Option<i32>> {
        self.read(|data| Ok(data.tokens.get(token).copied())).await
    }

    pub async fn delete_token(&self, token: &str) -> Result<()> {
        let user_id = self
            .write(|data| data.tokens.remove(token).ok_or(QuizError::NotLoggedIn))
            .await?;

        tracing::info!("token revoked for user_id={user_id}");
        Ok(())
    }

    pub async fn user_details(&self, user_id: i32) -> Result<UserDetails> {
        self.read(|data| {
            let user = data
                .users
                .get(&user_id)
                .ok_or_else(|| QuizError::not_found(format!("user {user_id} does not exist")))?;
            Ok(UserDetails {
                user_id,
                name: format!("{} {}", user.name_first, user.name_last),
                email: user.email.clone(),
                num_successful_logins: user.num_successful_logins,
                num_failed_passwords_since_last_login: user.num_failed_passwords_since_last_login,
            })
        })
        .await
    }

    pub async fn verify_password_for_user(&self, user_id: i32, password: &str) -> Result<bool> {
        let hashes = self.password_hashes(user_id).await?;
        Ok(hashes
            .first()
            .is_some_and(|current| verify_password(password, current)))
    }

    /// True if `password` matches the current password or any earlier one.
    pub async fn password_previously_used(&self, user_id: i32, password: &str) -> Result<bool> {
        let hashes = self.password_hashes(user_id).await?;
        Ok(hashes.iter().any(|hash| verify_password(password, hash)))
    }

    pub async fn set_password(&self, user_id: i32, password: &str) -> Result<()> {
        let password_hash = hash_password(password)?;
        self.write(|data| {
            let user = data
                .users
                .get_mut(&user_id)
                .ok_or_else(|| QuizError::not_found(format!("user {user_id} does not exist")))?;
            let old = std::mem::replace(&mut user.password_hash, password_hash);
            user.previous_password_hashes.push(old);
            Ok(())
        })
        .await?;

        tracing::info!("password updated for user_id={user_id}");
        Ok(())
    }

    /// The current hash first, then every earlier one.
    async fn password_hashes(&self, user_id: i32) -> Result<Vec<String>> {
        self.read(|data| {
            let user = data
                .users
                .get(&user_id)
                .ok_or_else(|| QuizError::not_found(format!("user {user_id} does not exist")))?;
            Ok(std::iter::once(&user.password_hash)
                .chain(user.previous_password_hashes.iter())
                .cloned()
                .collect())
        })
        .await
    }
}

const HASH_THREAD_STACK: usize = 4 * 1024 * 1024;

/// Runs an argon2 job on a dedicated thread; debug builds overflow the
/// default stack.
fn on_hash_thread<T: Send + 'static>(job: impl FnOnce() -> T + Send + 'static) -> Result<T> {
    std::thread::Builder::new()
        .stack_size(HASH_THREAD_STACK)
        .spawn(job)
        .map_err(|e| QuizError::Hashing(e.to_string()))?
        .join()
        .map_err(|_| QuizError::Hashing("hash thread panicked".to_string()))
}

fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    on_hash_thread(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| QuizError::Hashing(e.to_string()))
    })?
}

/// False for a wrong password and for a stored hash that does not parse.
fn verify_password(password: &str, stored: &str) -> bool {
    let password = password.to_string();
    let stored = stored.to_string();
    on_hash_thread(move || {
        PasswordHash::new(&stored).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    })
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_their_own_password() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
    }

    #[test]
    fn unparseable_hash_never_verifies() {
        assert!(!verify_password("password123", "password123"));
        assert!(!verify_password("", ""));
    }
}
