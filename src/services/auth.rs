use std::future::Future;

use crate::db::models::UserDetails;
use crate::db::Db;
use crate::error::{QuizError, Result};
use crate::validate;

// ---------------------------------------------------------------------------
// AuthRepository trait (the service only sees what it needs from the store)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthRepository: Send + Sync {
    fn email_exists(&self, email: &str) -> impl Future<Output = Result<bool>> + Send;

    fn create_user(
        &self,
        email: &str,
        password: &str,
        name_first: &str,
        name_last: &str,
    ) -> impl Future<Output = Result<i32>> + Send;

    fn create_token(&self, user_id: i32) -> impl Future<Output = Result<String>> + Send;

    fn find_user_by_email(&self, email: &str) -> impl Future<Output = Result<Option<i32>>> + Send;

    fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn record_login(&self, user_id: i32, success: bool) -> impl Future<Output = Result<()>> + Send;

    fn delete_token(&self, token: &str) -> impl Future<Output = Result<()>> + Send;

    fn user_details(&self, user_id: i32) -> impl Future<Output = Result<UserDetails>> + Send;

    fn verify_password_for_user(
        &self,
        user_id: i32,
        password: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn password_previously_used(
        &self,
        user_id: i32,
        password: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn set_password(&self, user_id: i32, password: &str) -> impl Future<Output = Result<()>> + Send;
}

impl AuthRepository for Db {
    fn email_exists(&self, email: &str) -> impl Future<Output = Result<bool>> + Send {
        Db::email_exists(self, email)
    }

    fn create_user(
        &self,
        email: &str,
        password: &str,
        name_first: &str,
        name_last: &str,
    ) -> impl Future<Output = Result<i32>> + Send {
        Db::create_user(self, email, password, name_first, name_last)
    }

    fn create_token(&self, user_id: i32) -> impl Future<Output = Result<String>> + Send {
        Db::create_token(self, user_id)
    }

    fn find_user_by_email(&self, email: &str) -> impl Future<Output = Result<Option<i32>>> + Send {
        Db::find_user_by_email(self, email)
    }

    fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<bool>> + Send {
        Db::verify_user_password(self, email, password)
    }

    fn record_login(&self, user_id: i32, success: bool) -> impl Future<Output = Result<()>> + Send {
        Db::record_login(self, user_id, success)
    }

    fn delete_token(&self, token: &str) -> impl Future<Output = Result<()>> + Send {
        Db::delete_token(self, token)
    }

    fn user_details(&self, user_id: i32) -> impl Future<Output = Result<UserDetails>> + Send {
        Db::user_details(self, user_id)
    }

    fn verify_password_for_user(
        &self,
        user_id: i32,
        password: &str,
    ) -> impl Future<Output = Result<bool>> + Send {
        Db::verify_password_for_user(self, user_id, password)
    }

    fn password_previously_used(
        &self,
        user_id: i32,
        password: &str,
    ) -> impl Future<Output = Result<bool>> + Send {
        Db::password_previously_used(self, user_id, password)
    }

    fn set_password(&self, user_id: i32, password: &str) -> impl Future<Output = Result<()>> + Send {
        Db::set_password(self, user_id, password)
    }
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

pub struct AuthService<R: AuthRepository = Db> {
    repo: R,
}

impl<R: AuthRepository + Clone> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates the account and logs it in, returning a fresh token.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name_first: &str,
        name_last: &str,
    ) -> Result<String> {
        let email = email.trim();
        validate::email(email)?;
        validate::user_name(name_first, "nameFirst")?;
        validate::user_name(name_last, "nameLast")?;
        validate::password(password)?;

        if self.repo.email_exists(email).await? {
            return Err(QuizError::validation(format!(
                "email '{email}' is already in use"
            )));
        }

        let user_id = self
            .repo
            .create_user(email, password, name_first, name_last)
            .await?;
        self.repo.create_token(user_id).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let email = email.trim();
        let user_id = self
            .repo
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| QuizError::not_found(format!("no user is registered as '{email}'")))?;

        if !self.repo.verify_user_password(email, password).await? {
            self.repo.record_login(user_id, false).await?;
            tracing::info!("failed login for user_id={user_id}");
            return Err(QuizError::IncorrectPassword);
        }

        self.repo.record_login(user_id, true).await?;
        self.repo.create_token(user_id).await
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.repo.delete_token(token).await
    }

    pub async fn user_details(&self, user_id: i32) -> Result<UserDetails> {
        self.repo.user_details(user_id).await
    }

    pub async fn update_password(
        &self,
        user_id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if !self
            .repo
            .verify_password_for_user(user_id, old_password)
            .await?
        {
            return Err(QuizError::IncorrectPassword);
        }
        if old_password == new_password {
            return Err(QuizError::validation(
                "new password must differ from the current one",
            ));
        }
        validate::password(new_password)?;
        if self
            .repo
            .password_previously_used(user_id, new_password)
            .await?
        {
            return Err(QuizError::validation(
                "new password has been used before",
            ));
        }

        self.repo.set_password(user_id, new_password).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(mock_repo: MockAuthRepository) -> AuthService<MockAuthRepository> {
        AuthService::new(mock_repo)
    }

    // ----- register tests -----

    #[tokio::test]
    async fn register_creates_user_and_returns_token() {
        let mut mock = MockAuthRepository::new();
        mock.expect_email_exists()
            .returning(|_| Box::pin(async { Ok(false) }));
        mock.expect_create_user()
            .withf(|email, _, first, last| {
                email == "hayden@example.com" && first == "Hayden" && last == "Smith"
            })
            .returning(|_, _, _, _| Box::pin(async { Ok(1) }));
        mock.expect_create_token()
            .withf(|user_id| *user_id == 1)
            .returning(|_| Box::pin(async { Ok("12345".to_string()) }));

        let svc = service(mock);
        let token = svc
            .register(" hayden@example.com ", "password123", "Hayden", "Smith")
            .await
            .unwrap();

        assert_eq!(token, "12345");
    }

    #[tokio::test]
    async fn register_email_taken_is_rejected() {
        let mut mock = MockAuthRepository::new();
        mock.expect_email_exists()
            .returning(|_| Box::pin(async { Ok(true) }));
        mock.expect_create_user().never();

        let svc = service(mock);
        let err = svc
            .register("taken@example.com", "password123", "Hayden", "Smith")
            .await
            .unwrap_err();

        assert!(matches!(err, QuizError::Validation(_)));
    }

    #[tokio::test]
    async fn register_invalid_fields_never_touch_the_store() {
        let cases = [
            ("not-an-email", "password123", "Hayden", "Smith"),
            ("a@example.com", "short1", "Hayden", "Smith"),
            ("a@example.com", "passwordonly", "Hayden", "Smith"),
            ("a@example.com", "password123", "H", "Smith"),
            ("a@example.com", "password123", "Hayden", "Sm1th"),
        ];

        for (email, password, first, last) in cases {
            let mock = MockAuthRepository::new();
            let svc = service(mock);
            let err = svc.register(email, password, first, last).await.unwrap_err();
            assert!(
                matches!(err, QuizError::Validation(_)),
                "expected validation error for {email}/{password}/{first}/{last}"
            );
        }
    }

    // ----- login tests -----

    #[tokio::test]
    async fn login_success_records_login_and_returns_token() {
        let mut mock = MockAuthRepository::new();
        mock.expect_find_user_by_email()
            .returning(|_| Box::pin(async { Ok(Some(7)) }));
        mock.expect_verify_user_password()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mock.expect_record_login()
            .withf(|user_id, success| *user_id == 7 && *success)
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));
        mock.expect_create_token()
            .returning(|_| Box::pin(async { Ok("999".to_string()) }));

        let svc = service(mock);
        let token = svc.login("a@example.com", "password123").await.unwrap();

        assert_eq!(token, "999");
    }

    #[tokio::test]
    async fn login_wrong_password_records_failure() {
        let mut mock = MockAuthRepository::new();
        mock.expect_find_user_by_email()
            .returning(|_| Box::pin(async { Ok(Some(7)) }));
        mock.expect_verify_user_password()
            .returning(|_, _| Box::pin(async { Ok(false) }));
        mock.expect_record_login()
            .withf(|user_id, success| *user_id == 7 && !*success)
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));
        mock.expect_create_token().never();

        let svc = service(mock);
        let err = svc.login("a@example.com", "wrong").await.unwrap_err();

        assert!(matches!(err, QuizError::IncorrectPassword));
    }

    #[tokio::test]
    async fn login_unknown_email_is_not_found() {
        let mut mock = MockAuthRepository::new();
        mock.expect_find_user_by_email()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = service(mock);
        let err = svc.login("nobody@example.com", "password123").await.unwrap_err();

        assert!(matches!(err, QuizError::NotFound(_)));
    }

    // ----- update_password tests -----

    #[tokio::test]
    async fn update_password_wrong_old_password() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_password_for_user()
            .returning(|_, _| Box::pin(async { Ok(false) }));
        mock.expect_set_password().never();

        let svc = service(mock);
        let err = svc
            .update_password(1, "wrongpass1", "newpass123")
            .await
            .unwrap_err();

        assert!(matches!(err, QuizError::IncorrectPassword));
    }

    #[tokio::test]
    async fn update_password_rejects_reuse() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_password_for_user()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mock.expect_password_previously_used()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mock.expect_set_password().never();

        let svc = service(mock);
        let err = svc
            .update_password(1, "password123", "oldpass123")
            .await
            .unwrap_err();

        assert!(matches!(err, QuizError::Validation(_)));
    }

    #[tokio::test]
    async fn update_password_same_as_current_is_rejected() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_password_for_user()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mock.expect_set_password().never();

        let svc = service(mock);
        let err = svc
            .update_password(1, "password123", "password123")
            .await
            .unwrap_err();

        assert!(matches!(err, QuizError::Validation(_)));
    }

    #[tokio::test]
    async fn update_password_success() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_password_for_user()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mock.expect_password_previously_used()
            .returning(|_, _| Box::pin(async { Ok(false) }));
        mock.expect_set_password()
            .withf(|user_id, password| *user_id == 1 && password == "newpass123")
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let svc = service(mock);
        svc.update_password(1, "password123", "newpass123")
            .await
            .unwrap();
    }

    // ----- logout tests -----

    #[tokio::test]
    async fn logout_unknown_token_is_not_logged_in() {
        let mut mock = MockAuthRepository::new();
        mock.expect_delete_token()
            .returning(|_| Box::pin(async { Err(QuizError::NotLoggedIn) }));

        let svc = service(mock);
        let err = svc.logout("123").await.unwrap_err();

        assert!(matches!(err, QuizError::NotLoggedIn));
    }
}
