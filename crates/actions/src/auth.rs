use crate::error::ActionError;
use crate::store::UserStore;
use async_trait::async_trait;
use core_types::User;
use database::DbError;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

const MIN_PASSWORD_LEN: usize = 6;

/// The sign-in form.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Authentication failures reported by a credentials provider.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("The supplied credentials were rejected.")]
    CredentialsSignin,

    #[error("Sign-in callback failed: {0}")]
    Callback(String),
}

#[derive(Error, Debug)]
pub enum SignInError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Checks credentials and returns the signed-in user.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, SignInError>;
}

/// Email/password provider backed by bcrypt hashes in the `users` table.
#[derive(Debug, Clone)]
pub struct PasswordCredentials<S> {
    users: S,
}

impl<S: UserStore> PasswordCredentials<S> {
    pub fn new(users: S) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<S: UserStore> CredentialsProvider for PasswordCredentials<S> {
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, SignInError> {
        if !credentials.email.contains('@')
            || credentials.password.chars().count() < MIN_PASSWORD_LEN
        {
            return Err(AuthError::CredentialsSignin.into());
        }

        let user = self
            .users
            .get_user(&credentials.email)
            .await?
            .ok_or(AuthError::CredentialsSignin)?;

        let password = credentials.password.clone();
        let hash = user.password.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Callback(e.to_string()))?
            .map_err(|e| AuthError::Callback(e.to_string()))?;

        if !matches {
            tracing::warn!(email = %credentials.email, "Password mismatch on sign-in.");
            return Err(AuthError::CredentialsSignin.into());
        }

        Ok(user)
    }
}

/// Signs in through `provider`.
///
/// Returns `Ok(None)` on success and `Ok(Some(message))` for an authentication
/// failure the user should see. Anything that is not an authentication failure
/// is returned as an error.
pub async fn authenticate(
    provider: &dyn CredentialsProvider,
    credentials: &Credentials,
) -> Result<Option<&'static str>, ActionError> {
    match provider.sign_in(credentials).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User signed in.");
            Ok(None)
        }
        Err(SignInError::Auth(AuthError::CredentialsSignin)) => Ok(Some(INVALID_CREDENTIALS)),
        Err(SignInError::Auth(other)) => {
            tracing::warn!(error = %other, "Sign-in failed.");
            Ok(Some(SOMETHING_WENT_WRONG))
        }
        Err(SignInError::Database(e)) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::DataOp;
    use std::collections::HashMap;
    use uuid::Uuid;

    struct Users {
        by_email: HashMap<String, User>,
        failing: bool,
    }

    impl Users {
        fn with(email: &str, password: &str) -> Self {
            let user = User {
                id: Uuid::new_v4(),
                name: "User".to_string(),
                email: email.to_string(),
                password: bcrypt::hash(password, 4).unwrap(),
            };
            Self {
                by_email: HashMap::from([(email.to_string(), user)]),
                failing: false,
            }
        }
    }

    #[async_trait]
    impl UserStore for Users {
        async fn get_user(&self, email: &str) -> Result<Option<User>, DbError> {
            if self.failing {
                return Err(DbError::Query(DataOp::User));
            }
            Ok(self.by_email.get(email).cloned())
        }
    }

    struct FixedProvider(fn() -> SignInError);

    #[async_trait]
    impl CredentialsProvider for FixedProvider {
        async fn sign_in(&self, _credentials: &Credentials) -> Result<User, SignInError> {
            Err((self.0)())
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn correct_password_signs_in() {
        let provider = PasswordCredentials::new(Users::with("user@nextmail.com", "123456"));
        let message = authenticate(&provider, &credentials("user@nextmail.com", "123456"))
            .await
            .unwrap();
        assert_eq!(message, None);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let provider = PasswordCredentials::new(Users::with("user@nextmail.com", "123456"));
        let message = authenticate(&provider, &credentials("user@nextmail.com", "654321"))
            .await
            .unwrap();
        assert_eq!(message, Some(INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn unknown_or_malformed_input_is_invalid_credentials() {
        let provider = PasswordCredentials::new(Users::with("user@nextmail.com", "123456"));
        for (email, password) in [
            ("nobody@nextmail.com", "123456"),
            ("not-an-email", "123456"),
            ("user@nextmail.com", "123"),
        ] {
            let message = authenticate(&provider, &credentials(email, password)).await.unwrap();
            assert_eq!(message, Some(INVALID_CREDENTIALS), "{email}");
        }
    }

    #[tokio::test]
    async fn corrupt_hash_is_something_went_wrong() {
        let mut users = Users::with("user@nextmail.com", "123456");
        if let Some(user) = users.by_email.get_mut("user@nextmail.com") {
            user.password = "not-a-bcrypt-hash".to_string();
        }
        let provider = PasswordCredentials::new(users);
        let message = authenticate(&provider, &credentials("user@nextmail.com", "123456"))
            .await
            .unwrap();
        assert_eq!(message, Some(SOMETHING_WENT_WRONG));
    }

    #[tokio::test]
    async fn other_auth_errors_map_to_something_went_wrong() {
        let provider = FixedProvider(|| AuthError::Callback("provider offline".to_string()).into());
        let message = authenticate(&provider, &credentials("a@b.c", "123456")).await.unwrap();
        assert_eq!(message, Some(SOMETHING_WENT_WRONG));
    }

    #[tokio::test]
    async fn non_auth_errors_propagate() {
        let mut users = Users::with("user@nextmail.com", "123456");
        users.failing = true;
        let provider = PasswordCredentials::new(users);
        let result = authenticate(&provider, &credentials("user@nextmail.com", "123456")).await;
        assert!(matches!(result, Err(ActionError::Database(DbError::Query(DataOp::User)))));
    }
}
