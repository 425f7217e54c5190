/// Username/password verification
///
/// Bad credentials are never an error: an unknown username, a wrong password
/// and an unparseable stored hash all come back as `Ok(None)`. Only database
/// and thread-pool failures propagate.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use super::password::{verify_password_blocking, PasswordError};
use crate::models::user::User;

/// Error type for credential checks
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Returns the user if `password` matches the stored hash
pub async fn authenticate_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>, CredentialsError> {
    let Some(user) = User::find_by_username(pool, username).await? else {
        debug!(username, "Login attempt for unknown user");
        return Ok(None);
    };

    match verify_password_blocking(password.to_string(), user.hashed_password.clone()).await {
        Ok(true) => Ok(Some(user)),
        Ok(false) => {
            debug!(user_id = user.id, "Password mismatch");
            Ok(None)
        }
        Err(PasswordError::InvalidHash(reason)) => {
            warn!(user_id = user.id, %reason, "Stored password hash is not parseable");
            Ok(None)
        }
        Err(PasswordError::VerifyError(reason)) => {
            warn!(user_id = user.id, %reason, "Password verification failed");
            Ok(None)
        }
        Err(other) => Err(other.into()),
    }
}
