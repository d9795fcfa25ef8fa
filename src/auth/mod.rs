//! Authentication flows, the ownership guard, and the `CurrentUser`
//! extractor that gates every protected route.

pub mod password;
pub mod session;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use sqlx::SqlitePool;
use thiserror::Error;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::user::{CredentialError, User};
use crate::models::Todo;
use crate::AppState;

/// Why a registration attempt was rejected.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("password and confirmation do not match")]
    PasswordMismatch,
    #[error("username is already taken")]
    UsernameTaken,
    #[error(transparent)]
    Internal(#[from] AppError),
}

/// Create a new account. The caller is not logged in on success.
pub async fn register(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<User, RegisterError> {
    if password != confirm_password {
        return Err(RegisterError::PasswordMismatch);
    }
    let hash = password::hash(password).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    match User::create(pool, username, &hash).await {
        Ok(user) => Ok(user),
        Err(CredentialError::DuplicateUsername) => Err(RegisterError::UsernameTaken),
        Err(CredentialError::Database(e)) => Err(RegisterError::Internal(e.into())),
    }
}

/// Why a login attempt was rejected. A missing account and a wrong password
/// collapse into one variant; callers cannot tell them apart.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("unknown account or wrong password")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] AppError),
}

/// Check credentials and return the matching user.
pub async fn login(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, LoginError> {
    let Some(user) = User::find_by_username(pool, username)
        .await
        .map_err(AppError::from)?
    else {
        return Err(LoginError::InvalidCredentials);
    };
    let valid = password::verify(password, &user.password_hash)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;
    if !valid {
        return Err(LoginError::InvalidCredentials);
    }
    Ok(user)
}

/// Rejected access to a todo owned by someone else.
#[derive(Debug, Error)]
#[error("todo {todo_id} is not owned by user {user_id}")]
pub struct NotOwner {
    pub todo_id: i64,
    pub user_id: i64,
}

/// Allow the operation only for the todo's owner.
pub fn require_owner(todo: &Todo, user: &User) -> Result<(), NotOwner> {
    if todo.owner_id != user.id {
        return Err(NotOwner {
            todo_id: todo.id,
            user_id: user.id,
        });
    }
    Ok(())
}

/// The authenticated user for the current request.
///
/// Extraction fails with a redirect to `/login` when the request carries no
/// resolvable session, so protected handlers never run unauthenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;
        match session::current_user(&session, &state.pool).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(Redirect::to("/login")),
            Err(err) => {
                tracing::error!(error = %err, "failed to resolve session user");
                Err(Redirect::to("/login"))
            }
        }
    }
}
