//! Session identity: establishing, clearing and resolving the logged-in
//! user. Session state lives in the store behind tower-sessions, not in
//! process memory.

use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::User;

/// Session key holding the authenticated user's id.
pub const USER_ID_KEY: &str = "user_id";

/// Bind the session to `user`. The session id is cycled before the user id
/// is stored.
pub async fn establish(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await
}

/// Drop the session and everything stored in it. Clearing an anonymous
/// session is not an error.
pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Resolve the session to a user record, if any.
pub async fn current_user(
    session: &Session,
    pool: &SqlitePool,
) -> Result<Option<User>, AppError> {
    let Some(user_id) = session.get::<i64>(USER_ID_KEY).await? else {
        return Ok(None);
    };
    Ok(User::find_by_id(pool, user_id).await?)
}
