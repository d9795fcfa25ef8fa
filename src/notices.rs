//! User-facing notices attached to redirect responses.
//!
//! A handler that redirects builds its notices explicitly and hands them to
//! [`redirect_with`] together with the target; the session is only the
//! transport to the next request. The next rendered page drains them with
//! [`take`], so every notice is shown exactly once.

use axum::response::Redirect;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppError;

const PENDING_KEY: &str = "pending_notices";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

/// A short user-facing message attached to a redirect response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// CSS class hook used by the templates.
    pub fn class(&self) -> &'static str {
        match self.level {
            Level::Success => "notice-success",
            Level::Error => "notice-error",
        }
    }
}

/// Redirect to `to`, queueing `notices` for the next rendered page.
pub async fn redirect_with(
    session: &Session,
    to: &str,
    notices: Vec<Notice>,
) -> Result<Redirect, AppError> {
    if !notices.is_empty() {
        let mut pending: Vec<Notice> = session.get(PENDING_KEY).await?.unwrap_or_default();
        pending.extend(notices);
        session.insert(PENDING_KEY, pending).await?;
    }
    Ok(Redirect::to(to))
}

/// Drain the notices queued for this request.
pub async fn take(session: &Session) -> Result<Vec<Notice>, AppError> {
    Ok(session
        .remove::<Vec<Notice>>(PENDING_KEY)
        .await?
        .unwrap_or_default())
}
