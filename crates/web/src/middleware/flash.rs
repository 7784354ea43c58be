//! One-shot flash notices stored in the session.
//!
//! A mutation pushes a [`Notice`] before redirecting; the next rendered page
//! takes it, which removes it from the session.

use tower_sessions::Session;

use crate::handler::Notice;

/// Session key holding the pending notice.
const FLASH_KEY: &str = "flash";

/// Store a notice for the next rendered page, replacing any pending one.
///
/// # Errors
///
/// Returns the session store error if the session cannot be written.
pub async fn push(session: &Session, notice: &Notice) -> Result<(), tower_sessions::session::Error> {
    session.insert(FLASH_KEY, notice).await
}

/// Remove and return the pending notice.
///
/// A broken session only costs the notice, so errors are logged and dropped.
pub async fn take(session: &Session) -> Option<Notice> {
    match session.remove::<Notice>(FLASH_KEY).await {
        Ok(notice) => notice,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash notice from session");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_take_consumes_notice() {
        let session = session();
        push(&session, &Notice::success("Saved")).await.unwrap();

        assert_eq!(take(&session).await, Some(Notice::success("Saved")));
        assert_eq!(take(&session).await, None);
    }

    #[tokio::test]
    async fn test_push_replaces_pending_notice() {
        let session = session();
        push(&session, &Notice::success("first")).await.unwrap();
        push(&session, &Notice::success("second")).await.unwrap();

        assert_eq!(take(&session).await.unwrap().message, "second");
    }
}
