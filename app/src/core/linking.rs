use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::utils::crypto::generate_uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSessionStatus {
    Pending,
    Completed,
    Cancelled,
    Expired,
}

/// One in-flight "connect an account" attempt. The caller opens the provider
/// link page in a popup and polls us until the session resolves.
#[derive(Debug, Clone, Serialize)]
pub struct LinkSession {
    pub id: String,
    pub workspace_id: String,
    pub url: String,
    pub status: LinkSessionStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Account refs already linked when the session opened. Completion diffs
    /// against this to find what the user just connected.
    #[serde(skip_serializing)]
    pub baseline: Vec<String>,
}

/// Sessions live only in process memory. A restart drops them, which is
/// fine: the worst case is the user clicking "connect" again.
#[derive(Debug, Clone, Default)]
pub struct LinkSessionManager {
    sessions: Arc<RwLock<HashMap<String, LinkSession>>>,
}

impl LinkSessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a session for a workspace. Stale entries are swept here rather
    /// than by a timer task.
    pub async fn open(
        &self,
        workspace_id: &str,
        url: String,
        baseline: Vec<String>,
        ttl_secs: i64,
    ) -> LinkSession {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);

        let session = LinkSession {
            id: generate_uuid(),
            workspace_id: workspace_id.to_string(),
            url,
            status: LinkSessionStatus::Pending,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
            baseline,
        };
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Fetch a session, flipping it to expired first when past its deadline.
    pub async fn get(&self, session_id: &str) -> Option<LinkSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id)?;
        if session.status == LinkSessionStatus::Pending && session.expires_at < Utc::now() {
            session.status = LinkSessionStatus::Expired;
        }
        Some(session.clone())
    }

    pub async fn complete(&self, session_id: &str) -> Option<LinkSession> {
        self.resolve(session_id, LinkSessionStatus::Completed).await
    }

    pub async fn cancel(&self, session_id: &str) -> Option<LinkSession> {
        self.resolve(session_id, LinkSessionStatus::Cancelled).await
    }

    /// Only pending sessions resolve; a second completion or a cancel after
    /// expiry returns the session untouched.
    async fn resolve(&self, session_id: &str, to: LinkSessionStatus) -> Option<LinkSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id)?;
        if session.status == LinkSessionStatus::Pending {
            if session.expires_at < Utc::now() {
                session.status = LinkSessionStatus::Expired;
            } else {
                session.status = to;
            }
        }
        Some(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_then_get() {
        let manager = LinkSessionManager::new();
        let session = manager
            .open("ws-1", "https://link.example".to_string(), vec![], 300)
            .await;
        assert_eq!(session.status, LinkSessionStatus::Pending);

        let fetched = manager.get(&session.id).await.unwrap();
        assert_eq!(fetched.workspace_id, "ws-1");
        assert_eq!(fetched.status, LinkSessionStatus::Pending);
    }

    #[tokio::test]
    async fn test_complete_and_cancel_resolve_once() {
        let manager = LinkSessionManager::new();
        let session = manager
            .open("ws-1", "https://link.example".to_string(), vec![], 300)
            .await;

        let done = manager.complete(&session.id).await.unwrap();
        assert_eq!(done.status, LinkSessionStatus::Completed);

        // cancel after completion is a no-op
        let still_done = manager.cancel(&session.id).await.unwrap();
        assert_eq!(still_done.status, LinkSessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_expired_session_reads_as_expired() {
        let manager = LinkSessionManager::new();
        let session = manager
            .open("ws-1", "https://link.example".to_string(), vec![], -1)
            .await;

        let fetched = manager.get(&session.id).await.unwrap();
        assert_eq!(fetched.status, LinkSessionStatus::Expired);

        let resolved = manager.complete(&session.id).await.unwrap();
        assert_eq!(resolved.status, LinkSessionStatus::Expired);
    }

    #[tokio::test]
    async fn test_unknown_session_is_none() {
        let manager = LinkSessionManager::new();
        assert!(manager.get("nope").await.is_none());
        assert!(manager.cancel("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_baseline_survives_round_trip() {
        let manager = LinkSessionManager::new();
        let session = manager
            .open(
                "ws-1",
                "https://link.example".to_string(),
                vec!["twitter:123".to_string()],
                300,
            )
            .await;
        let fetched = manager.get(&session.id).await.unwrap();
        assert_eq!(fetched.baseline, vec!["twitter:123".to_string()]);
    }
}
