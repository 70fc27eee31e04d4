use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Actor;

struct Session {
    actor: Actor,
    issued_at: Instant,
}

/// Opaque login tokens mapped to the identity they were issued for.
/// Sessions live in memory, expire after `ttl` and end with the process.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    /// Issues a fresh token. Expired sessions are dropped on the way.
    pub async fn issue(&self, actor: Actor) -> Uuid {
        let token = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.issued_at) < self.ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Expired sessions purged");
        }
        sessions.insert(
            token,
            Session {
                actor,
                issued_at: now,
            },
        );
        token
    }

    /// Expired tokens resolve to `None`, same as unknown ones.
    pub async fn resolve(&self, token: &Uuid) -> Option<Actor> {
        self.sessions
            .read()
            .await
            .get(token)
            .filter(|session| session.issued_at.elapsed() < self.ttl)
            .map(|session| session.actor.clone())
    }

    /// Returns whether the token was live.
    pub async fn revoke(&self, token: &Uuid) -> bool {
        self.sessions
            .write()
            .await
            .remove(token)
            .is_some_and(|session| session.issued_at.elapsed() < self.ttl)
    }

    #[cfg(test)]
    async fn stored(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    const HOUR: Duration = Duration::from_secs(3600);

    fn actor() -> Actor {
        Actor {
            user_id: 1,
            email: "v@x.org".into(),
            role: Role::Volunteer,
        }
    }

    #[tokio::test]
    async fn issued_tokens_resolve_until_revoked() {
        let sessions = SessionRegistry::new(HOUR);
        let token = sessions.issue(actor()).await;

        assert_eq!(sessions.resolve(&token).await, Some(actor()));
        assert!(sessions.revoke(&token).await);
        assert_eq!(sessions.resolve(&token).await, None);
        assert!(!sessions.revoke(&token).await);
    }

    #[tokio::test]
    async fn each_login_gets_its_own_token() {
        let sessions = SessionRegistry::new(HOUR);
        let a = sessions.issue(actor()).await;
        let b = sessions.issue(actor()).await;
        assert_ne!(a, b);

        sessions.revoke(&a).await;
        assert!(sessions.resolve(&b).await.is_some());
    }

    #[tokio::test]
    async fn expired_tokens_stop_resolving() {
        let sessions = SessionRegistry::new(Duration::from_millis(20));
        let token = sessions.issue(actor()).await;
        assert!(sessions.resolve(&token).await.is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(sessions.resolve(&token).await, None);
        assert!(!sessions.revoke(&token).await);
    }

    #[tokio::test]
    async fn issuing_purges_expired_sessions() {
        let sessions = SessionRegistry::new(Duration::from_millis(20));
        for _ in 0..100 {
            sessions.issue(actor()).await;
        }
        assert_eq!(sessions.stored().await, 100);

        tokio::time::sleep(Duration::from_millis(60)).await;
        let fresh = sessions.issue(actor()).await;

        assert_eq!(sessions.stored().await, 1);
        assert!(sessions.resolve(&fresh).await.is_some());
    }
}
