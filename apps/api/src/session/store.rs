use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::Session;

/// In-memory session registry. Nothing survives a restart.
///
/// Each session sits behind its own mutex so turns within a session run one
/// at a time while separate sessions proceed independently.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let session = Session::new();
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        debug!("Session {id} created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle longer than the TTL.
    ///
    /// A session whose handle is held outside the map belongs to a handler
    /// that is running or waiting for the lock, and is kept.
    pub async fn sweep_idle(&self, now: DateTime<Utc>) -> usize {
        let ttl = match chrono::Duration::from_std(self.idle_ttl) {
            Ok(ttl) => ttl,
            Err(_) => return 0,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            if Arc::strong_count(session) > 1 {
                return true;
            }
            match session.try_lock() {
                Ok(s) => now.signed_duration_since(s.last_active) <= ttl,
                Err(_) => true,
            }
        });
        before - sessions.len()
    }

    /// Background task that evicts idle sessions once a minute.
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(60));
            loop {
                ticker.tick().await;
                let evicted = store.sweep_idle(Utc::now()).await;
                if evicted > 0 {
                    debug!("Evicted {evicted} idle sessions");
                }
            }
        })
    }
}
