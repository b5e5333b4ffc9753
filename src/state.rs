use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use shule_config::{BackendConfig, CorsConfig, ServerConfig};
use shule_models::SessionId;
use shule_structure::{ConfigurationStore, StructurePersistence};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::backend::init_backend;

/// One editing session. Commits hold only this session's lock while the
/// backend call is in flight.
#[derive(Debug)]
pub struct Session {
    store: Mutex<ConfigurationStore>,
    last_seen: std::sync::Mutex<Instant>,
}

impl Session {
    pub fn new(store: ConfigurationStore) -> Self {
        Self {
            store: Mutex::new(store),
            last_seen: std::sync::Mutex::new(Instant::now()),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, ConfigurationStore> {
        self.store.lock().await
    }

    /// Marks the session as used now.
    pub fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_seen.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

pub type SessionHandle = Arc<Session>;

pub type Sessions = Arc<RwLock<HashMap<SessionId, SessionHandle>>>;

/// Drops sessions untouched for at least `ttl`. A session whose store is
/// locked (a commit in flight) is kept.
pub async fn evict_idle_sessions(sessions: &Sessions, ttl: Duration) -> usize {
    let now = Instant::now();
    let mut sessions = sessions.write().await;
    let before = sessions.len();
    sessions.retain(|id, session| {
        let keep = session.idle_for(now) < ttl || session.store.try_lock().is_err();
        if !keep {
            debug!(session.id = %id, "Evicting idle session");
        }
        keep
    });
    before - sessions.len()
}

/// Periodically evicts idle sessions for the life of the process.
pub fn spawn_session_sweeper(sessions: Sessions, ttl: Duration) -> JoinHandle<()> {
    let period = ttl.min(Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = evict_idle_sessions(&sessions, ttl).await;
            if evicted > 0 {
                info!(evicted, "Idle sessions evicted");
            }
        }
    })
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Sessions,
    pub backend: Arc<dyn StructurePersistence>,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn StructurePersistence>,
        cors_config: CorsConfig,
        server_config: ServerConfig,
    ) -> Self {
        Self {
            sessions: Arc::default(),
            backend,
            cors_config,
            server_config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("server_config", &self.server_config)
            .finish_non_exhaustive()
    }
}

pub fn init_app_state() -> anyhow::Result<AppState> {
    let backend_config = BackendConfig::from_env();
    Ok(AppState::new(
        init_backend(&backend_config)?,
        CorsConfig::from_env(),
        ServerConfig::from_env(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert(sessions: &Sessions) -> (SessionId, SessionHandle) {
        let id = SessionId::new();
        let session = Arc::new(Session::new(ConfigurationStore::create()));
        sessions.write().await.insert(id, session.clone());
        (id, session)
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicts_only_idle_sessions() {
        let sessions = Sessions::default();
        let (idle, _) = insert(&sessions).await;
        let (active, active_session) = insert(&sessions).await;

        tokio::time::advance(Duration::from_secs(50 * 60)).await;
        active_session.touch();
        tokio::time::advance(Duration::from_secs(15 * 60)).await;

        let evicted = evict_idle_sessions(&sessions, Duration::from_secs(60 * 60)).await;

        assert_eq!(evicted, 1);
        let sessions = sessions.read().await;
        assert!(!sessions.contains_key(&idle));
        assert!(sessions.contains_key(&active));
    }

    #[tokio::test(start_paused = true)]
    async fn test_locked_session_survives_eviction() {
        let sessions = Sessions::default();
        let (id, session) = insert(&sessions).await;
        let _guard = session.lock().await;

        tokio::time::advance(Duration::from_secs(2 * 60 * 60)).await;

        assert_eq!(evict_idle_sessions(&sessions, Duration::from_secs(60)).await, 0);
        assert!(sessions.read().await.contains_key(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_in_background() {
        let sessions = Sessions::default();
        let (id, _) = insert(&sessions).await;
        let sweeper = spawn_session_sweeper(sessions.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(!sessions.read().await.contains_key(&id));
        sweeper.abort();
    }
}
