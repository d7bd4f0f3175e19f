//! Session registry - active playback sessions keyed by id
//!
//! One entry per connected viewer. Disconnecting stops the session, which
//! releases its tick driver.

use dashmap::DashMap;
use std::sync::Arc;
use wardops_core::SessionId;

use crate::{
    config::{ConfigError, SessionConfig},
    markers::MarkerTrack,
    session::PlaybackSession,
};

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<PlaybackSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new session
    pub fn connect(
        &self,
        config: SessionConfig,
        markers: MarkerTrack,
    ) -> Result<Arc<PlaybackSession>, ConfigError> {
        let session = Arc::new(PlaybackSession::new(config, markers)?);
        self.sessions.insert(session.id(), session.clone());
        log::info!(
            "Session {} connected ({} active)",
            session.id(),
            self.sessions.len()
        );
        Ok(session)
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<PlaybackSession>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Remove and stop a session; returns false if it was not registered
    pub async fn disconnect(&self, id: &SessionId) -> bool {
        let Some((_, session)) = self.sessions.remove(id) else {
            return false;
        };

        // Already-stopped sessions reject the command; nothing left to release
        if session.stop().await.is_err() {
            log::debug!("Session {} was already stopped", id);
        }
        log::info!("Session {} disconnected ({} active)", id, self.sessions.len());
        true
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_and_get() {
        let registry = SessionRegistry::new();
        let session = registry
            .connect(SessionConfig::default(), MarkerTrack::default())
            .unwrap();

        assert_eq!(registry.len(), 1);
        let found = registry.get(&session.id()).unwrap();
        assert_eq!(found.id(), session.id());
        assert_eq!(registry.ids(), vec![session.id()]);
    }

    #[tokio::test]
    async fn test_disconnect_stops_session() {
        let registry = SessionRegistry::new();
        let session = registry
            .connect(SessionConfig::default(), MarkerTrack::default())
            .unwrap();
        session.play().await.unwrap();

        assert!(registry.disconnect(&session.id()).await);
        assert!(registry.is_empty());
        assert!(session.is_closed().await);
        assert!(!session.is_ticking().await);

        assert!(!registry.disconnect(&session.id()).await);
    }

    #[tokio::test]
    async fn test_disconnect_already_stopped() {
        let registry = SessionRegistry::new();
        let session = registry
            .connect(SessionConfig::default(), MarkerTrack::default())
            .unwrap();
        session.stop().await.unwrap();

        assert!(registry.disconnect(&session.id()).await);
        assert!(registry.get(&session.id()).is_none());
    }

    #[test]
    fn test_connect_rejects_invalid_config() {
        let registry = SessionRegistry::new();
        let config = SessionConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(registry.connect(config, MarkerTrack::default()).is_err());
        assert!(registry.is_empty());
    }
}
