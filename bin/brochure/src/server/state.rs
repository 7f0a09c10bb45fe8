//! Shared application state.

use std::sync::Arc;

use brochure_auth::{AdminCredentials, AdminGate, AuthSettings, SessionCodec, SessionError};
use brochure_core::Config;

use super::{
    error::ApiError,
    signaling::SignalingRooms,
    store::{BlobStore, FsBlobStore},
};

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session gate for protected routes. Also issues tokens at login.
    pub gate: Arc<AdminGate>,

    /// The admin account checked at login.
    pub admin: Arc<AdminCredentials>,

    /// Session cookie `Max-Age`.
    pub session_ttl_secs: u64,

    /// Markdown pages.
    pub pages: Arc<dyn BlobStore>,

    /// Form leads.
    pub leads: Arc<dyn BlobStore>,

    /// WebRTC signaling rooms.
    pub rooms: Arc<SignalingRooms>,
}

impl AppState {
    /// Create state from auth settings and explicit stores.
    pub fn new(
        settings: AuthSettings,
        pages: Arc<dyn BlobStore>,
        leads: Arc<dyn BlobStore>,
    ) -> Result<Self, SessionError> {
        let codec = SessionCodec::new(&settings.secret, settings.session_ttl_millis)?;
        let session_ttl_secs = u64::try_from(settings.session_ttl_millis / 1000).unwrap_or(0);

        Ok(Self {
            gate: Arc::new(AdminGate::new(codec)),
            admin: Arc::new(settings.admin),
            session_ttl_secs,
            pages,
            leads,
            rooms: Arc::new(SignalingRooms::default()),
        })
    }

    /// Create state with file-backed stores under the configured data
    /// directory.
    pub fn from_config(config: &Config, settings: AuthSettings) -> Result<Self, SessionError> {
        let data_dir = &config.server.data_dir;
        tracing::info!(data_dir = %data_dir.display(), "opening blob stores");

        Self::new(
            settings,
            Arc::new(FsBlobStore::new(data_dir.join("pages"))),
            Arc::new(FsBlobStore::new(data_dir.join("leads"))),
        )
    }
}

/// Run blocking store work on the blocking thread pool.
pub async fn with_store<T, F>(store: &Arc<dyn BlobStore>, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn BlobStore) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || work(store.as_ref())).await?
}
