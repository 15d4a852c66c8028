//! HTTP server configuration assembled from [`Settings`].

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use color_eyre::eyre::{Context, Result, eyre};
use tracing::{info, warn};

use matchmaking::domain::matching::MatchQueryService;
use matchmaking::domain::ports::MatchQuery;
use matchmaking::outbound::memory::InMemoryMatchStore;
use matchmaking::outbound::persistence::{
    DbPool, DieselAvailabilityRepository, DieselMatchCacheRepository,
    DieselPreferenceVectorRepository, PoolConfig,
};
use matchmaking::settings::Settings;

/// Everything `create_server` needs.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) matches: Arc<dyn MatchQuery>,
}

impl ServerConfig {
    /// Construct a configuration from explicit parts.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        bind_addr: SocketAddr,
        matches: Arc<dyn MatchQuery>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site: SameSite::Lax,
            bind_addr,
            matches,
        }
    }

    /// Load the session key and connect the storage adapters.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let key = load_session_key(settings)?;
        let bind_addr = settings.bind_addr()?;
        let matches = build_match_query(settings).await?;
        Ok(Self::new(key, settings.session_cookie_secure(), bind_addr, matches))
    }
}

fn load_session_key(settings: &Settings) -> Result<Key> {
    let path = settings.session_key_file();
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) if cfg!(debug_assertions) || settings.session_allow_ephemeral() => {
            warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(e) => Err(eyre!("failed to read session key at {}: {e}", path.display())),
    }
}

async fn build_match_query(settings: &Settings) -> Result<Arc<dyn MatchQuery>> {
    let capacity = settings.cache_capacity()?;
    match settings.database_url() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()?))
                .await
                .wrap_err("failed to build database pool")?;
            info!(capacity, "serving matches from PostgreSQL");
            Ok(Arc::new(MatchQueryService::from_ports(
                Arc::new(DieselAvailabilityRepository::new(pool.clone())),
                Arc::new(DieselPreferenceVectorRepository::new(pool.clone())),
                Arc::new(DieselMatchCacheRepository::new(pool)),
                capacity,
            )))
        }
        None => {
            warn!(capacity, "no database configured; serving matches from memory");
            let store = Arc::new(InMemoryMatchStore::new());
            Ok(Arc::new(MatchQueryService::from_ports(
                store.clone(),
                store.clone(),
                store,
                capacity,
            )))
        }
    }
}
