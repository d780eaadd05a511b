//! services/twin/src/state.rs
//!
//! Defines the application state: the chosen storage backend plus the auth
//! service and session store that share it.

use crate::adapters::{JsonFileStorage, SqliteStorage};
use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use diatwin_core::ports::{Clock, KeyValueStore, PortResult, SystemClock};
use diatwin_core::{AuthService, DashboardSummary, InMemoryStorage, SessionDataStore, User};
use std::sync::Arc;
use tracing::info;

/// Builds the storage adapter named in the configuration.
pub async fn connect_storage(config: &Config) -> Result<Arc<dyn KeyValueStore>, AppError> {
    let storage: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Sqlite => {
            info!("Connecting to database...");
            let db = SqliteStorage::connect(&config.database_url).await?;
            info!("Running database migrations...");
            db.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db)
        }
        StorageBackend::File => {
            info!("Opening storage file...");
            let file = JsonFileStorage::open(config.storage_path.clone()).await?;
            info!(path = %file.path().display(), "Storage file ready.");
            Arc::new(file)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; nothing will outlive this process.");
            Arc::new(InMemoryStorage::new())
        }
    };
    Ok(storage)
}

//=========================================================================================
// AppState
//=========================================================================================

/// The shared application state, created once at startup.
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<dyn KeyValueStore>,
    pub auth: AuthService,
    pub store: SessionDataStore,
}

impl AppState {
    pub async fn from_config(config: Arc<Config>) -> Result<Self, AppError> {
        let storage = connect_storage(&config).await?;
        Ok(Self::with_storage(config, storage, Arc::new(SystemClock)))
    }

    pub fn with_storage(
        config: Arc<Config>,
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let auth = AuthService::new(storage.clone(), config.latency);
        let store = SessionDataStore::new(storage.clone(), clock, config.latency);
        Self {
            config,
            storage,
            auth,
            store,
        }
    }

    //--- Session lifecycle ---------------------------------------------------------------

    /// Reopens the session left signed in by a previous run.
    pub async fn resume(&self) -> PortResult<Option<User>> {
        let user = self.auth.restore().await?;
        if let Some(user) = user.clone() {
            self.store.open(user).await?;
        }
        Ok(user)
    }

    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> PortResult<User> {
        let user = self.auth.sign_up(email, password, name).await?;
        self.store.open(user.clone()).await?;
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> PortResult<User> {
        let user = self.auth.sign_in(email, password).await?;
        self.store.open(user.clone()).await?;
        Ok(user)
    }

    pub async fn sign_out(&self) -> PortResult<()> {
        self.auth.sign_out().await?;
        self.store.close().await;
        Ok(())
    }

    /// The dashboard as of the store's today.
    pub async fn dashboard(&self) -> DashboardSummary {
        let assessment = self.store.risk_assessment().await;
        let entries = self.store.daily_entries().await;
        DashboardSummary::build(assessment.as_ref(), &entries, self.store.clock().today())
    }
}
