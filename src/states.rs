use crate::{
    catalog::Catalog,
    config::{Config, StorageBackend},
    errors::ApiError,
    gateway::StateGateway,
    models::now_millis,
    storage::{FileStorage, MemoryStorage, Storage},
};
use std::{
    io,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::info;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// `Arc` = Atomic Reference Counter
/// - Every handler gets a cheap clone pointing at the same state
///
/// `Mutex` around the gateway
/// - Mutations run one at a time, each to completion, in lock order
/// - Storage writes happen while the lock is held, so a store is never
///   written by two requests at once
/// - Never held across an `.await`
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Mutex<StateGateway>>,
    pub catalog: Arc<Catalog>,
    pub storage_backend: &'static str,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, catalog: Catalog) -> Self {
        Self {
            storage_backend: storage.backend(),
            gateway: Arc::new(Mutex::new(StateGateway::open(storage))),
            catalog: Arc::new(catalog),
        }
    }

    pub fn from_config(config: &Config) -> io::Result<Self> {
        let storage: Arc<dyn Storage> = match config.storage {
            StorageBackend::File => {
                info!("Using file storage in {}", config.data_dir.display());
                Arc::new(FileStorage::open(&config.data_dir)?)
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage, state will not survive restarts");
                Arc::new(MemoryStorage::new())
            }
        };

        let catalog = Catalog::generate(config.profiles, config.posts_per_profile, now_millis());
        Ok(Self::new(storage, catalog))
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, StateGateway>, ApiError> {
        self.gateway
            .lock()
            .map_err(|_| ApiError::InternalError("State lock poisoned".into()))
    }
}
