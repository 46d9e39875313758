use std::sync::Arc;

use chrono::Utc;
use shared::domain::ActivitySnapshot;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::{error::RegistryError, registry::ActivityRegistry};

/// Last-fetched registry state.
///
/// The snapshot is only ever swapped as a whole. Concurrent loads are not
/// fenced: whichever completes last is what readers see.
pub struct ActivityStore {
    registry: Arc<dyn ActivityRegistry>,
    current: RwLock<Arc<ActivitySnapshot>>,
}

impl ActivityStore {
    pub fn new(registry: Arc<dyn ActivityRegistry>) -> Self {
        Self {
            registry,
            current: RwLock::new(Arc::new(ActivitySnapshot::empty())),
        }
    }

    /// Fetches the full catalog and replaces the snapshot with it.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn load(&self) -> Result<Arc<ActivitySnapshot>, RegistryError> {
        let catalog = match self.registry.list_activities().await {
            Ok(catalog) => catalog,
            Err(err) => {
                error!("catalog: load failed: {err}");
                return Err(err);
            }
        };

        let snapshot = Arc::new(ActivitySnapshot::from_catalog(catalog, Utc::now()));
        *self.current.write().await = Arc::clone(&snapshot);
        info!("catalog: snapshot replaced activities={}", snapshot.len());
        Ok(snapshot)
    }

    pub async fn current(&self) -> Arc<ActivitySnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Whether any load has ever succeeded.
    pub async fn has_loaded(&self) -> bool {
        self.current.read().await.fetched_at().is_some()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
