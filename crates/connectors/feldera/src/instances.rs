//! Data source instances, built on first use and rebuilt when their settings change.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::backend::{DataSourceInstanceSettings, InstanceDisposer};
use super::datasource::{new_datasource, Datasource};
use super::state::{InitializationError, State};

#[derive(Debug)]
struct CachedInstance {
    settings: DataSourceInstanceSettings,
    datasource: Arc<Datasource>,
}

/// Identifies a data source across configuration changes.
type InstanceKey = (i64, String);

/// Keeps one [`Datasource`] per data source.
///
/// A cached instance only serves requests carrying exactly the settings it
/// was built from. Settings with a newer `updated` stamp replace it and the
/// old one is disposed of; queries still holding it finish undisturbed.
/// Settings that differ without being newer get an instance of their own
/// that is not cached.
#[derive(Debug)]
pub struct InstanceManager {
    state: State,
    instances: RwLock<HashMap<InstanceKey, CachedInstance>>,
}

impl InstanceManager {
    pub fn new(state: State) -> Self {
        Self {
            state,
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// The instance for these settings.
    pub async fn get(
        &self,
        settings: &DataSourceInstanceSettings,
    ) -> Result<Arc<Datasource>, InitializationError> {
        let key = (settings.id, settings.uid.clone());

        {
            let instances = self.instances.read().await;
            if let Some(cached) = instances.get(&key) {
                if cached.settings == *settings {
                    return Ok(cached.datasource.clone());
                }
            }
        }

        let mut instances = self.instances.write().await;

        // Another request may have rebuilt it while we waited for the lock.
        if let Some(cached) = instances.get(&key) {
            if cached.settings == *settings {
                return Ok(cached.datasource.clone());
            }
            if cached.settings.updated > settings.updated {
                return Ok(Arc::new(new_datasource(settings, &self.state)?));
            }
        }

        let datasource = Arc::new(new_datasource(settings, &self.state)?);
        let previous = instances.insert(
            key,
            CachedInstance {
                settings: settings.clone(),
                datasource: datasource.clone(),
            },
        );
        if let Some(previous) = previous {
            previous.datasource.dispose();
        }

        Ok(datasource)
    }

    /// Dispose of every instance. Used on shutdown.
    pub async fn dispose_all(&self) {
        let mut instances = self.instances.write().await;
        for (_, cached) in instances.drain() {
            cached.datasource.dispose();
        }
    }

    pub async fn len(&self) -> usize {
        self.instances.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.instances.read().await.is_empty()
    }
}
