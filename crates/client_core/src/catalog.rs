use std::sync::Arc;

use shared::domain::ActivitySnapshot;
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};
use tracing::{info, warn};

use crate::{
    error::{ClientError, RegistryError},
    notification::NotificationBanner,
    registry::ActivityRegistry,
    render::{render, ViewModel},
    store::ActivityStore,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub activity: String,
    pub email: String,
}

/// Dropping the handle leaves the refresh running.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<Result<(), RegistryError>>,
}

impl RefreshHandle {
    pub async fn wait(self) -> Result<(), ClientError> {
        Ok(self.task.await??)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

pub struct Catalog {
    registry: Arc<dyn ActivityRegistry>,
    store: ActivityStore,
    view: RwLock<ViewModel>,
    banner: NotificationBanner,
    form: Mutex<SignupForm>,
}

impl Catalog {
    pub fn new(registry: Arc<dyn ActivityRegistry>) -> Arc<Self> {
        Arc::new(Self {
            store: ActivityStore::new(Arc::clone(&registry)),
            registry,
            view: RwLock::new(ViewModel::loading()),
            banner: NotificationBanner::new(),
            form: Mutex::new(SignupForm::default()),
        })
    }

    pub(crate) fn registry(&self) -> &dyn ActivityRegistry {
        self.registry.as_ref()
    }

    pub fn banner(&self) -> &NotificationBanner {
        &self.banner
    }

    pub async fn snapshot(&self) -> Arc<ActivitySnapshot> {
        self.store.current().await
    }

    pub async fn view(&self) -> ViewModel {
        self.view.read().await.clone()
    }

    // Rendered from the store's current snapshot so overlapping refreshes
    // settle on the last completed fetch.
    pub async fn refresh(&self) -> Result<(), RegistryError> {
        match self.store.load().await {
            Ok(_) => {
                let mut view = self.view.write().await;
                *view = render(&*self.store.current().await);
                info!("catalog: view rendered cards={}", view.cards.len());
                Ok(())
            }
            Err(err) => {
                if !self.store.has_loaded().await {
                    *self.view.write().await = ViewModel::unavailable();
                }
                Err(err)
            }
        }
    }

    pub fn spawn_refresh(self: &Arc<Self>) -> RefreshHandle {
        let catalog = Arc::clone(self);
        RefreshHandle {
            task: tokio::spawn(async move { catalog.refresh().await }),
        }
    }

    pub(crate) async fn remove_rendered_participant(&self, activity: &str, identifier: &str) {
        let removed = self
            .view
            .write()
            .await
            .remove_participant(activity, identifier);
        if !removed {
            warn!("catalog: no rendered row for {identifier} in {activity}");
        }
    }

    pub async fn form(&self) -> SignupForm {
        self.form.lock().await.clone()
    }

    pub async fn set_form(&self, activity: impl Into<String>, email: impl Into<String>) {
        *self.form.lock().await = SignupForm {
            activity: activity.into(),
            email: email.into(),
        };
    }

    pub(crate) async fn clear_form(&self) {
        *self.form.lock().await = SignupForm::default();
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
