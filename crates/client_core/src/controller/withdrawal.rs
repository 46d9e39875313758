use std::sync::Arc;

use shared::domain::NotificationKind;
use tracing::{error, info, warn};

use super::{MutationKind, Outcome};
use crate::{catalog::Catalog, error::RegistryError, notification::WITHDRAWAL_NOTICE};

const REJECTED_FALLBACK: &str = "Failed to unregister";
const UNREACHABLE_FALLBACK: &str = "Failed to unregister. Please try again.";

pub struct WithdrawalController {
    catalog: Arc<Catalog>,
}

impl WithdrawalController {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Removes `email` from `activity`.
    ///
    /// On success the row disappears from the rendered view right away, then
    /// a background refresh replaces the view with whatever the registry
    /// reports, including the row itself if the registry still lists it.
    pub async fn submit(&self, activity: &str, email: &str) -> Outcome {
        match self.catalog.registry().unregister(activity, email).await {
            Ok(response) => {
                info!("withdraw: accepted activity={activity}");
                self.catalog
                    .remove_rendered_participant(activity, email)
                    .await;
                let text = response
                    .message
                    .unwrap_or_else(|| format!("Unregistered from {activity}"));
                self.catalog
                    .banner()
                    .show(text.clone(), NotificationKind::Success, WITHDRAWAL_NOTICE)
                    .await;
                let refresh = self.catalog.spawn_refresh();
                Outcome::accepted(MutationKind::Withdraw, text, refresh)
            }
            Err(err) => {
                let text = match &err {
                    RegistryError::Server { .. } => {
                        warn!("withdraw: rejected activity={activity}: {err}");
                        err.detail().unwrap_or(REJECTED_FALLBACK).to_string()
                    }
                    RegistryError::Network(_) | RegistryError::Decode(_) => {
                        error!("withdraw: failed activity={activity}: {err}");
                        UNREACHABLE_FALLBACK.to_string()
                    }
                };
                self.catalog
                    .banner()
                    .show(text.clone(), NotificationKind::Error, WITHDRAWAL_NOTICE)
                    .await;
                Outcome::rejected(MutationKind::Withdraw, text, err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/withdrawal_tests.rs"]
mod tests;
