use std::sync::Arc;

use shared::domain::NotificationKind;
use tracing::{error, info, warn};

use super::{MutationKind, Outcome};
use crate::{catalog::Catalog, error::RegistryError, notification::SIGNUP_NOTICE};

const REJECTED_FALLBACK: &str = "An error occurred";
const UNREACHABLE_FALLBACK: &str = "Failed to sign up. Please try again.";

pub struct SignupController {
    catalog: Arc<Catalog>,
}

impl SignupController {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Signs `email` up for `activity`.
    ///
    /// Neither argument is checked here; the registry decides. On success the
    /// form is cleared and a full refresh is started in the background; the
    /// notification does not wait for it. On failure the form and the store
    /// are left alone.
    pub async fn submit(&self, activity: &str, email: &str) -> Outcome {
        match self.catalog.registry().signup(activity, email).await {
            Ok(response) => {
                info!("signup: accepted activity={activity}");
                let text = response
                    .message
                    .unwrap_or_else(|| format!("Signed up for {activity}"));
                self.catalog.clear_form().await;
                self.catalog
                    .banner()
                    .show(text.clone(), NotificationKind::Success, SIGNUP_NOTICE)
                    .await;
                let refresh = self.catalog.spawn_refresh();
                Outcome::accepted(MutationKind::Signup, text, refresh)
            }
            Err(err) => {
                let text = failure_text(&err);
                match &err {
                    RegistryError::Server { .. } => {
                        warn!("signup: rejected activity={activity}: {err}")
                    }
                    _ => error!("signup: failed activity={activity}: {err}"),
                }
                self.catalog
                    .banner()
                    .show(text.clone(), NotificationKind::Error, SIGNUP_NOTICE)
                    .await;
                Outcome::rejected(MutationKind::Signup, text, err)
            }
        }
    }

    /// Submits whatever the signup form currently holds.
    pub async fn submit_form(&self) -> Outcome {
        let form = self.catalog.form().await;
        self.submit(&form.activity, &form.email).await
    }
}

fn failure_text(err: &RegistryError) -> String {
    match err {
        RegistryError::Server { .. } => err.detail().unwrap_or(REJECTED_FALLBACK).to_string(),
        RegistryError::Network(_) | RegistryError::Decode(_) => UNREACHABLE_FALLBACK.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/signup_tests.rs"]
mod tests;
