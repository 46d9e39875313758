use std::sync::Arc;

use shared::domain::Action;
use tracing::{debug, warn};

use super::{Outcome, SignupController, WithdrawalController};
use crate::{catalog::Catalog, error::ClientError};

/// Routes user actions to their controller.
pub struct Dispatcher {
    signup: SignupController,
    withdrawal: WithdrawalController,
}

impl Dispatcher {
    pub fn new(catalog: &Arc<Catalog>) -> Self {
        Self {
            signup: SignupController::new(Arc::clone(catalog)),
            withdrawal: WithdrawalController::new(Arc::clone(catalog)),
        }
    }

    /// Runs one action. Actions missing their activity or identifier are
    /// dropped before anything reaches the registry.
    pub async fn dispatch(&self, action: Action) -> Result<Outcome, ClientError> {
        if let Err(err) = action.validate() {
            warn!(action = action.name(), "dropping action: {err}");
            return Err(err.into());
        }
        debug!(action = action.name(), "dispatching action");

        let outcome = match action {
            Action::Signup { activity, email } => self.signup.submit(&activity, &email).await,
            Action::Withdraw { activity, email } => {
                self.withdrawal.submit(&activity, &email).await
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
