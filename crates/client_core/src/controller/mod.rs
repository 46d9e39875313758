//! User-initiated mutations and the table that routes actions to them.

pub mod dispatch;
mod signup;
mod withdrawal;

pub use dispatch::Dispatcher;
pub use signup::SignupController;
pub use withdrawal::WithdrawalController;

use shared::domain::NotificationKind;

use crate::{
    catalog::RefreshHandle,
    error::{ClientError, RegistryError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Signup,
    Withdraw,
}

/// Result of one signup or withdrawal, as shown to the user.
#[derive(Debug)]
pub struct Outcome {
    pub mutation: MutationKind,
    pub text: String,
    pub error: Option<RegistryError>,
    refresh: Option<RefreshHandle>,
}

impl Outcome {
    fn accepted(mutation: MutationKind, text: String, refresh: RefreshHandle) -> Self {
        Self {
            mutation,
            text,
            error: None,
            refresh: Some(refresh),
        }
    }

    fn rejected(mutation: MutationKind, text: String, error: RegistryError) -> Self {
        Self {
            mutation,
            text,
            error: Some(error),
            refresh: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    pub fn kind(&self) -> NotificationKind {
        if self.succeeded() {
            NotificationKind::Success
        } else {
            NotificationKind::Error
        }
    }

    /// The reconciling refresh started after a successful mutation.
    pub fn take_refresh(&mut self) -> Option<RefreshHandle> {
        self.refresh.take()
    }

    /// Waits for the reconciling refresh, if there is one.
    pub async fn settle(mut self) -> Result<(), ClientError> {
        match self.take_refresh() {
            Some(refresh) => refresh.wait().await,
            None => Ok(()),
        }
    }
}
