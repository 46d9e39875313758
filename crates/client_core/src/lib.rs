//! Client-side view of an activity registry.
//!
//! The registry owns activities and rosters. This crate keeps the last
//! fetched snapshot, renders it, and runs signups and withdrawals against the
//! registry, refreshing the whole snapshot after every accepted mutation.

pub mod catalog;
pub mod controller;
pub mod error;
pub mod initials;
pub mod notification;
pub mod registry;
pub mod render;
pub mod store;

pub use catalog::{Catalog, RefreshHandle, SignupForm};
pub use controller::{Dispatcher, MutationKind, Outcome, SignupController, WithdrawalController};
pub use error::{ClientError, RegistryConfigError, RegistryError};
pub use initials::abbreviate;
pub use notification::{NotificationBanner, SIGNUP_NOTICE, WITHDRAWAL_NOTICE};
pub use registry::{ActivityRegistry, HttpRegistry};
pub use render::{render, ActivityCard, CatalogStatus, ParticipantRow, ParticipantsView, ViewModel};
pub use store::ActivityStore;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
