use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use thiserror::Error;

use crate::protocol::{ActivityRecord, CatalogResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    /// Server order; duplicates are the registry's problem, not ours.
    pub participants: Vec<String>,
}

impl Activity {
    pub fn from_record(name: impl Into<String>, record: ActivityRecord) -> Self {
        Self {
            name: name.into(),
            description: record.description,
            schedule: record.schedule,
            max_participants: record.max_participants,
            participants: record.participants,
        }
    }

    /// Remaining capacity. Negative when the registry reports overbooking.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Entire known registry state at the last successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySnapshot {
    activities: IndexMap<String, Activity>,
    fetched_at: Option<DateTime<Utc>>,
}

impl ActivitySnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: CatalogResponse, fetched_at: DateTime<Utc>) -> Self {
        let activities = catalog
            .into_iter()
            .map(|(name, record)| (name.clone(), Activity::from_record(name, record)))
            .collect();
        Self {
            activities,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.activities.get(name)
    }

    /// Activities in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.activities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// `None` until the snapshot has come from a successful fetch.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationState {
    pub text: String,
    pub kind: NotificationKind,
    pub visible: bool,
}

impl NotificationState {
    pub fn hidden() -> Self {
        Self {
            text: String::new(),
            kind: NotificationKind::Success,
            visible: false,
        }
    }
}

/// User actions, each carrying the data it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Signup { activity: String, email: String },
    Withdraw { activity: String, email: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action} requires an activity name")]
    MissingActivity { action: &'static str },
    #[error("{action} requires a participant identifier")]
    MissingIdentifier { action: &'static str },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Signup { .. } => "signup",
            Action::Withdraw { .. } => "withdraw",
        }
    }

    pub fn validate(&self) -> Result<(), ActionError> {
        let (activity, email) = match self {
            Action::Signup { activity, email } | Action::Withdraw { activity, email } => {
                (activity, email)
            }
        };
        let action = self.name();
        if activity.trim().is_empty() {
            return Err(ActionError::MissingActivity { action });
        }
        if email.trim().is_empty() {
            return Err(ActionError::MissingIdentifier { action });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
