//! Pure mapping from a snapshot to what the user sees.

use std::fmt;

use shared::domain::{Action, Activity, ActivitySnapshot};

use crate::initials::abbreviate;

pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
pub const NO_PARTICIPANTS: &str = "No participants yet.";
pub const LOADING_TEXT: &str = "Loading activities...";
pub const UNAVAILABLE_TEXT: &str = "Failed to load activities. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    Loading,
    Ready,
    /// The first fetch failed; there is nothing to fall back to.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub identifier: String,
    pub badge: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantsView {
    Empty,
    Rows(Vec<ParticipantRow>),
}

impl ParticipantsView {
    pub fn rows(&self) -> &[ParticipantRow] {
        match self {
            Self::Empty => &[],
            Self::Rows(rows) => rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: ParticipantsView,
}

impl ActivityCard {
    fn from_activity(activity: &Activity) -> Self {
        let participants = if activity.participants.is_empty() {
            ParticipantsView::Empty
        } else {
            ParticipantsView::Rows(
                activity
                    .participants
                    .iter()
                    .map(|identifier| ParticipantRow {
                        identifier: identifier.clone(),
                        badge: abbreviate(identifier),
                    })
                    .collect(),
            )
        };

        Self {
            name: activity.name.clone(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            spots_left: activity.spots_left(),
            participants,
        }
    }

    pub fn availability(&self) -> String {
        format!("{} spots left", self.spots_left)
    }

    /// The action bound to a participant row's remove control.
    pub fn withdraw_action(&self, row: &ParticipantRow) -> Action {
        Action::Withdraw {
            activity: self.name.clone(),
            email: row.identifier.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: SELECT_PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub status: CatalogStatus,
    pub cards: Vec<ActivityCard>,
    pub options: Vec<SelectOption>,
}

impl ViewModel {
    pub fn loading() -> Self {
        Self::placeholder(CatalogStatus::Loading)
    }

    pub fn unavailable() -> Self {
        Self::placeholder(CatalogStatus::Unavailable)
    }

    fn placeholder(status: CatalogStatus) -> Self {
        Self {
            status,
            cards: Vec::new(),
            options: vec![SelectOption::placeholder()],
        }
    }

    pub fn card(&self, name: &str) -> Option<&ActivityCard> {
        self.cards.iter().find(|card| card.name == name)
    }

    pub fn participants_of(&self, name: &str) -> Vec<&str> {
        self.card(name)
            .map(|card| {
                card.participants
                    .rows()
                    .iter()
                    .map(|row| row.identifier.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Capacity and the select list are left for the next render to fix.
    pub fn remove_participant(&mut self, activity: &str, identifier: &str) -> bool {
        let Some(card) = self.cards.iter_mut().find(|card| card.name == activity) else {
            return false;
        };
        let ParticipantsView::Rows(rows) = &mut card.participants else {
            return false;
        };
        match rows.iter().position(|row| row.identifier == identifier) {
            Some(position) => {
                rows.remove(position);
                true
            }
            None => false,
        }
    }
}

pub fn render(snapshot: &ActivitySnapshot) -> ViewModel {
    if snapshot.fetched_at().is_none() {
        return ViewModel::loading();
    }

    let cards = snapshot.iter().map(ActivityCard::from_activity).collect();
    let options = std::iter::once(SelectOption::placeholder())
        .chain(snapshot.names().map(|name| SelectOption {
            value: name.to_string(),
            label: name.to_string(),
        }))
        .collect();

    ViewModel {
        status: CatalogStatus::Ready,
        cards,
        options,
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            CatalogStatus::Loading => return writeln!(f, "{LOADING_TEXT}"),
            CatalogStatus::Unavailable => return writeln!(f, "{UNAVAILABLE_TEXT}"),
            CatalogStatus::Ready => {}
        }

        for card in &self.cards {
            writeln!(f, "{}", card.name)?;
            writeln!(f, "  {}", card.description)?;
            writeln!(
                f,
                "  Schedule: {} \u{2022} {}",
                card.schedule,
                card.availability()
            )?;
            writeln!(f, "  Participants")?;
            match &card.participants {
                ParticipantsView::Empty => writeln!(f, "    {NO_PARTICIPANTS}")?,
                ParticipantsView::Rows(rows) => {
                    for row in rows {
                        writeln!(f, "    [{:>2}] {}", row.badge, row.identifier)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
