//! In-memory registry used by the store, catalog and controller tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use shared::protocol::{ActivityRecord, CatalogResponse, MessageResponse};
use tokio::sync::{oneshot, Mutex};

use crate::{error::RegistryError, registry::ActivityRegistry};

pub(crate) fn record(max_participants: u32, participants: &[&str]) -> ActivityRecord {
    ActivityRecord {
        description: "d".to_string(),
        schedule: "Mon".to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

pub(crate) fn catalog_of(entries: Vec<(&str, ActivityRecord)>) -> CatalogResponse {
    entries
        .into_iter()
        .map(|(name, record)| (name.to_string(), record))
        .collect()
}

struct ScriptedFetch {
    gate: Option<oneshot::Receiver<()>>,
    /// `None` answers with the live server state once the gate opens.
    response: Option<Result<CatalogResponse, RegistryError>>,
}

#[derive(Default)]
pub(crate) struct FakeRegistry {
    server: Mutex<CatalogResponse>,
    scripted_fetches: Mutex<VecDeque<ScriptedFetch>>,
    mutation_failures: Mutex<VecDeque<RegistryError>>,
    silent_mutations: bool,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
}

impl FakeRegistry {
    pub(crate) fn with_catalog(catalog: CatalogResponse) -> Arc<Self> {
        Arc::new(Self {
            server: Mutex::new(catalog),
            ..Self::default()
        })
    }

    /// Mutations succeed without a `message` field.
    pub(crate) fn silent(catalog: CatalogResponse) -> Arc<Self> {
        Arc::new(Self {
            server: Mutex::new(catalog),
            silent_mutations: true,
            ..Self::default()
        })
    }

    pub(crate) async fn script_fetch(&self, response: Result<CatalogResponse, RegistryError>) {
        self.scripted_fetches.lock().await.push_back(ScriptedFetch {
            gate: None,
            response: Some(response),
        });
    }

    /// Next fetch answers `response`, but only after the returned sender fires.
    pub(crate) async fn script_gated_fetch(
        &self,
        response: Result<CatalogResponse, RegistryError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.scripted_fetches.lock().await.push_back(ScriptedFetch {
            gate: Some(rx),
            response: Some(response),
        });
        tx
    }

    /// Next fetch answers the live server state, after the returned sender fires.
    pub(crate) async fn gate_next_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.scripted_fetches.lock().await.push_back(ScriptedFetch {
            gate: Some(rx),
            response: None,
        });
        tx
    }

    pub(crate) async fn fail_next_mutation(&self, err: RegistryError) {
        self.mutation_failures.lock().await.push_back(err);
    }

    pub(crate) async fn server_catalog(&self) -> CatalogResponse {
        self.server.lock().await.clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn wait_for_list_calls(&self, expected: usize) {
        while self.list_calls() < expected {
            tokio::task::yield_now().await;
        }
    }

    fn reply(&self, text: String) -> MessageResponse {
        MessageResponse {
            message: (!self.silent_mutations).then_some(text),
        }
    }
}

fn not_found(detail: &str) -> RegistryError {
    RegistryError::Server {
        status: 404,
        detail: Some(detail.to_string()),
    }
}

#[async_trait]
impl ActivityRegistry for FakeRegistry {
    async fn list_activities(&self) -> Result<CatalogResponse, RegistryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.scripted_fetches.lock().await.pop_front();
        let Some(ScriptedFetch { gate, response }) = scripted else {
            return Ok(self.server_catalog().await);
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match response {
            Some(response) => response,
            None => Ok(self.server_catalog().await),
        }
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<MessageResponse, RegistryError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.mutation_failures.lock().await.pop_front() {
            return Err(err);
        }
        let mut server = self.server.lock().await;
        let Some(entry) = server.get_mut(activity) else {
            return Err(not_found("Activity not found"));
        };
        if entry.participants.iter().any(|p| p == email) {
            return Err(RegistryError::Server {
                status: 400,
                detail: Some("Student is already signed up".to_string()),
            });
        }
        entry.participants.push(email.to_string());
        Ok(self.reply(format!("Signed up {email} for {activity}")))
    }

    async fn unregister(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MessageResponse, RegistryError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.mutation_failures.lock().await.pop_front() {
            return Err(err);
        }
        let mut server = self.server.lock().await;
        let Some(entry) = server.get_mut(activity) else {
            return Err(not_found("Activity not found"));
        };
        let Some(position) = entry.participants.iter().position(|p| p == email) else {
            return Err(not_found("Student is not signed up for this activity"));
        };
        entry.participants.remove(position);
        Ok(self.reply(format!("Unregistered {email} from {activity}")))
    }
}
