use std::{sync::Arc, time::Duration};

use shared::domain::{NotificationKind, NotificationState};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tracing::debug;

pub const SIGNUP_NOTICE: Duration = Duration::from_millis(5000);
pub const WITHDRAWAL_NOTICE: Duration = Duration::from_millis(4000);

#[derive(Default)]
struct HideTimer {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

struct BannerShared {
    state: watch::Sender<NotificationState>,
    timer: Mutex<HideTimer>,
}

/// Single transient message slot. A stale timer never hides a newer message.
#[derive(Clone)]
pub struct NotificationBanner {
    shared: Arc<BannerShared>,
}

impl Default for NotificationBanner {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBanner {
    pub fn new() -> Self {
        let (state, _) = watch::channel(NotificationState::hidden());
        Self {
            shared: Arc::new(BannerShared {
                state,
                timer: Mutex::new(HideTimer::default()),
            }),
        }
    }

    pub async fn show(&self, text: impl Into<String>, kind: NotificationKind, duration: Duration) {
        let mut timer = self.shared.timer.lock().await;
        timer.generation += 1;
        let generation = timer.generation;
        if let Some(previous) = timer.task.take() {
            previous.abort();
        }

        self.shared.state.send_replace(NotificationState {
            text: text.into(),
            kind,
            visible: true,
        });

        let shared = Arc::clone(&self.shared);
        timer.task = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut timer = shared.timer.lock().await;
            if timer.generation != generation {
                return;
            }
            timer.task = None;
            shared.state.send_modify(|state| state.visible = false);
            debug!("notification: hidden generation={generation}");
        }));
    }

    pub fn state(&self) -> NotificationState {
        self.shared.state.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.shared.state.borrow().visible
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.shared.state.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
