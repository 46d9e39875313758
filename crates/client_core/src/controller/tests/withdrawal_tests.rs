use super::*;
use shared::protocol::CatalogResponse;

use crate::test_support::{catalog_of, record, FakeRegistry};

fn chess_roster() -> CatalogResponse {
    catalog_of(vec![
        ("Chess Club", record(3, &["a@x.com", "b@x.com"])),
        ("Art", record(2, &["b@x.com"])),
    ])
}

async fn loaded_catalog(registry: Arc<FakeRegistry>) -> Arc<Catalog> {
    let catalog = Catalog::new(registry);
    catalog.refresh().await.expect("initial refresh");
    catalog
}

#[tokio::test]
async fn row_disappears_before_refresh_completes() {
    let registry = FakeRegistry::with_catalog(chess_roster());
    let catalog = loaded_catalog(registry.clone()).await;
    let release = registry.gate_next_fetch().await;
    let controller = WithdrawalController::new(Arc::clone(&catalog));

    let mut outcome = controller.submit("Chess Club", "a@x.com").await;

    assert!(outcome.succeeded());
    assert_eq!(outcome.mutation, MutationKind::Withdraw);
    let view = catalog.view().await;
    assert_eq!(view.participants_of("Chess Club"), ["b@x.com"]);
    // Only the row goes; capacity waits for the refresh.
    assert_eq!(view.card("Chess Club").expect("card").spots_left, 1);
    assert_eq!(view.participants_of("Art"), ["b@x.com"]);
    assert_eq!(
        catalog.snapshot().await.get("Chess Club").expect("chess").participants,
        ["a@x.com", "b@x.com"]
    );

    let state = catalog.banner().state();
    assert!(state.visible);
    assert_eq!(state.kind, NotificationKind::Success);
    assert_eq!(state.text, "Unregistered a@x.com from Chess Club");

    let refresh = outcome.take_refresh().expect("refresh started");
    assert!(!refresh.is_finished());
    release.send(()).expect("release");
    refresh.wait().await.expect("refresh");

    let view = catalog.view().await;
    assert_eq!(view.participants_of("Chess Club"), ["b@x.com"]);
    assert_eq!(view.card("Chess Club").expect("card").spots_left, 2);
}

#[tokio::test]
async fn refresh_restores_row_the_registry_still_lists() {
    let registry = FakeRegistry::with_catalog(chess_roster());
    let catalog = loaded_catalog(registry.clone()).await;
    let release = registry.script_gated_fetch(Ok(chess_roster())).await;
    let controller = WithdrawalController::new(Arc::clone(&catalog));

    let mut outcome = controller.submit("Chess Club", "a@x.com").await;
    assert_eq!(catalog.view().await.participants_of("Chess Club"), ["b@x.com"]);

    release.send(()).expect("release");
    outcome
        .take_refresh()
        .expect("refresh started")
        .wait()
        .await
        .expect("refresh");

    assert_eq!(
        catalog.view().await.participants_of("Chess Club"),
        ["a@x.com", "b@x.com"]
    );
}

#[tokio::test]
async fn stale_refresh_completing_last_brings_the_row_back() {
    let registry = FakeRegistry::with_catalog(chess_roster());
    let catalog = loaded_catalog(registry.clone()).await;
    let release_stale = registry.script_gated_fetch(Ok(chess_roster())).await;
    let stale = catalog.spawn_refresh();
    registry.wait_for_list_calls(2).await;

    let outcome = WithdrawalController::new(Arc::clone(&catalog))
        .submit("Chess Club", "a@x.com")
        .await;
    outcome.settle().await.expect("reconciling refresh");
    assert_eq!(catalog.view().await.participants_of("Chess Club"), ["b@x.com"]);

    release_stale.send(()).expect("release stale");
    stale.wait().await.expect("stale refresh");
    assert_eq!(
        catalog.view().await.participants_of("Chess Club"),
        ["a@x.com", "b@x.com"]
    );
}

#[tokio::test]
async fn rejected_withdrawal_leaves_view_untouched() {
    let registry = FakeRegistry::with_catalog(chess_roster());
    let catalog = loaded_catalog(registry.clone()).await;
    let before = catalog.view().await;

    let outcome = WithdrawalController::new(Arc::clone(&catalog))
        .submit("Chess Club", "nobody@x.com")
        .await;

    assert!(!outcome.succeeded());
    assert_eq!(outcome.text, "Student is not signed up for this activity");
    assert_eq!(catalog.banner().state().kind, NotificationKind::Error);
    assert_eq!(catalog.view().await, before);
    outcome.settle().await.expect("nothing to settle");
    assert_eq!(registry.list_calls(), 1);
}

#[tokio::test]
async fn failed_request_does_not_remove_row() {
    let registry = FakeRegistry::with_catalog(chess_roster());
    let catalog = loaded_catalog(registry.clone()).await;
    registry
        .fail_next_mutation(RegistryError::Network("timed out".to_string()))
        .await;

    let outcome = WithdrawalController::new(Arc::clone(&catalog))
        .submit("Chess Club", "a@x.com")
        .await;

    assert_eq!(outcome.text, UNREACHABLE_FALLBACK);
    assert_eq!(
        catalog.view().await.participants_of("Chess Club"),
        ["a@x.com", "b@x.com"]
    );
}

#[tokio::test]
async fn rejection_without_detail_uses_generic_text() {
    let registry = FakeRegistry::with_catalog(chess_roster());
    let catalog = loaded_catalog(registry.clone()).await;
    registry
        .fail_next_mutation(RegistryError::Server {
            status: 503,
            detail: None,
        })
        .await;

    let outcome = WithdrawalController::new(Arc::clone(&catalog))
        .submit("Chess Club", "a@x.com")
        .await;

    assert_eq!(outcome.text, REJECTED_FALLBACK);
}

#[tokio::test]
async fn missing_success_message_falls_back() {
    let registry = FakeRegistry::silent(chess_roster());
    let catalog = loaded_catalog(registry).await;

    let outcome = WithdrawalController::new(Arc::clone(&catalog))
        .submit("Art", "b@x.com")
        .await;

    assert_eq!(outcome.text, "Unregistered from Art");
}

#[tokio::test(start_paused = true)]
async fn withdrawal_notice_hides_after_four_seconds() {
    let registry = FakeRegistry::with_catalog(chess_roster());
    let catalog = loaded_catalog(registry).await;

    let outcome = WithdrawalController::new(Arc::clone(&catalog))
        .submit("Art", "b@x.com")
        .await;
    outcome.settle().await.expect("refresh");

    tokio::time::sleep(WITHDRAWAL_NOTICE - std::time::Duration::from_millis(1)).await;
    assert!(catalog.banner().is_visible());
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    assert!(!catalog.banner().is_visible());
}
