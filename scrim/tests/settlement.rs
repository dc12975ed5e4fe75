//! Settlement semantics: exactly-once delivery, independence, bulk ops.

use std::time::Duration;

use scrim::prelude::*;

const SETTLE_TIME: Duration = Duration::from_millis(80);

fn manager() -> OverlayManager<&'static str> {
    OverlayManager::new(
        ManagerConfig::new()
            .with_enter_delay(Duration::from_millis(10))
            .with_exit_delay(Duration::from_millis(10)),
    )
}

// =============================================================================
// Single-instance settlement
// =============================================================================

#[tokio::test]
async fn test_resolve_delivers_exact_value() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());
    pending.handle().resolve(42);
    assert_eq!(pending.await, Ok(Some(42)));
}

#[tokio::test]
async fn test_reject_without_payload() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());
    pending.handle().reject();
    assert_eq!(pending.await, Err(Rejected(None)));
}

#[tokio::test]
async fn test_reject_with_payload() {
    let manager = manager();
    let creator = manager.create::<String>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());
    pending.handle().reject_with("cancelled".to_string());
    assert_eq!(pending.await, Err(Rejected(Some("cancelled".to_string()))));
}

#[tokio::test]
async fn test_second_settlement_has_no_effect() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());
    let handle = pending.handle();

    handle.resolve(1);
    assert!(handle.is_settled());
    // Rapid double-click: both extra calls are ignored.
    handle.resolve(2);
    handle.reject();
    assert_eq!(pending.await, Ok(Some(1)));
}

#[tokio::test]
async fn test_concurrent_instances_settle_independently() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let first = creator.open(Props::new());
    let second = creator.open(Props::new());
    let third = creator.open(Props::new());

    second.handle().reject_with(99);
    first.handle().resolve(1);
    third.handle().resolve(3);

    assert_eq!(first.await, Ok(Some(1)));
    assert_eq!(second.await, Err(Rejected(Some(99))));
    assert_eq!(third.await, Ok(Some(3)));
}

// =============================================================================
// Render-boundary callbacks
// =============================================================================

#[tokio::test]
async fn test_frame_close_resolves_with_no_value() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());

    let frames = manager.frames();
    frames[0].close();
    assert!(frames[0].is_settled());
    assert_eq!(pending.await, Ok(None));
}

#[tokio::test]
async fn test_frame_close_with_delivers_value() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());

    // The rendered side settles a result value through the projection,
    // without ever seeing the typed handle.
    manager.frames()[0].close_with(42u32);
    assert_eq!(pending.await, Ok(Some(42)));
}

#[tokio::test]
async fn test_frame_close_with_wrong_type_still_closes() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());

    manager.frames()[0].close_with("not a u32");
    assert_eq!(pending.await, Ok(None));
}

#[tokio::test]
async fn test_frame_reject_with_delivers_payload() {
    let manager = manager();
    let creator = manager.create::<String>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());

    manager.frames()[0].reject_with("dismissed".to_string());
    assert_eq!(pending.await, Err(Rejected(Some("dismissed".to_string()))));
}

#[tokio::test]
async fn test_frame_reject_rejects_with_no_payload() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());

    manager.frames()[0].reject();
    assert_eq!(pending.await, Err(Rejected(None)));
}

// =============================================================================
// Bulk settlement
// =============================================================================

#[tokio::test]
async fn test_resolve_all_settles_every_instance_once() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pendings: Vec<_> = (0..4).map(|_| creator.open(Props::new())).collect();

    tokio::time::sleep(SETTLE_TIME).await;
    assert_eq!(manager.open_count(), 4);

    manager.resolve_all();
    assert_eq!(manager.open_count(), 0);
    for pending in pendings {
        assert_eq!(pending.await, Ok(None));
    }

    tokio::time::sleep(SETTLE_TIME).await;
    assert!(manager.is_empty());
}

#[tokio::test]
async fn test_resolve_all_on_empty_manager_is_noop() {
    let manager = manager();
    manager.resolve_all();
    manager.reject_all();
    assert!(manager.is_empty());
}

#[tokio::test]
async fn test_reject_all_rejects_every_instance() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let first = creator.open(Props::new());
    let second = creator.open(Props::new());

    manager.reject_all();
    assert_eq!(first.await, Err(Rejected(None)));
    assert_eq!(second.await, Err(Rejected(None)));
}

#[tokio::test]
async fn test_resolve_all_skips_already_closing_instances() {
    let manager = manager();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let settled = creator.open(Props::new());
    let live = creator.open(Props::new());

    settled.handle().resolve(5);
    manager.resolve_all();

    // The earlier settlement wins; bulk resolution does not overwrite it.
    assert_eq!(settled.await, Ok(Some(5)));
    assert_eq!(live.await, Ok(None));
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test]
async fn test_dropping_manager_rejects_pending_overlays() {
    let manager: OverlayManager<&'static str> = OverlayManager::default();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());

    drop(creator);
    drop(manager);
    assert_eq!(pending.await, Err(Rejected(None)));
}

#[tokio::test]
async fn test_redraw_signal_on_lifecycle_transitions() {
    let manager = manager();
    let (tx, mut rx) = scrim::redraw::channel();
    manager.install_redraw(tx);

    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let _pending = creator.open(Props::new());

    // Registration queues a signal; promotion and purge queue more later.
    let signal = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("redraw signal within 1s");
    assert_eq!(signal, Some(()));
    rx.drain();
}
