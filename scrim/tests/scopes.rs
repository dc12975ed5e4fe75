//! Scope registry tests: explicit mount/unmount of per-scope managers.

use std::time::Duration;

use scrim::prelude::*;

fn config() -> ManagerConfig {
    ManagerConfig::new()
        .with_enter_delay(Duration::from_millis(10))
        .with_exit_delay(Duration::from_millis(10))
}

#[tokio::test]
async fn test_mount_and_get_share_state() {
    let mut scopes: ScopeRegistry<&'static str> = ScopeRegistry::new();
    let manager = scopes.mount("main", config()).unwrap();

    let creator = manager.create::<()>("dialog", OverlayOptions::new());
    let _pending = creator.open(Props::new());

    let looked_up = scopes.get("main").unwrap();
    assert_eq!(looked_up.len(), 1);
    assert!(scopes.get("other").is_none());
}

#[tokio::test]
async fn test_mount_twice_is_an_error() {
    let mut scopes: ScopeRegistry<&'static str> = ScopeRegistry::new();
    scopes.mount("main", config()).unwrap();
    let err = scopes.mount("main", config()).map(|_| ()).unwrap_err();
    assert_eq!(err, ScopeError::AlreadyMounted("main".to_string()));
    assert_eq!(scopes.len(), 1);
}

#[tokio::test]
async fn test_unmount_missing_scope_is_an_error() {
    let mut scopes: ScopeRegistry<&'static str> = ScopeRegistry::new();
    assert_eq!(
        scopes.unmount("ghost"),
        Err(ScopeError::NotMounted("ghost".to_string()))
    );
}

#[tokio::test]
async fn test_unmount_rejects_pending_overlays() {
    let mut scopes: ScopeRegistry<&'static str> = ScopeRegistry::new();
    let manager = scopes.mount("main", config()).unwrap();
    let creator = manager.create::<u32>("dialog", OverlayOptions::new());
    let pending = creator.open(Props::new());

    scopes.unmount("main").unwrap();
    assert!(scopes.is_empty());
    assert_eq!(pending.await, Err(Rejected(None)));
}

#[tokio::test]
async fn test_scopes_are_independent() {
    let mut scopes: ScopeRegistry<&'static str> = ScopeRegistry::new();
    let main = scopes.mount("main", config()).unwrap();
    let side = scopes.mount("side", config()).unwrap();

    let creator = main.create::<()>("dialog", OverlayOptions::new());
    let _pending = creator.open(Props::new());

    assert_eq!(main.len(), 1);
    assert_eq!(side.len(), 0);

    let mut names = scopes.names();
    names.sort_unstable();
    assert_eq!(names, vec!["main", "side"]);
}
