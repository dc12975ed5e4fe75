//! Overlay lifecycle manager.
//!
//! The manager is the factory at the heart of the crate: it allocates
//! tokens, registers instances, stages them into and out of the open-order
//! list on enter/exit delays, and delivers each overlay's result through a
//! single-settlement future.
//!
//! All timer work runs on Tokio, so creating and settling overlays must
//! happen inside a runtime. Timers are never cancelled; a timer that fires
//! after its token has moved on finds nothing to do and returns.
//!
//! # Example
//!
//! ```ignore
//! let manager: OverlayManager<DialogView> = OverlayManager::default();
//! let confirm = manager.create::<bool>(view, OverlayOptions::new());
//!
//! let pending = confirm.open(Props::new().with("path", "/tmp/a"));
//! let handle = pending.handle();
//! // ... hand `handle` to whatever drives user interaction ...
//! match pending.await {
//!     Ok(Some(true)) => { /* confirmed */ }
//!     Ok(_) => { /* dismissed */ }
//!     Err(Rejected(_)) => { /* cancelled */ }
//! }
//! ```

use std::future::{Future, IntoFuture};
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::config::{ManagerConfig, OverlayOptions};
use crate::handle::{HandleDyn, OverlayHandle, Rejected, SettleSink, Settlement};
use crate::props::Props;
use crate::redraw::{RedrawHandle, RedrawSender};
use crate::registry::{OverlayEntry, OverlayRegistry, Phase};
use crate::stack::OpenStack;
use crate::token::OverlayToken;

struct ManagerState<V> {
    registry: OverlayRegistry<V>,
    stack: OpenStack,
}

struct ManagerCore<V> {
    config: ManagerConfig,
    state: Mutex<ManagerState<V>>,
    redraw: RedrawHandle,
}

impl<V> ManagerCore<V> {
    fn state(&self) -> MutexGuard<'_, ManagerState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter-delay timer target. Only a still-pending entry is promoted;
    /// a token that settled (or purged) while the timer ran is left alone.
    fn promote(&self, token: OverlayToken) {
        let mut state = self.state();
        let Some(entry) = state.registry.get_mut(token) else {
            log::trace!("overlay {token}: promotion timer fired after purge");
            return;
        };
        if entry.phase != Phase::Pending {
            log::trace!("overlay {token}: promotion timer fired while closing");
            return;
        }
        entry.phase = Phase::Open;
        state.stack.promote(token);
        drop(state);
        log::debug!("overlay {token}: open");
        self.redraw.send();
    }

    /// Exit-delay timer target. Absent tokens are a no-op.
    fn purge(&self, token: OverlayToken) {
        let mut state = self.state();
        // Demote on this path too, keeping the order-list invariant even
        // if settlement never ran (it always has by here).
        state.stack.demote(token);
        let removed = state.registry.remove(token);
        drop(state);
        if removed {
            log::debug!("overlay {token}: purged");
            self.redraw.send();
        } else {
            log::trace!("overlay {token}: purge timer fired after removal");
        }
    }
}

impl<V: Send + 'static> SettleSink for ManagerCore<V> {
    fn overlay_settled(self: Arc<Self>, token: OverlayToken) {
        let exit_delay = {
            let mut state = self.state();
            let Some(entry) = state.registry.get_mut(token) else {
                return;
            };
            if entry.phase == Phase::Closing {
                return;
            }
            entry.phase = Phase::Closing;
            let exit_delay = entry.exit_delay;
            state.stack.demote(token);
            exit_delay
        };
        log::debug!("overlay {token}: closing, purge in {exit_delay:?}");
        self.redraw.send();
        let core = Arc::downgrade(&self);
        tokio::spawn(async move {
            tokio::time::sleep(exit_delay).await;
            if let Some(core) = core.upgrade() {
                core.purge(token);
            }
        });
    }
}

impl<V> Drop for ManagerCore<V> {
    fn drop(&mut self) {
        // Host disposal: no caller may be left awaiting a settlement.
        let closers = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .registry
            .closers();
        if !closers.is_empty() {
            log::debug!("manager dropped with {} live overlay(s), rejecting", closers.len());
        }
        for closer in closers {
            closer.reject_empty();
        }
    }
}

/// Overlay lifecycle manager.
///
/// A cheap-clone handle; all clones share one registry and open-order
/// list. When the last clone (and every creator made from it) drops, any
/// unsettled overlay is rejected with no payload.
pub struct OverlayManager<V> {
    core: Arc<ManagerCore<V>>,
}

impl<V> Clone for OverlayManager<V> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<V> Default for OverlayManager<V> {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

impl<V> OverlayManager<V> {
    /// Create a manager with the given host-level configuration.
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            core: Arc::new(ManagerCore {
                config,
                state: Mutex::new(ManagerState {
                    registry: OverlayRegistry::new(),
                    stack: OpenStack::new(),
                }),
                redraw: RedrawHandle::new(),
            }),
        }
    }

    /// The configuration fixed at construction.
    pub fn config(&self) -> ManagerConfig {
        self.core.config
    }

    /// Install the sender half of a redraw channel (see [`crate::redraw`]).
    pub fn install_redraw(&self, sender: RedrawSender) {
        self.core.redraw.install(sender);
    }

    /// Number of registered overlays, open or not.
    pub fn len(&self) -> usize {
        self.core.state().registry.len()
    }

    /// Whether no overlays are registered.
    pub fn is_empty(&self) -> bool {
        self.core.state().registry.is_empty()
    }

    /// Number of overlays currently flagged open.
    pub fn open_count(&self) -> usize {
        self.core.state().stack.len()
    }

    /// Whether a token is in the open-order list.
    pub fn is_open(&self, token: OverlayToken) -> bool {
        self.core.state().stack.is_open(token)
    }

    /// Whether a token is still registered.
    pub fn contains(&self, token: OverlayToken) -> bool {
        self.core.state().registry.contains(token)
    }

    /// Snapshot of the open-order list.
    pub fn open_order(&self) -> Vec<OverlayToken> {
        self.core.state().stack.snapshot()
    }

    /// The topmost open overlay, if any.
    pub fn top(&self) -> Option<OverlayToken> {
        self.core.state().stack.top()
    }

    /// Lifecycle phase of a token, or `None` once purged.
    pub fn phase(&self, token: OverlayToken) -> Option<Phase> {
        self.core.state().registry.get(token).map(|e| e.phase)
    }

    /// Resolve every registered overlay with no value.
    ///
    /// Bulk dismissal, e.g. on navigation. Snapshots the registry first;
    /// settling mutates it. Safe on an empty registry, and entries that
    /// are already closing are skipped by the settlement guard.
    pub fn resolve_all(&self) {
        let closers = self.core.state().registry.closers();
        log::debug!("resolve_all: settling {} overlay(s)", closers.len());
        for closer in closers {
            closer.resolve_empty();
        }
    }

    /// Reject every registered overlay with no payload.
    ///
    /// Teardown counterpart of [`Self::resolve_all`]: guarantees no caller
    /// awaits a result that will never come.
    pub fn reject_all(&self) {
        let closers = self.core.state().registry.closers();
        log::debug!("reject_all: settling {} overlay(s)", closers.len());
        for closer in closers {
            closer.reject_empty();
        }
    }
}

impl<V: Clone + Send + 'static> OverlayManager<V> {
    /// Build a creator for one overlay kind.
    ///
    /// `R` is the type the overlay resolves with. Each [`OverlayCreator::open`]
    /// call spawns an independent instance with its own token and future;
    /// holding several open instances from one creator is how overlays
    /// stack.
    pub fn create<R: Send + 'static>(&self, view: V, options: OverlayOptions) -> OverlayCreator<V, R> {
        OverlayCreator {
            manager: self.clone(),
            view,
            options,
            _result: PhantomData,
        }
    }

    /// Render projection: every registered overlay in render order.
    ///
    /// `open` reflects current open-order membership, so a frame can be
    /// registered but not yet open (entering) or registered and no longer
    /// open (exiting).
    pub fn frames(&self) -> Vec<OverlayFrame<V>> {
        let state = self.core.state();
        state
            .registry
            .iter()
            .map(|entry| OverlayFrame {
                token: entry.token,
                view: entry.view.clone(),
                props: entry.props.clone(),
                enter_delay: entry.enter_delay,
                exit_delay: entry.exit_delay,
                open: state.stack.is_open(entry.token),
                closer: Arc::clone(&entry.closer),
            })
            .collect()
    }

    fn open_instance<R: Send + 'static>(
        &self,
        view: V,
        options: &OverlayOptions,
        props: Props,
    ) -> PendingOverlay<R> {
        let token = OverlayToken::new();
        let config = &self.core.config;
        let enter_delay = options.enter_delay.unwrap_or(config.enter_delay);
        let exit_delay = options.exit_delay.unwrap_or(config.exit_delay);
        let merged = options.props.clone().merged(props);

        let (tx, rx) = oneshot::channel();
        let weak = Arc::downgrade(&self.core);
        let sink: Weak<dyn SettleSink> = weak;
        let handle = OverlayHandle::new(token, tx, sink);
        let entry = OverlayEntry::new(
            token,
            view,
            merged,
            enter_delay,
            exit_delay,
            Arc::new(handle.clone()) as Arc<dyn HandleDyn>,
        );
        self.core.state().registry.register(entry, config.insert_order);
        log::debug!("overlay {token}: registered, open in {enter_delay:?}");
        self.core.redraw.send();

        let core = Arc::downgrade(&self.core);
        tokio::spawn(async move {
            tokio::time::sleep(enter_delay).await;
            if let Some(core) = core.upgrade() {
                core.promote(token);
            }
        });

        PendingOverlay { token, handle, rx }
    }
}

/// Factory for one overlay kind: a renderable unit plus creation options.
///
/// Cloneable; each [`open`](Self::open) call creates an independent,
/// concurrently-live instance.
pub struct OverlayCreator<V, R> {
    manager: OverlayManager<V>,
    view: V,
    options: OverlayOptions,
    _result: PhantomData<fn() -> R>,
}

impl<V: Clone + Send + 'static, R: Send + 'static> OverlayCreator<V, R> {
    /// Open a new instance with per-open props merged over the creation
    /// options.
    pub fn open(&self, props: Props) -> PendingOverlay<R> {
        self.manager.open_instance(self.view.clone(), &self.options, props)
    }
}

impl<V: Clone, R> Clone for OverlayCreator<V, R> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            view: self.view.clone(),
            options: self.options.clone(),
            _result: PhantomData,
        }
    }
}

/// A live overlay awaiting settlement.
///
/// Await it for the result. Grab a [`handle`](Self::handle) first when
/// settlement is driven from somewhere else (user interaction, a timeout
/// task).
pub struct PendingOverlay<R> {
    token: OverlayToken,
    handle: OverlayHandle<R>,
    rx: oneshot::Receiver<Settlement<R>>,
}

impl<R> PendingOverlay<R> {
    /// Token of this instance.
    pub fn token(&self) -> OverlayToken {
        self.token
    }

    /// A settlement handle for this instance.
    pub fn handle(&self) -> OverlayHandle<R> {
        self.handle.clone()
    }
}

impl<R: Send + 'static> IntoFuture for PendingOverlay<R> {
    type Output = Result<Option<R>, Rejected<R>>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        let rx = self.rx;
        Box::pin(async move {
            match rx.await {
                Ok(Settlement::Resolved(value)) => Ok(value),
                Ok(Settlement::Rejected(payload)) => Err(Rejected(payload)),
                // Sender dropped unsettled (manager torn down mid-flight):
                // deliver a bare rejection rather than hanging the caller.
                Err(_) => Err(Rejected(None)),
            }
        })
    }
}

/// Render projection of one registered overlay, handed to the host.
///
/// The host mounts `view` with `props` and calls [`close`](Self::close) or
/// [`reject`](Self::reject) in response to user action.
pub struct OverlayFrame<V> {
    /// Instance token.
    pub token: OverlayToken,
    /// The renderable unit supplied at creation.
    pub view: V,
    /// Merged configuration and per-open props.
    pub props: Props,
    /// Effective enter delay for this instance, so the host can time
    /// enter animations against the `open` flip.
    pub enter_delay: Duration,
    /// Effective exit delay: how long the frame outlives settlement.
    pub exit_delay: Duration,
    /// Whether the token is currently in the open-order list.
    pub open: bool,
    closer: Arc<dyn HandleDyn>,
}

impl<V> OverlayFrame<V> {
    /// Resolve the overlay with no value.
    pub fn close(&self) {
        self.closer.resolve_empty();
    }

    /// Resolve the overlay with a value.
    ///
    /// The frame is type-erased, so the value is matched against the
    /// creator's result type at runtime; a value of the wrong type still
    /// closes the overlay, delivering `Ok(None)` instead.
    pub fn close_with<T: Send + 'static>(&self, value: T) {
        self.closer.resolve_boxed(Box::new(value));
    }

    /// Reject the overlay with no payload.
    pub fn reject(&self) {
        self.closer.reject_empty();
    }

    /// Reject the overlay with a payload, matched like
    /// [`close_with`](Self::close_with).
    pub fn reject_with<T: Send + 'static>(&self, payload: T) {
        self.closer.reject_boxed(Box::new(payload));
    }

    /// Whether this frame's overlay has already settled.
    pub fn is_settled(&self) -> bool {
        self.closer.is_settled()
    }
}
