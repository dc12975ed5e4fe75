//! Asynchronous overlay (modal dialog) lifecycle management.
//!
//! `scrim` manages a stack of overlays whose results arrive through
//! futures: opening an overlay returns a [`manager::PendingOverlay`] that
//! settles exactly once when the overlay is resolved or rejected.
//! Overlays stage in and out on configurable enter/exit delays so hosts
//! get animation windows, and can be batch-settled on navigation or
//! teardown.
//!
//! The crate renders nothing itself. The host supplies an opaque
//! renderable unit per overlay and consumes
//! [`manager::OverlayManager::frames`] to mount them; a redraw channel
//! ([`redraw`]) tells the host when the projection changed.

pub mod config;
pub mod handle;
pub mod manager;
pub mod props;
pub mod redraw;
pub mod registry;
pub mod scope;
pub mod stack;
pub mod token;

pub mod prelude {
    pub use crate::config::{InsertOrder, ManagerConfig, OverlayOptions};
    pub use crate::handle::{OverlayHandle, Rejected};
    pub use crate::manager::{
        OverlayCreator, OverlayFrame, OverlayManager, PendingOverlay,
    };
    pub use crate::props::Props;
    pub use crate::redraw::{RedrawReceiver, RedrawSender};
    pub use crate::registry::Phase;
    pub use crate::scope::{ScopeError, ScopeRegistry};
    pub use crate::token::OverlayToken;
}
