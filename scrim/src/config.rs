//! Manager configuration and per-creation options.

use std::time::Duration;

use crate::props::Props;

/// Default delay before a newly registered overlay is flagged open.
///
/// The gap gives the host one render pass with `open == false` so enter
/// animations have a starting frame.
pub const DEFAULT_ENTER_DELAY: Duration = Duration::from_millis(50);

/// Default delay between settlement and registry purge.
///
/// The settled overlay stays registered (with `open == false`) for this
/// long so exit animations can play out.
pub const DEFAULT_EXIT_DELAY: Duration = Duration::from_millis(500);

/// Where newly registered overlays land in the render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertOrder {
    /// New entries render before existing ones (default).
    #[default]
    PrependNew,
    /// New entries render after existing ones.
    AppendNew,
}

/// Host-level configuration, fixed at manager construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Delay from registration to promotion into the open-order list.
    pub enter_delay: Duration,
    /// Delay from settlement to registry purge.
    pub exit_delay: Duration,
    /// Render-order placement for new entries.
    pub insert_order: InsertOrder,
}

impl ManagerConfig {
    /// Create a config with the default delays and prepend-new ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the enter delay.
    pub fn with_enter_delay(mut self, delay: Duration) -> Self {
        self.enter_delay = delay;
        self
    }

    /// Set the exit delay.
    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = delay;
        self
    }

    /// Set the insert-order policy.
    pub fn with_insert_order(mut self, order: InsertOrder) -> Self {
        self.insert_order = order;
        self
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            enter_delay: DEFAULT_ENTER_DELAY,
            exit_delay: DEFAULT_EXIT_DELAY,
            insert_order: InsertOrder::default(),
        }
    }
}

/// Per-creation overrides, merged over the manager defaults.
///
/// Delays override the manager's when set. Props merge under the per-open
/// props (see [`Props::merged`]); they never affect timing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayOptions {
    /// Override for [`ManagerConfig::enter_delay`].
    pub enter_delay: Option<Duration>,
    /// Override for [`ManagerConfig::exit_delay`].
    pub exit_delay: Option<Duration>,
    /// Props shared by every instance opened through this creator.
    pub props: Props,
}

impl OverlayOptions {
    /// Create empty options: manager defaults apply, no props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the enter delay for overlays created with these options.
    pub fn with_enter_delay(mut self, delay: Duration) -> Self {
        self.enter_delay = Some(delay);
        self
    }

    /// Override the exit delay for overlays created with these options.
    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = Some(delay);
        self
    }

    /// Add a creation-level prop.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.props.insert(key, value);
        self
    }
}
