//! Redraw notification channel for hosts.
//!
//! The manager mutates overlay state on its own timers, outside any host
//! call. Hosts that render on demand install a [`RedrawSender`] and block
//! on the matching receiver; each lifecycle transition queues a signal and
//! redundant signals coalesce into one render.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

/// Sender half of the redraw channel.
#[derive(Clone, Debug)]
pub struct RedrawSender {
    tx: mpsc::Sender<()>,
}

impl RedrawSender {
    /// Queue a redraw signal.
    ///
    /// Non-blocking. A full channel is ignored (a redraw is already
    /// pending), as is a closed one (the host stopped rendering).
    pub fn send(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Receiver half of the redraw channel.
pub struct RedrawReceiver {
    rx: mpsc::Receiver<()>,
}

impl RedrawReceiver {
    /// Wait for the next redraw signal. Returns `None` once every sender
    /// is gone.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Consume queued signals so several transitions collapse into a
    /// single render pass.
    pub fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Create a redraw channel pair.
pub fn channel() -> (RedrawSender, RedrawReceiver) {
    let (tx, rx) = mpsc::channel(8);
    (RedrawSender { tx }, RedrawReceiver { rx })
}

/// Slot for a sender installed after manager construction.
#[derive(Debug, Default, Clone)]
pub(crate) struct RedrawHandle {
    inner: Arc<Mutex<Option<RedrawSender>>>,
}

impl RedrawHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn install(&self, sender: RedrawSender) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = Some(sender);
        }
    }

    pub(crate) fn send(&self) {
        if let Ok(slot) = self.inner.lock() {
            if let Some(sender) = slot.as_ref() {
                sender.send();
            }
        }
    }
}
