//! Delivery of the refresh callback into the caller's context.
//!
//! The wrapper never awaits the callback. It hands it to a [`Dispatcher`],
//! which either runs it on the spot or ships it to wherever the caller's
//! state lives.

use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Caller-supplied refresh operation.
pub type RefreshCallback = Arc<dyn Fn() + Send + Sync>;

/// Runs a refresh callback in the right context.
pub trait Dispatcher: Send + Sync {
    /// Deliver one invocation of `callback`.
    fn dispatch(&self, callback: RefreshCallback);
}

/// Calls the callback immediately on the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn dispatch(&self, callback: RefreshCallback) {
        callback();
    }
}

/// Sends callbacks over a tokio channel to a [`RefreshReceiver`].
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<RefreshCallback>,
}

impl ChannelDispatcher {
    /// Create a dispatcher and the receiving end the caller drains.
    #[must_use]
    pub fn new() -> (Self, RefreshReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, RefreshReceiver { rx })
    }
}

impl Dispatcher for ChannelDispatcher {
    fn dispatch(&self, callback: RefreshCallback) {
        if self.tx.send(callback).is_err() {
            warn!("refresh receiver dropped; refresh callback discarded");
        }
    }
}

/// Receiving end of a [`ChannelDispatcher`].
pub struct RefreshReceiver {
    rx: mpsc::UnboundedReceiver<RefreshCallback>,
}

impl fmt::Debug for RefreshReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshReceiver").finish_non_exhaustive()
    }
}

impl RefreshReceiver {
    /// Wait for the next callback and run it. Returns `false` once every
    /// dispatcher is gone.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Run every callback already queued. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(callback) = self.rx.try_recv() {
            callback();
            ran += 1;
        }
        ran
    }
}
