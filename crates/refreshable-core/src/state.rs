//! Elm-style state management: `State + Message → (State, Command)`.
//!
//! # Examples
//!
//! ```
//! use refreshable_core::{Command, State};
//!
//! #[derive(Clone, Default)]
//! struct Pager {
//!     page: u32,
//! }
//!
//! enum PagerMessage {
//!     Next,
//!     Reset,
//! }
//!
//! impl State for Pager {
//!     type Message = PagerMessage;
//!
//!     fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
//!         match msg {
//!             PagerMessage::Next => self.page += 1,
//!             PagerMessage::Reset => self.page = 0,
//!         }
//!         Command::None
//!     }
//! }
//!
//! let mut pager = Pager::default();
//! pager.update(PagerMessage::Next);
//! assert_eq!(pager.page, 1);
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Application state updated only through messages.
pub trait State: Clone + Send + Sync {
    /// Message type for state updates
    type Message: Send;

    /// Update state in response to a message.
    ///
    /// Returns a command for side effects (async fetches, delays).
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;
}

/// Side effects to run after a state update.
#[derive(Default)]
pub enum Command<M> {
    /// No command
    #[default]
    None,
    /// Execute an async task whose output is fed back as a message
    Task(Pin<Box<dyn Future<Output = M> + Send>>),
}

impl<M> fmt::Debug for Command<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Task(_) => f.write_str("Task(..)"),
        }
    }
}

impl<M> Command<M> {
    /// Create a task command from an async block.
    pub fn task<F>(future: F) -> Self
    where
        F: Future<Output = M> + Send + 'static,
    {
        Self::Task(Box::pin(future))
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Run the task, if any, to completion and return its message.
    pub async fn run(self) -> Option<M> {
        match self {
            Self::None => None,
            Self::Task(fut) => Some(fut.await),
        }
    }
}
