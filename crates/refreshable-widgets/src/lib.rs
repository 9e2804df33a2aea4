//! Pull-to-refresh widgets built on `refreshable-core`.
//!
//! - [`RefreshableWrapper`]: wraps any [`ScrollableList`] with the refresh
//!   indicator and gesture handling
//! - [`ListView`]: a plain list to wrap
//! - [`UserList`]: paginated user state with an async [`UserSource`]
//! - [`Dispatcher`]s that deliver the refresh callback

pub mod dispatch;
pub mod list;
pub mod refreshable;
pub mod user_list;

pub use dispatch::{
    ChannelDispatcher, Dispatcher, InlineDispatcher, RefreshCallback, RefreshReceiver,
};
pub use list::{ListScrolled, ListView, ScrollableList};
pub use refreshable::{RefreshPhaseChanged, RefreshableWrapper};
pub use user_list::{
    SourceError, StaticUserSource, User, UserList, UserListMessage, UserPage, UserSource,
    DEFAULT_LOAD_DELAY,
};
