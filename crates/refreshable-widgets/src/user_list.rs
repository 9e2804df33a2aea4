//! Paginated user list fed by an asynchronous page source.
//!
//! [`UserList`] is an Elm-style [`State`]: messages change it synchronously
//! and fetching happens in a returned [`Command::Task`] whose result comes
//! back as another message.

use async_trait::async_trait;
use refreshable_core::{Command, State};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Artificial delay before each fetch, so the refresh indicator is visible.
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(5000);

/// One user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: u64,
    /// Email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Avatar image URL
    pub avatar: String,
}

impl User {
    /// "First Last".
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of users as served by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    /// 1-based page number
    pub page: u32,
    /// Users per page
    pub per_page: u32,
    /// Total users across all pages
    pub total: u32,
    /// Number of pages
    pub total_pages: u32,
    /// Users on this page
    pub data: Vec<User>,
}

/// Errors from a [`UserSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested page does not exist.
    #[error("page {0} not found")]
    PageNotFound(u32),

    /// A page document could not be decoded.
    #[error("malformed page document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Somewhere pages of users come from.
#[async_trait]
pub trait UserSource: Send + Sync + fmt::Debug {
    /// Fetch one 1-based page.
    async fn fetch_page(&self, page: u32) -> Result<UserPage, SourceError>;
}

/// Serves pages from memory.
#[derive(Debug, Clone, Default)]
pub struct StaticUserSource {
    pages: BTreeMap<u32, UserPage>,
}

impl StaticUserSource {
    /// Serve the given pages, keyed by their page number.
    #[must_use]
    pub fn from_pages(pages: impl IntoIterator<Item = UserPage>) -> Self {
        Self {
            pages: pages.into_iter().map(|p| (p.page, p)).collect(),
        }
    }

    /// Parse a JSON array of page documents.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Malformed`] if the JSON does not match.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let pages: Vec<UserPage> = serde_json::from_str(json)?;
        Ok(Self::from_pages(pages))
    }

    /// Generate `total` sample users split into pages of `per_page`.
    #[must_use]
    pub fn demo(total: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(per_page);
        let pages = (1..=total_pages).map(|page| {
            let first = (page - 1) * per_page + 1;
            let last = (page * per_page).min(total);
            UserPage {
                page,
                per_page,
                total,
                total_pages,
                data: (first..=last).map(demo_user).collect(),
            }
        });
        Self::from_pages(pages)
    }

    /// Number of pages held.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn demo_user(id: u32) -> User {
    User {
        id: u64::from(id),
        email: format!("user{id}@example.com"),
        first_name: format!("User{id}"),
        last_name: "Sample".to_string(),
        avatar: format!("https://example.com/avatars/{id}.jpg"),
    }
}

#[async_trait]
impl UserSource for StaticUserSource {
    async fn fetch_page(&self, page: u32) -> Result<UserPage, SourceError> {
        self.pages
            .get(&page)
            .cloned()
            .ok_or(SourceError::PageNotFound(page))
    }
}

/// Messages for [`UserList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserListMessage {
    /// Start loading the current page.
    Load,
    /// A page arrived.
    Loaded(UserPage),
    /// The fetch failed.
    Failed(String),
    /// Move to the next page if there is one.
    More,
}

/// Paginated user list state.
#[derive(Debug, Clone)]
pub struct UserList {
    users: Vec<User>,
    page: u32,
    total_users: u32,
    total_pages: u32,
    loading: bool,
    last_error: Option<String>,
    load_delay: Duration,
    source: Arc<dyn UserSource>,
}

impl UserList {
    /// Empty list on page 1.
    #[must_use]
    pub fn new(source: Arc<dyn UserSource>) -> Self {
        Self {
            users: Vec::new(),
            page: 1,
            total_users: 0,
            total_pages: 0,
            loading: false,
            last_error: None,
            load_delay: DEFAULT_LOAD_DELAY,
            source,
        }
    }

    /// Set the delay before each fetch.
    #[must_use]
    pub const fn load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Users on the current page.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total users reported by the last page.
    #[must_use]
    pub const fn total_users(&self) -> u32 {
        self.total_users
    }

    /// Total pages reported by the last page.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed fetch, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl State for UserList {
    type Message = UserListMessage;

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
        match msg {
            UserListMessage::Load => {
                self.loading = true;
                let source = Arc::clone(&self.source);
                let page = self.page;
                let delay = self.load_delay;
                debug!(page, ?delay, "loading users");
                Command::task(async move {
                    tokio::time::sleep(delay).await;
                    match source.fetch_page(page).await {
                        Ok(page) => UserListMessage::Loaded(page),
                        Err(err) => UserListMessage::Failed(err.to_string()),
                    }
                })
            }
            UserListMessage::Loaded(page) => {
                debug!(page = page.page, count = page.data.len(), "users loaded");
                self.users = page.data;
                self.total_pages = page.total_pages;
                self.total_users = page.total;
                self.loading = false;
                self.last_error = None;
                Command::None
            }
            UserListMessage::Failed(err) => {
                warn!(page = self.page, error = %err, "failed to load users");
                self.loading = false;
                self.last_error = Some(err);
                Command::None
            }
            UserListMessage::More => {
                if self.page < self.total_pages {
                    self.page += 1;
                } else {
                    self.loading = false;
                }
                Command::None
            }
        }
    }
}
