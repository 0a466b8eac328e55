//! Entry and list interactions: status toggles, saving, starring and
//! keyboard navigation across the items of a page.

pub mod actions;
pub mod navigation;
pub mod status;

use serde::{Deserialize, Serialize};

use crate::http::{Request, RequestBuilder, Response, Transport, TransportError};
use crate::page::{NodeId, PageContext, PageError};

pub use navigation::Direction;
pub use status::update_unread_counter;

pub const ITEM_SELECTOR: &str = ".items .item";
pub const CURRENT_ITEM_CLASS: &str = "current-item";

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("Page: {0}")]
    Page(#[from] PageError),
    #[error("Transport: {0}")]
    Transport(#[from] TransportError),
    #[error("Server answered HTTP {0}")]
    Rejected(u16),
    #[error("Unexpected response body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("Invalid entry id: {0:?}")]
    InvalidId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Read,
    Unread,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Unread => "unread",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Read => Self::Unread,
            Self::Unread => Self::Read,
        }
    }

    /// The `item-status-*` class marking an item with this status.
    pub fn class(&self) -> String {
        format!("item-status-{}", self.as_str())
    }

    /// Anything but `read` counts as unread.
    pub fn parse(value: &str) -> Self {
        if value == "read" { Self::Read } else { Self::Unread }
    }
}

/// Entry actions for one page event.
pub struct EntryController<'a, P, T> {
    pub(crate) page: &'a mut P,
    pub(crate) transport: &'a T,
}

impl<'a, P, T> EntryController<'a, P, T>
where
    P: PageContext,
    T: Transport,
{
    pub fn new(page: &'a mut P, transport: &'a T) -> Self {
        Self { page, transport }
    }

    pub fn page(&self) -> &P {
        self.page
    }

    pub fn is_list_view(&self) -> bool {
        self.page.query(".items").is_some()
    }

    pub fn is_entry(&self) -> bool {
        self.page.query("section.entry").is_some()
    }

    /// The entry an action applies to: the item around `target` in list
    /// view, the current item when there is no target, or the open entry.
    pub fn find_entry(&self, target: Option<NodeId>) -> Option<NodeId> {
        if self.is_list_view() {
            match target {
                Some(node) => self.page.closest_with_class(node, "item"),
                None => self.page.query(&format!(".{CURRENT_ITEM_CLASS}")),
            }
        } else {
            self.page.query(".entry")
        }
    }

    pub(crate) fn entry_id(&self, entry: NodeId) -> Result<i64, EntryError> {
        let raw = self.page.data(entry, "id").unwrap_or_default();
        raw.trim().parse().map_err(|_| EntryError::InvalidId(raw))
    }

    pub(crate) fn body_url(&self, name: &str) -> Result<String, EntryError> {
        self.page.body_data(name).ok_or_else(|| {
            EntryError::Page(PageError::MissingAttribute {
                selector: "body".into(),
                attribute: format!("data-{name}"),
            })
        })
    }

    /// Sends `request` and insists on a 2xx answer.
    pub(crate) async fn send(&self, request: Request) -> Result<Response, EntryError> {
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "Request rejected");
            return Err(EntryError::Rejected(response.status));
        }
        Ok(response)
    }

    pub(crate) fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::for_page(&*self.page, url)
    }

    /// Replaces a link's content with its `data-label-loading` text and
    /// returns the previous markup.
    pub(crate) fn set_loading_label(&mut self, link: NodeId) -> String {
        let previous = self.page.inner_html(link);
        let loading = self.page.data(link, "label-loading").unwrap_or_default();
        self.page
            .set_inner_html(link, &format!("<span class=\"icon-label\">{loading}</span>"));
        previous
    }
}
