//! Notification view state.
//!
//! The page's notifications and the global unread badge, kept as explicit
//! state instead of being re-queried from the DOM. Every state change yields
//! a [`ViewPatch`] for the renderer to apply.

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};

/// Index of a notification registered on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the item in registration (document) order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read state of a single notification.
///
/// `Read` is terminal for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadState {
    /// Highlighted, carries an unread badge.
    #[default]
    Unread,
    /// Acknowledged by the server.
    Read,
}

/// A notification rendered by the server with a mark-as-read control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    url: String,
    state: ReadState,
}

impl NotificationItem {
    /// URL of the item's mark-as-read action.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current read state.
    #[must_use]
    pub const fn state(&self) -> ReadState {
        self.state
    }

    /// Whether the item is still unread.
    #[must_use]
    pub fn is_unread(&self) -> bool {
        self.state == ReadState::Unread
    }
}

/// State of the global unread count badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    /// Shown with the given count.
    Visible(u64),
    /// Hidden; the previous text is left in place.
    Hidden,
}

impl BadgeState {
    /// Badge state for a count reported by the server.
    #[must_use]
    pub fn from_count(count: i64) -> Self {
        match u64::try_from(count) {
            Ok(n) if n > 0 => Self::Visible(n),
            _ => Self::Hidden,
        }
    }

    /// Patch rendering this state.
    #[must_use]
    pub const fn patch(self) -> ViewPatch {
        match self {
            Self::Visible(count) => ViewPatch::ShowUnreadCount(count),
            Self::Hidden => ViewPatch::HideUnreadCount,
        }
    }
}

/// A DOM change produced by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPatch {
    /// Drop the item's highlight class and remove its unread badge.
    MarkItemRead(ItemId),
    /// Set the global badge text to the count and show it.
    ShowUnreadCount(u64),
    /// Hide the global badge.
    HideUnreadCount,
}

/// All notifications on the page plus the global badge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationBoard {
    items: Vec<NotificationItem>,
    badge: Option<BadgeState>,
}

impl NotificationBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unread notification with its mark-as-read URL.
    pub fn register(&mut self, url: impl Into<String>) -> ItemId {
        let id = ItemId::from_index(self.items.len());
        self.items.push(NotificationItem {
            url: url.into(),
            state: ReadState::Unread,
        });
        id
    }

    /// Number of registered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&NotificationItem> {
        self.items.get(id.0)
    }

    /// Mark-as-read URL of an item.
    pub fn url(&self, id: ItemId) -> Result<&str> {
        self.get(id)
            .map(NotificationItem::url)
            .ok_or(Error::UnknownItem(id.0))
    }

    /// Number of items still unread on this page.
    #[must_use]
    pub fn unread_items(&self) -> usize {
        self.items.iter().filter(|item| item.is_unread()).count()
    }

    /// Last badge state rendered, `None` until the first successful refresh.
    #[must_use]
    pub const fn badge(&self) -> Option<BadgeState> {
        self.badge
    }

    /// Record a server acknowledgement for one item.
    ///
    /// Returns the patch for an `Unread -> Read` transition, or `None` when
    /// the item was already read.
    pub fn acknowledge(&mut self, id: ItemId) -> Result<Option<ViewPatch>> {
        let item = self.items.get_mut(id.0).ok_or(Error::UnknownItem(id.0))?;
        if item.state == ReadState::Read {
            debug!("Notification {} already read", id);
            return Ok(None);
        }
        item.state = ReadState::Read;
        debug!("Notification {} marked read", id);
        Ok(Some(ViewPatch::MarkItemRead(id)))
    }

    /// Record a server acknowledgement for every item.
    pub fn acknowledge_all(&mut self) -> Vec<ViewPatch> {
        self.items
            .iter_mut()
            .enumerate()
            .filter(|(_, item)| item.state == ReadState::Unread)
            .map(|(index, item)| {
                item.state = ReadState::Read;
                ViewPatch::MarkItemRead(ItemId::from_index(index))
            })
            .collect()
    }

    /// Record a freshly fetched unread count.
    pub fn apply_count(&mut self, count: i64) -> ViewPatch {
        let badge = BadgeState::from_count(count);
        self.badge = Some(badge);
        badge.patch()
    }
}
