//! `mylms` page glue core library.
//!
//! Browser-independent logic behind the mylms page script:
//! - Anti-forgery token lookup from the cookie string
//! - Progress bar fill widths
//! - Bootstrap widget markers (tooltips, popovers)
//! - The notification endpoint contract
//! - Notification view state and the mark-as-read controller
//!
//! The browser side (DOM, fetch, cookies) plugs in through the
//! [`NotificationApi`], [`ViewRenderer`] and [`CookieSource`] traits.
//!
//! ```rust,ignore
//! use mylms_core::{NotificationBoard, NotificationSync, PageConfig};
//!
//! let mut board = NotificationBoard::new();
//! let id = board.register("/notifications/7/mark-read/");
//! let sync = NotificationSync::new(api, renderer, cookies, PageConfig::default().endpoints, board);
//! sync.mark_read(id).await?;
//! ```

pub mod api;
pub mod board;
pub mod config;
pub mod csrf;
pub mod error;
pub mod progress;
pub mod sync;
pub mod widget;

pub use api::{
    ApiRequest, MarkReadResponse, Method, NotificationApi, REQUESTED_WITH_HEADER,
    REQUESTED_WITH_VALUE, UnreadCountResponse,
};
pub use board::{BadgeState, ItemId, NotificationBoard, NotificationItem, ReadState, ViewPatch};
pub use config::{
    CONFIG_ELEMENT_ID, DEFAULT_MARK_ALL_READ_URL, DEFAULT_UNREAD_COUNT_URL, Endpoints, PageConfig,
    Selectors,
};
pub use csrf::{CSRF_COOKIE_NAME, CSRF_HEADER, cookie_value, csrf_token};
pub use error::{Error, Result};
pub use progress::{VALUE_ATTRIBUTE, fill_width, fill_width_for};
pub use sync::{CookieSource, MarkReadOutcome, NotificationSync, ViewRenderer};
pub use widget::{TOGGLE_ATTRIBUTE, WidgetKind};
