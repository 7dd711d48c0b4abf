//! Notification read-state synchronization.
//!
//! [`NotificationSync`] drives the mark-as-read flow: send the state change
//! with the current anti-forgery token, apply the acknowledgement to the
//! board, then refresh the global unread count. Failures leave the page as
//! it was; nothing is retried.
//!
//! Each click runs its own call with no coordination between them. Two
//! clicks on the same control both reach the server; the second
//! acknowledgement is a no-op on the board.

use std::cell::{Ref, RefCell};

use tracing::{debug, info, warn};

use crate::api::{ApiRequest, NotificationApi};
use crate::board::{BadgeState, ItemId, NotificationBoard, ViewPatch};
use crate::config::Endpoints;
use crate::csrf::csrf_token;
use crate::error::Result;

/// Applies view patches to the page.
#[cfg_attr(test, mockall::automock)]
pub trait ViewRenderer {
    /// Apply a single patch.
    fn apply(&self, patch: &ViewPatch);
}

/// Source of the current cookie string.
///
/// Read on every state-changing request; never cached.
#[cfg_attr(test, mockall::automock)]
pub trait CookieSource {
    /// The full `document.cookie` style string.
    fn cookie_string(&self) -> String;
}

/// Result of a mark-read call that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// The server reported success and the page was updated.
    Acknowledged,
    /// The server reported failure; the page is unchanged.
    Rejected,
}

/// Controller for the notification read-state protocol.
pub struct NotificationSync<A, R, C> {
    api: A,
    renderer: R,
    cookies: C,
    endpoints: Endpoints,
    board: RefCell<NotificationBoard>,
}

impl<A, R, C> NotificationSync<A, R, C>
where
    A: NotificationApi,
    R: ViewRenderer,
    C: CookieSource,
{
    /// Create a controller over a populated board.
    pub fn new(
        api: A,
        renderer: R,
        cookies: C,
        endpoints: Endpoints,
        board: NotificationBoard,
    ) -> Self {
        Self {
            api,
            renderer,
            cookies,
            endpoints,
            board: RefCell::new(board),
        }
    }

    /// Current board state.
    pub fn board(&self) -> Ref<'_, NotificationBoard> {
        self.board.borrow()
    }

    /// Mark one notification read.
    ///
    /// On acknowledgement the item's markers are removed and the unread
    /// count refreshed. A failed refresh is logged and does not undo the
    /// acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is unknown or the mark-read request
    /// fails (transport, status, or body). The page is unchanged then.
    pub async fn mark_read(&self, id: ItemId) -> Result<MarkReadOutcome> {
        let url = self.board.borrow().url(id)?.to_string();
        let request = ApiRequest::mark_read(url, self.current_token());

        debug!("Marking notification {} read via {}", id, request.url);
        let response = self.api.mark_read(&request).await?;
        if !response.success {
            debug!("Server declined to mark notification {} read", id);
            return Ok(MarkReadOutcome::Rejected);
        }

        // Never hold the board across an await; other clicks share it.
        let patch = self.board.borrow_mut().acknowledge(id)?;
        if let Some(patch) = patch {
            self.renderer.apply(&patch);
        }

        self.refresh_after_acknowledgement().await;
        Ok(MarkReadOutcome::Acknowledged)
    }

    /// Mark every notification read.
    ///
    /// # Errors
    ///
    /// Returns an error if the mark-all-read request fails.
    pub async fn mark_all_read(&self) -> Result<MarkReadOutcome> {
        let request =
            ApiRequest::mark_read(self.endpoints.mark_all_read.clone(), self.current_token());

        debug!("Marking all notifications read via {}", request.url);
        let response = self.api.mark_read(&request).await?;
        if !response.success {
            debug!("Server declined to mark all notifications read");
            return Ok(MarkReadOutcome::Rejected);
        }

        let patches = self.board.borrow_mut().acknowledge_all();
        info!("Marked {} notifications read", patches.len());
        for patch in &patches {
            self.renderer.apply(patch);
        }

        self.refresh_after_acknowledgement().await;
        Ok(MarkReadOutcome::Acknowledged)
    }

    /// Fetch the unread count and update the global badge.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the badge keeps its previous
    /// state.
    pub async fn refresh_unread_count(&self) -> Result<BadgeState> {
        let request = ApiRequest::unread_count(self.endpoints.unread_count.clone());
        let response = self.api.unread_count(&request).await?;

        let patch = self.board.borrow_mut().apply_count(response.count);
        debug!(count = response.count, "Unread count refreshed");
        self.renderer.apply(&patch);
        Ok(BadgeState::from_count(response.count))
    }

    async fn refresh_after_acknowledgement(&self) {
        if let Err(e) = self.refresh_unread_count().await {
            warn!("Failed to refresh unread count: {}", e);
        }
    }

    fn current_token(&self) -> Option<String> {
        let token = csrf_token(&self.cookies.cookie_string());
        if token.is_none() {
            debug!("No CSRF cookie present; sending request without token");
        }
        token
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::eq;

    use super::*;
    use crate::api::{MarkReadResponse, MockNotificationApi, UnreadCountResponse};
    use crate::csrf::CSRF_HEADER;
    use crate::error::Error;

    fn cookies(value: &'static str) -> MockCookieSource {
        let mut mock = MockCookieSource::new();
        mock.expect_cookie_string()
            .returning(move || value.to_string());
        mock
    }

    fn board(urls: &[&str]) -> NotificationBoard {
        let mut board = NotificationBoard::new();
        for url in urls {
            board.register(*url);
        }
        board
    }

    fn first() -> ItemId {
        ItemId::from_index(0)
    }

    #[tokio::test]
    async fn test_acknowledged_click_updates_item_and_badge() {
        let mut api = MockNotificationApi::new();
        api.expect_mark_read()
            .withf(|req| {
                req.url == "/notifications/5/mark-read/" && req.header(CSRF_HEADER) == Some("t0k")
            })
            .times(1)
            .returning(|_| Ok(MarkReadResponse { success: true }));
        api.expect_unread_count()
            .withf(|req| req.url == "/notifications/api/unread-count/")
            .times(1)
            .returning(|_| Ok(UnreadCountResponse { count: 3 }));

        let mut renderer = MockViewRenderer::new();
        let mut seq = Sequence::new();
        renderer
            .expect_apply()
            .with(eq(ViewPatch::MarkItemRead(first())))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        renderer
            .expect_apply()
            .with(eq(ViewPatch::ShowUnreadCount(3)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let sync = NotificationSync::new(
            api,
            renderer,
            cookies("sessionid=x; csrftoken=t0k"),
            Endpoints::default(),
            board(&["/notifications/5/mark-read/"]),
        );

        let outcome = sync.mark_read(first()).await.unwrap();
        assert_eq!(outcome, MarkReadOutcome::Acknowledged);
        assert_eq!(sync.board().unread_items(), 0);
        assert_eq!(sync.board().badge(), Some(BadgeState::Visible(3)));
    }

    #[tokio::test]
    async fn test_rejected_click_changes_nothing() {
        let mut api = MockNotificationApi::new();
        api.expect_mark_read()
            .returning(|_| Ok(MarkReadResponse { success: false }));
        api.expect_unread_count().never();

        let mut renderer = MockViewRenderer::new();
        renderer.expect_apply().never();

        let sync = NotificationSync::new(
            api,
            renderer,
            cookies("csrftoken=a"),
            Endpoints::default(),
            board(&["/n/1/"]),
        );

        let outcome = sync.mark_read(first()).await.unwrap();
        assert_eq!(outcome, MarkReadOutcome::Rejected);
        assert_eq!(sync.board().unread_items(), 1);
        assert_eq!(sync.board().badge(), None);
    }

    #[tokio::test]
    async fn test_transport_error_leaves_state() {
        let mut api = MockNotificationApi::new();
        api.expect_mark_read()
            .returning(|_| Err(Error::Transport("offline".into())));
        api.expect_unread_count().never();

        let mut renderer = MockViewRenderer::new();
        renderer.expect_apply().never();

        let sync = NotificationSync::new(
            api,
            renderer,
            cookies(""),
            Endpoints::default(),
            board(&["/n/1/"]),
        );

        assert!(matches!(
            sync.mark_read(first()).await,
            Err(Error::Transport(_))
        ));
        assert_eq!(sync.board().unread_items(), 1);
    }

    #[tokio::test]
    async fn test_missing_cookie_omits_token() {
        let mut api = MockNotificationApi::new();
        api.expect_mark_read()
            .withf(|req| req.header(CSRF_HEADER).is_none())
            .times(1)
            .returning(|_| Ok(MarkReadResponse { success: false }));

        let sync = NotificationSync::new(
            api,
            MockViewRenderer::new(),
            cookies("sessionid=only"),
            Endpoints::default(),
            board(&["/n/1/"]),
        );

        sync.mark_read(first()).await.unwrap();
    }

    #[tokio::test]
    async fn test_token_is_read_at_click_time() {
        let mut api = MockNotificationApi::new();
        let mut seq = Sequence::new();
        api.expect_mark_read()
            .withf(|req| req.header(CSRF_HEADER) == Some("one"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(MarkReadResponse { success: false }));
        api.expect_mark_read()
            .withf(|req| req.header(CSRF_HEADER) == Some("two"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(MarkReadResponse { success: false }));

        let mut jar = MockCookieSource::new();
        let mut jar_seq = Sequence::new();
        jar.expect_cookie_string()
            .times(1)
            .in_sequence(&mut jar_seq)
            .returning(|| "csrftoken=one".to_string());
        jar.expect_cookie_string()
            .times(1)
            .in_sequence(&mut jar_seq)
            .returning(|| "csrftoken=two".to_string());

        let sync = NotificationSync::new(
            api,
            MockViewRenderer::new(),
            jar,
            Endpoints::default(),
            board(&["/n/1/"]),
        );

        sync.mark_read(first()).await.unwrap();
        sync.mark_read(first()).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_acknowledgement() {
        let mut api = MockNotificationApi::new();
        api.expect_mark_read()
            .returning(|_| Ok(MarkReadResponse { success: true }));
        api.expect_unread_count().returning(|_| {
            Err(Error::HttpStatus {
                status: 500,
                url: "/notifications/api/unread-count/".into(),
            })
        });

        let mut renderer = MockViewRenderer::new();
        renderer
            .expect_apply()
            .with(eq(ViewPatch::MarkItemRead(first())))
            .times(1)
            .return_const(());

        let sync = NotificationSync::new(
            api,
            renderer,
            cookies("csrftoken=a"),
            Endpoints::default(),
            board(&["/n/1/"]),
        );

        let outcome = sync.mark_read(first()).await.unwrap();
        assert_eq!(outcome, MarkReadOutcome::Acknowledged);
        assert_eq!(sync.board().badge(), None);
    }

    #[tokio::test]
    async fn test_zero_count_hides_badge() {
        let mut api = MockNotificationApi::new();
        api.expect_unread_count()
            .returning(|_| Ok(UnreadCountResponse { count: 0 }));

        let mut renderer = MockViewRenderer::new();
        renderer
            .expect_apply()
            .with(eq(ViewPatch::HideUnreadCount))
            .times(1)
            .return_const(());

        let sync = NotificationSync::new(
            api,
            renderer,
            cookies(""),
            Endpoints::default(),
            NotificationBoard::new(),
        );

        let badge = sync.refresh_unread_count().await.unwrap();
        assert_eq!(badge, BadgeState::Hidden);
    }

    #[tokio::test]
    async fn test_unknown_item_sends_nothing() {
        let mut api = MockNotificationApi::new();
        api.expect_mark_read().never();

        let sync = NotificationSync::new(
            api,
            MockViewRenderer::new(),
            cookies(""),
            Endpoints::default(),
            NotificationBoard::new(),
        );

        assert!(matches!(
            sync.mark_read(first()).await,
            Err(Error::UnknownItem(0))
        ));
    }

    #[tokio::test]
    async fn test_mark_all_read_uses_configured_endpoint() {
        let mut api = MockNotificationApi::new();
        api.expect_mark_read()
            .withf(|req| {
                req.url == "/notifications/mark-all-read/" && req.header(CSRF_HEADER) == Some("z")
            })
            .times(1)
            .returning(|_| Ok(MarkReadResponse { success: true }));
        api.expect_unread_count()
            .times(1)
            .returning(|_| Ok(UnreadCountResponse { count: 0 }));

        let mut renderer = MockViewRenderer::new();
        renderer
            .expect_apply()
            .withf(|patch| matches!(patch, ViewPatch::MarkItemRead(_)))
            .times(2)
            .return_const(());
        renderer
            .expect_apply()
            .with(eq(ViewPatch::HideUnreadCount))
            .times(1)
            .return_const(());

        let sync = NotificationSync::new(
            api,
            renderer,
            cookies("csrftoken=z"),
            Endpoints::default(),
            board(&["/n/1/", "/n/2/"]),
        );

        let outcome = sync.mark_all_read().await.unwrap();
        assert_eq!(outcome, MarkReadOutcome::Acknowledged);
        assert_eq!(sync.board().unread_items(), 0);
    }
}
