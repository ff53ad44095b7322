//! UI event types.
//!
//! Hooks and the wizard never render anything themselves. They emit these
//! events and the hosting shell shows toasts, follows redirects and scrolls.

use serde::Serialize;
use tokio::sync::mpsc;

/// Event: notification
/// Emitted to show a toast.
pub const NOTIFICATION_EVENT: &str = "notification";

/// Event: redirect
/// Emitted when the shell should navigate, e.g. to the login page.
pub const REDIRECT_EVENT: &str = "redirect";

/// Event: query-invalidated
/// Emitted when cached query results were dropped and views should refetch.
pub const QUERY_INVALIDATED_EVENT: &str = "query-invalidated";

/// Event: scroll-to-top
/// Emitted when a page or wizard step is entered.
pub const SCROLL_TO_TOP_EVENT: &str = "scroll-to-top";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// Payload for notification events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Event sent to the hosting shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum UiEvent {
    Notification(Notification),
    Redirect { path: String },
    QueryInvalidated { query: String },
    ScrollToTop,
}

impl UiEvent {
    /// Event name, matching the `*_EVENT` constants.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Notification(_) => NOTIFICATION_EVENT,
            Self::Redirect { .. } => REDIRECT_EVENT,
            Self::QueryInvalidated { .. } => QUERY_INVALIDATED_EVENT,
            Self::ScrollToTop => SCROLL_TO_TOP_EVENT,
        }
    }
}

/// Sending half of the UI event channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl EventBus {
    /// Create a bus and the receiver the shell drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit an event. A closed shell is not an error; the event is dropped.
    pub fn emit(&self, event: UiEvent) {
        log::debug!("emit {}", event.name());
        if self.tx.send(event).is_err() {
            log::debug!("UI event receiver closed, dropping event");
        }
    }

    pub fn notify(&self, notification: Notification) {
        self.emit(UiEvent::Notification(notification));
    }

    pub fn redirect(&self, path: impl Into<String>) {
        self.emit(UiEvent::Redirect { path: path.into() });
    }
}

/// Drain every event currently queued, without waiting.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
