//! Presentation-layer side effects.
//!
//! State machines never touch the presentation layer directly; they return
//! [`UiAction`] values describing the push-style update calls the runtime
//! must perform. The core never reads layout state back.

use mirage_core::types::{Message, User};

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral information.
    Info,
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// Tabs of the authentication overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    /// Sign-in form.
    Login,
    /// Account creation form.
    Register,
}

/// Push-style update calls to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Replace the rendered participant list.
    RenderRoster(Vec<User>),

    /// Append one chat message to the view. `own` marks the local session's
    /// messages for distinct styling.
    AppendMessage {
        /// The message to render. Presenters producing markup must escape
        /// its text first.
        message: Message,
        /// Whether the local session authored the message.
        own: bool,
    },

    /// Append a system line to the view.
    AppendSystemMessage(String),

    /// Update the connection status label.
    SetConnectionLabel(String),

    /// Update the online-participants counter.
    SetOnlineCount(usize),

    /// Update the message counter.
    SetMessageCount(usize),

    /// Show a transient notification.
    ShowNotification {
        /// Notification text.
        text: String,
        /// Display severity.
        severity: Severity,
    },

    /// Switch the authentication overlay to the given tab.
    SwitchAuthTab(AuthTab),

    /// Close the authentication overlay.
    CloseAuthOverlay,

    /// Disable (`true`) or re-enable (`false`) the submit affordance while a
    /// simulated round trip is in flight.
    SetAuthBusy(bool),
}
