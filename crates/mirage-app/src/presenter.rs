//! Presenter trait abstracting the presentation layer.
//!
//! The presentation layer is a push-only collaborator: the runtime calls
//! these methods to mirror state changes, and the core never reads layout
//! state back. Implementations include a terminal frontend in production and
//! a recording presenter in the simulation harness.
//!
//! Message text is attacker controlled. Implementations that produce markup
//! must pass it through [`mirage_core::escape::escape_text`] before
//! insertion.

use mirage_core::types::{Message, User};

use crate::action::{AuthTab, Severity};

/// Push-style presentation layer.
pub trait Presenter {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Replace the rendered participant list.
    fn render_roster(&mut self, users: &[User]) -> Result<(), Self::Error>;

    /// Append one chat message; `own` marks the local session's messages.
    fn append_message_view(&mut self, message: &Message, own: bool) -> Result<(), Self::Error>;

    /// Append a system line.
    fn append_system_message(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Update the connection status label.
    fn set_connection_label(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Update the online-participants counter.
    fn set_online_count(&mut self, count: usize) -> Result<(), Self::Error>;

    /// Update the message counter.
    fn set_message_count(&mut self, count: usize) -> Result<(), Self::Error>;

    /// Show a transient notification.
    fn show_notification(&mut self, text: &str, severity: Severity) -> Result<(), Self::Error>;

    /// Switch the authentication overlay to the given tab.
    fn switch_auth_tab(&mut self, tab: AuthTab) -> Result<(), Self::Error>;

    /// Close the authentication overlay.
    fn close_auth_overlay(&mut self) -> Result<(), Self::Error>;

    /// Disable or re-enable the submit affordance.
    fn set_auth_busy(&mut self, busy: bool) -> Result<(), Self::Error>;
}
