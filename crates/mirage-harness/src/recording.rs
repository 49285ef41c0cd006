//! Presenter that records every push call for assertions.

use std::convert::Infallible;

use mirage_app::{AuthTab, Presenter, Severity, UiAction};
use mirage_core::types::{Message, User};

/// Recording presentation layer.
///
/// Stores each push call as the [`UiAction`] that produced it, in call
/// order, so scenario tests can assert on the exact rendered sequence.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    log: Vec<UiAction>,
}

impl RecordingPresenter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded actions in call order.
    pub fn actions(&self) -> &[UiAction] {
        &self.log
    }

    /// Drain the recorded actions, leaving the recorder empty.
    pub fn take_actions(&mut self) -> Vec<UiAction> {
        std::mem::take(&mut self.log)
    }

    /// Recorded system-message texts, in order.
    pub fn system_messages(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|action| match action {
                UiAction::AppendSystemMessage(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded notifications as (text, severity), in order.
    pub fn notifications(&self) -> Vec<(&str, Severity)> {
        self.log
            .iter()
            .filter_map(|action| match action {
                UiAction::ShowNotification { text, severity } => {
                    Some((text.as_str(), *severity))
                },
                _ => None,
            })
            .collect()
    }

    /// Recorded connection labels, in order.
    pub fn connection_labels(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|action| match action {
                UiAction::SetConnectionLabel(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Most recent message-count push.
    pub fn last_message_count(&self) -> Option<usize> {
        self.log.iter().rev().find_map(|action| match action {
            UiAction::SetMessageCount(count) => Some(*count),
            _ => None,
        })
    }

    /// Most recent online-count push.
    pub fn last_online_count(&self) -> Option<usize> {
        self.log.iter().rev().find_map(|action| match action {
            UiAction::SetOnlineCount(count) => Some(*count),
            _ => None,
        })
    }

    /// Number of recorded actions matching `predicate`.
    pub fn count_matching(&self, predicate: impl Fn(&UiAction) -> bool) -> usize {
        self.log.iter().filter(|action| predicate(action)).count()
    }
}

impl Presenter for RecordingPresenter {
    type Error = Infallible;

    fn render_roster(&mut self, users: &[User]) -> Result<(), Infallible> {
        self.log.push(UiAction::RenderRoster(users.to_vec()));
        Ok(())
    }

    fn append_message_view(&mut self, message: &Message, own: bool) -> Result<(), Infallible> {
        self.log.push(UiAction::AppendMessage { message: message.clone(), own });
        Ok(())
    }

    fn append_system_message(&mut self, text: &str) -> Result<(), Infallible> {
        self.log.push(UiAction::AppendSystemMessage(text.to_string()));
        Ok(())
    }

    fn set_connection_label(&mut self, text: &str) -> Result<(), Infallible> {
        self.log.push(UiAction::SetConnectionLabel(text.to_string()));
        Ok(())
    }

    fn set_online_count(&mut self, count: usize) -> Result<(), Infallible> {
        self.log.push(UiAction::SetOnlineCount(count));
        Ok(())
    }

    fn set_message_count(&mut self, count: usize) -> Result<(), Infallible> {
        self.log.push(UiAction::SetMessageCount(count));
        Ok(())
    }

    fn show_notification(&mut self, text: &str, severity: Severity) -> Result<(), Infallible> {
        self.log.push(UiAction::ShowNotification { text: text.to_string(), severity });
        Ok(())
    }

    fn switch_auth_tab(&mut self, tab: AuthTab) -> Result<(), Infallible> {
        self.log.push(UiAction::SwitchAuthTab(tab));
        Ok(())
    }

    fn close_auth_overlay(&mut self) -> Result<(), Infallible> {
        self.log.push(UiAction::CloseAuthOverlay);
        Ok(())
    }

    fn set_auth_busy(&mut self, busy: bool) -> Result<(), Infallible> {
        self.log.push(UiAction::SetAuthBusy(busy));
        Ok(())
    }
}
