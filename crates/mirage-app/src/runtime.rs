//! Orchestration runtime.
//!
//! Owns the one session controller and one chat engine of the process (no
//! ambient globals), the session store, and the presenter, and routes
//! commands and timer ticks between them. All state transitions happen
//! inside a command dispatch or a tick, each running to completion before
//! the next.

use mirage_core::{env::Environment, store::SessionStore};

use crate::{
    action::{Severity, UiAction},
    auth::{AuthAction, SessionController},
    chat::ChatEngine,
    presenter::Presenter,
};

/// User-triggered operations routed through the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the login form.
    Login {
        /// Email address.
        email: String,
        /// Password.
        password: String,
    },

    /// Submit the registration form.
    Register {
        /// Desired display name.
        username: String,
        /// Email address.
        email: String,
        /// Password.
        password: String,
        /// Password confirmation.
        password_confirm: String,
    },

    /// Clear the active session.
    Logout,

    /// Commit a chat message.
    SendMessage {
        /// Raw message text; trimmed before commit.
        text: String,
    },

    /// Connect the chat engine without going through login.
    Connect,

    /// Stop all simulated background activity.
    Disconnect,
}

/// Command dispatch and tick orchestration.
///
/// Generic over the environment, the session store, and the presenter so the
/// same orchestration code runs in production frontends and in deterministic
/// simulation.
pub struct Runtime<E, S, P>
where
    E: Environment,
    S: SessionStore,
    P: Presenter,
{
    env: E,
    controller: SessionController<E>,
    engine: ChatEngine<E>,
    store: S,
    presenter: P,
}

impl<E, S, P> Runtime<E, S, P>
where
    E: Environment,
    S: SessionStore,
    P: Presenter,
{
    /// Create a runtime with freshly constructed state machines.
    pub fn new(env: E, store: S, presenter: P) -> Self {
        let controller = SessionController::new(env.clone());
        let engine = ChatEngine::new(env.clone());
        Self { env, controller, engine, store, presenter }
    }

    /// Render the seeded state and restore any persisted session.
    ///
    /// # Errors
    ///
    /// Returns the presenter's error when a render call fails.
    pub fn start(&mut self) -> Result<(), P::Error> {
        let actions = self.engine.bootstrap();
        self.apply_all(actions)?;

        let actions = self.controller.restore(&mut self.store);
        self.process_auth(actions)
    }

    /// Dispatch one user-triggered command.
    ///
    /// # Errors
    ///
    /// Returns the presenter's error when a render call fails.
    pub fn dispatch(&mut self, command: Command) -> Result<(), P::Error> {
        let now = self.env.now();
        match command {
            Command::Login { email, password } => {
                let actions = self.controller.login(email, password, now);
                self.process_auth(actions)
            },
            Command::Register { username, email, password, password_confirm } => {
                let actions =
                    self.controller.register(username, email, password, password_confirm, now);
                self.process_auth(actions)
            },
            Command::Logout => {
                let actions = self.controller.logout(&mut self.store);
                self.process_auth(actions)
            },
            Command::SendMessage { text } => {
                match self.engine.send_message(self.controller.session(), &text, now) {
                    Ok(actions) => self.apply_all(actions),
                    Err(err) => {
                        tracing::debug!(%err, "message rejected");
                        self.presenter.show_notification(&err.to_string(), Severity::Error)
                    },
                }
            },
            Command::Connect => {
                let actions = self.engine.connect(now);
                self.apply_all(actions)
            },
            Command::Disconnect => {
                let actions = self.engine.disconnect();
                self.apply_all(actions)
            },
        }
    }

    /// Fire due timers on both state machines. Safe to call at any cadence.
    ///
    /// # Errors
    ///
    /// Returns the presenter's error when a render call fails.
    pub fn tick(&mut self) -> Result<(), P::Error> {
        let now = self.env.now();
        let actions = self.controller.tick(now, &mut self.store);
        self.process_auth(actions)?;

        let actions = self.engine.tick(now);
        self.apply_all(actions)
    }

    /// The session controller.
    pub fn controller(&self) -> &SessionController<E> {
        &self.controller
    }

    /// The chat engine.
    pub fn engine(&self) -> &ChatEngine<E> {
        &self.engine
    }

    /// The session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presenter (tests drain recorded actions).
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    fn process_auth(&mut self, actions: Vec<AuthAction>) -> Result<(), P::Error> {
        for action in actions {
            match action {
                AuthAction::Ui(ui) => self.apply(ui)?,
                AuthAction::StartChat => {
                    let now = self.env.now();
                    let actions = self.engine.connect(now);
                    self.apply_all(actions)?;
                },
            }
        }
        Ok(())
    }

    fn apply_all(&mut self, actions: Vec<UiAction>) -> Result<(), P::Error> {
        for action in actions {
            self.apply(action)?;
        }
        Ok(())
    }

    fn apply(&mut self, action: UiAction) -> Result<(), P::Error> {
        match action {
            UiAction::RenderRoster(users) => self.presenter.render_roster(&users),
            UiAction::AppendMessage { message, own } => {
                self.presenter.append_message_view(&message, own)
            },
            UiAction::AppendSystemMessage(text) => self.presenter.append_system_message(&text),
            UiAction::SetConnectionLabel(text) => self.presenter.set_connection_label(&text),
            UiAction::SetOnlineCount(count) => self.presenter.set_online_count(count),
            UiAction::SetMessageCount(count) => self.presenter.set_message_count(count),
            UiAction::ShowNotification { text, severity } => {
                self.presenter.show_notification(&text, severity)
            },
            UiAction::SwitchAuthTab(tab) => self.presenter.switch_auth_tab(tab),
            UiAction::CloseAuthOverlay => self.presenter.close_auth_overlay(),
            UiAction::SetAuthBusy(busy) => self.presenter.set_auth_busy(busy),
        }
    }
}
