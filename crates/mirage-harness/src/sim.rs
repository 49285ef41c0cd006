//! Scenario bundle: virtual environment, in-memory store, recording
//! presenter, and a runtime wired from them.

use std::{convert::Infallible, time::Duration};

use mirage_app::{ChatEngine, Command, Runtime, SessionController};
use mirage_core::store::MemoryStore;

use crate::{recording::RecordingPresenter, sim_env::SimEnv};

/// Unwrap a result whose error type has no inhabitants.
fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => match err {},
    }
}

/// One deterministically simulated chat client.
///
/// Wraps a [`Runtime`] over [`SimEnv`], [`MemoryStore`], and
/// [`RecordingPresenter`]. Time moves only through [`Sim::advance`] /
/// [`Sim::run_for`]; a given seed and schedule always reproduce the same
/// recorded action log.
pub struct Sim {
    env: SimEnv,
    runtime: Runtime<SimEnv, MemoryStore, RecordingPresenter>,
}

impl Sim {
    /// Start a simulation with an empty session store.
    pub fn new(seed: u64) -> Self {
        Self::with_store(seed, MemoryStore::new())
    }

    /// Start a simulation restoring from a pre-populated store.
    pub fn with_store(seed: u64, store: MemoryStore) -> Self {
        let env = SimEnv::new(seed);
        let mut runtime = Runtime::new(env.clone(), store, RecordingPresenter::new());
        infallible(runtime.start());
        Self { env, runtime }
    }

    /// The virtual environment.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    /// The session controller.
    pub fn controller(&self) -> &SessionController<SimEnv> {
        self.runtime.controller()
    }

    /// The chat engine.
    pub fn engine(&self) -> &ChatEngine<SimEnv> {
        self.runtime.engine()
    }

    /// The session store.
    pub fn store(&self) -> &MemoryStore {
        self.runtime.store()
    }

    /// The recorded presentation log.
    pub fn presenter(&self) -> &RecordingPresenter {
        self.runtime.presenter()
    }

    /// Drain the recorded presentation log.
    pub fn take_actions(&mut self) -> Vec<mirage_app::UiAction> {
        self.runtime.presenter_mut().take_actions()
    }

    /// Dispatch a command.
    pub fn dispatch(&mut self, command: Command) {
        infallible(self.runtime.dispatch(command));
    }

    /// Submit the login form.
    pub fn login(&mut self, email: &str, password: &str) {
        self.dispatch(Command::Login { email: email.to_string(), password: password.to_string() });
    }

    /// Submit the registration form.
    pub fn register(&mut self, username: &str, email: &str, password: &str, confirm: &str) {
        self.dispatch(Command::Register {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        });
    }

    /// Clear the active session.
    pub fn logout(&mut self) {
        self.dispatch(Command::Logout);
    }

    /// Commit a chat message.
    pub fn send(&mut self, text: &str) {
        self.dispatch(Command::SendMessage { text: text.to_string() });
    }

    /// Connect the chat engine directly.
    pub fn connect(&mut self) {
        self.dispatch(Command::Connect);
    }

    /// Stop all simulated background activity.
    pub fn disconnect(&mut self) {
        self.dispatch(Command::Disconnect);
    }

    /// Move the clock forward in one jump, then fire due timers once.
    pub fn advance(&mut self, duration: Duration) {
        self.env.advance(duration);
        infallible(self.runtime.tick());
    }

    /// Move the clock forward in `step` increments, ticking after each, so
    /// periodic deadlines fire in real scheduling order.
    pub fn run_for(&mut self, total: Duration, step: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            self.advance(step);
            elapsed += step;
        }
    }
}
