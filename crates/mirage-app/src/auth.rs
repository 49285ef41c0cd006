//! Session controller state machine.
//!
//! Owns authentication state and drives simulated sign-in round trips.
//!
//! # State Machine
//!
//! ```text
//! ┌───────────┐ login/register  ┌─────────────────┐ delay ┌───────────────┐
//! │ Anonymous │────────────────>│ pending round   │──────>│ Authenticated │
//! │           │<─── logout ─────│ trip (queued)   │       │  (Session)    │
//! └───────────┘                 └─────────────────┘       └───────────────┘
//! ```
//!
//! Round trips are queued, not slotted: overlapping submissions each run to
//! completion independently. The submit affordance is acquired when a round
//! trip starts and released on every exit path of its completion.

use std::time::Duration;

use mirage_core::{
    env::Environment,
    error::AuthError,
    store::{self, SessionStore},
    types::{ActorId, Session, display_name_for},
};

use crate::action::{AuthTab, Severity, UiAction};

/// Fixed simulated network round-trip latency, identical for login and
/// register so a zero-delay clock makes both deterministic.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(1500);

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No active session.
    Anonymous,
    /// Signed in with the given session.
    Authenticated(Session),
}

/// Actions produced by the session controller for the runtime to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// Push a presentation-layer update.
    Ui(UiAction),
    /// A session became active through login or restore; the chat engine
    /// should connect.
    StartChat,
}

/// What a pending round trip does when its delay elapses.
#[derive(Debug, Clone)]
enum PendingKind {
    Login { email: String, password: String },
    Register { username: String, email: String, password: String },
}

#[derive(Debug, Clone)]
struct PendingAuth<I> {
    due: I,
    kind: PendingKind,
}

/// Authentication state machine.
///
/// Pure state machine: operations take time as a parameter and return
/// actions; the persisted credential is written through the store the
/// runtime passes in.
#[derive(Debug, Clone)]
pub struct SessionController<E: Environment> {
    env: E,
    state: AuthState,
    pending: Vec<PendingAuth<E::Instant>>,
}

impl<E: Environment> SessionController<E> {
    /// Create a controller in the anonymous state.
    pub fn new(env: E) -> Self {
        Self { env, state: AuthState::Anonymous, pending: Vec::new() }
    }

    /// Current authentication state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Active session, if any.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }

    /// Whether a session is active.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// Attempt to restore a previously persisted session.
    ///
    /// Fails closed: a missing store entry leaves the controller anonymous,
    /// and any malformed credential (foreign token, unparseable payload)
    /// additionally clears the store. Neither case is surfaced to the user.
    pub fn restore<S: SessionStore>(&mut self, store: &mut S) -> Vec<AuthAction> {
        let credential = match store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::debug!(%err, "session store unreadable, staying anonymous");
                store.clear();
                return Vec::new();
            },
        };

        match store::decode_credential(&credential) {
            Ok(session) => {
                tracing::debug!(id = %session.id, "restored persisted session");
                self.state = AuthState::Authenticated(session);
                vec![AuthAction::Ui(UiAction::CloseAuthOverlay), AuthAction::StartChat]
            },
            Err(err) => {
                tracing::debug!(%err, "discarding malformed persisted session");
                store.clear();
                Vec::new()
            },
        }
    }

    /// Begin a simulated login round trip.
    ///
    /// Credentials are checked when the round trip completes, mirroring a
    /// server-side rejection. The affordance is disabled for the call's
    /// duration.
    pub fn login(
        &mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        now: E::Instant,
    ) -> Vec<AuthAction> {
        tracing::debug!("login submitted");
        self.pending.push(PendingAuth {
            due: now + SIMULATED_LATENCY,
            kind: PendingKind::Login { email: email.into(), password: password.into() },
        });
        vec![AuthAction::Ui(UiAction::SetAuthBusy(true))]
    }

    /// Begin a simulated registration round trip.
    ///
    /// Password validation failures short-circuit with an error notification
    /// and incur no simulated latency.
    pub fn register(
        &mut self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirm: impl Into<String>,
        now: E::Instant,
    ) -> Vec<AuthAction> {
        let password = password.into();
        if password != password_confirm.into() {
            return vec![Self::notify_error(&AuthError::PasswordMismatch)];
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return vec![Self::notify_error(&AuthError::PasswordTooShort)];
        }

        tracing::debug!("registration submitted");
        self.pending.push(PendingAuth {
            due: now + SIMULATED_LATENCY,
            kind: PendingKind::Register {
                username: username.into(),
                email: email.into(),
                password,
            },
        });
        vec![AuthAction::Ui(UiAction::SetAuthBusy(true))]
    }

    /// Clear the active session and the persisted credential.
    ///
    /// Does not touch the chat engine; the presentation layer reacts to the
    /// anonymous state.
    pub fn logout<S: SessionStore>(&mut self, store: &mut S) -> Vec<AuthAction> {
        tracing::debug!("logout");
        self.state = AuthState::Anonymous;
        store.clear();
        Vec::new()
    }

    /// Fire any due round trips. Completions run in submission order.
    pub fn tick<S: SessionStore>(&mut self, now: E::Instant, store: &mut S) -> Vec<AuthAction> {
        if self.pending.iter().all(|pending| pending.due > now) {
            return Vec::new();
        }

        let (due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|p| p.due <= now);
        self.pending = waiting;

        let mut actions = Vec::new();
        for pending in due {
            actions.extend(self.complete(pending.kind, store));
        }
        actions
    }

    fn complete<S: SessionStore>(&mut self, kind: PendingKind, store: &mut S) -> Vec<AuthAction> {
        match kind {
            PendingKind::Login { email, password } => {
                if email.is_empty() || password.is_empty() {
                    return Self::reject(&AuthError::MissingCredentials);
                }

                let display_name = display_name_for(&email).to_string();
                let session = self.activate(email, display_name, store);
                tracing::debug!(id = %session.id, "session started");
                vec![
                    AuthAction::Ui(UiAction::SetAuthBusy(false)),
                    AuthAction::Ui(UiAction::ShowNotification {
                        text: "Signed in successfully.".to_string(),
                        severity: Severity::Success,
                    }),
                    AuthAction::Ui(UiAction::CloseAuthOverlay),
                    AuthAction::StartChat,
                ]
            },
            PendingKind::Register { username, email, password } => {
                if username.is_empty() {
                    return Self::reject(&AuthError::MissingUsername);
                }
                if email.is_empty() || password.is_empty() {
                    return Self::reject(&AuthError::MissingCredentials);
                }

                let session = self.activate(email, username, store);
                tracing::debug!(id = %session.id, "account created");
                vec![
                    AuthAction::Ui(UiAction::SetAuthBusy(false)),
                    AuthAction::Ui(UiAction::ShowNotification {
                        text: "Account created successfully.".to_string(),
                        severity: Severity::Success,
                    }),
                    AuthAction::Ui(UiAction::CloseAuthOverlay),
                    AuthAction::Ui(UiAction::SwitchAuthTab(AuthTab::Login)),
                ]
            },
        }
    }

    /// Mint a session, persist it, and transition to authenticated.
    fn activate<S: SessionStore>(
        &mut self,
        email: String,
        display_name: String,
        store: &mut S,
    ) -> Session {
        let created_at_millis = self.env.wall_clock_millis();
        let session = Session {
            id: ActorId(self.env.random_u64()),
            email,
            display_name,
            created_at_millis,
        };

        let token = store::mint_token(created_at_millis);
        if let Err(err) = store.save(&session, &token) {
            // The in-memory session stays valid; only restoration is lost.
            tracing::warn!(%err, "failed to persist session");
        }

        self.state = AuthState::Authenticated(session.clone());
        session
    }

    /// Release the affordance and surface the error, leaving state unchanged.
    fn reject(err: &AuthError) -> Vec<AuthAction> {
        tracing::debug!(%err, "authentication rejected");
        vec![AuthAction::Ui(UiAction::SetAuthBusy(false)), Self::notify_error(err)]
    }

    fn notify_error(err: &AuthError) -> AuthAction {
        AuthAction::Ui(UiAction::ShowNotification {
            text: err.to_string(),
            severity: Severity::Error,
        })
    }
}
