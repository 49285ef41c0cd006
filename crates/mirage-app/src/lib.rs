//! Application layer for Mirage.
//!
//! Pure state machines for the simulated chat client, enabling deterministic
//! testing with the same code that runs in production frontends.
//!
//! # Components
//!
//! - [`SessionController`]: authentication state machine (login,
//!   registration, restore, logout) with simulated-latency round trips
//! - [`ChatEngine`]: connection, roster, and timeline state machine with
//!   simulated presence churn, roster growth, and peer replies
//! - [`Presenter`]: trait abstracting the presentation layer
//! - [`Runtime`]: command dispatch and tick orchestration
//!
//! Both state machines follow the action pattern: methods take time as a
//! parameter and return [`UiAction`] values for the runtime to execute. No
//! I/O happens inside the machines.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod auth;
mod chat;
mod presenter;
mod runtime;

#[cfg(test)]
mod testutil;

pub use action::{AuthTab, Severity, UiAction};
pub use auth::{AuthAction, AuthState, MIN_PASSWORD_LEN, SIMULATED_LATENCY, SessionController};
pub use chat::{
    ARRIVAL_TICK, CONNECT_DELAY, ChatEngine, ConnectionState, PRESENCE_TICK, REPLY_DELAY_MAX,
    REPLY_DELAY_MIN,
};
pub use presenter::Presenter;
pub use runtime::{Command, Runtime};
