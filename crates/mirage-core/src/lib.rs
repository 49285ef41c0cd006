//! Core data model for the Mirage chat simulation.
//!
//! Mirage emulates a real-time chat client without any backend: a local
//! session, a roster of participants with presence state, and an append-only
//! message timeline, with timers standing in for asynchronous network events.
//!
//! This crate holds the pieces shared by every frontend:
//!
//! - [`types`]: sessions, participants, presence, and messages
//! - [`roster`] / [`timeline`]: the two mutable collections of the engine
//! - [`env`]: the [`Environment`](env::Environment) abstraction that makes
//!   time and randomness injectable for deterministic testing
//! - [`store`]: the session persistence collaborator
//! - [`escape`]: markup escaping for user-controlled message text
//! - [`error`]: the error taxonomy

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod escape;
pub mod roster;
pub mod store;
pub mod timeline;
pub mod types;

pub use env::Environment;
pub use error::{AuthError, SendError, StoreError};
pub use escape::escape_text;
pub use roster::{ROSTER_CAP, Roster};
pub use store::{MemoryStore, SessionStore, StoredCredential, TOKEN_PREFIX};
pub use timeline::{SystemLine, Timeline, TimelineEntry};
pub use types::{ActorId, Message, MessageId, Presence, Session, User, display_name_for};
