//! Session persistence collaborator.
//!
//! The store persists an opaque (session, token) pair between runs. The only
//! contract on the token is its prefix: anything without [`TOKEN_PREFIX`] is
//! treated as an invalid credential and restoration fails closed.
//!
//! Sessions are stored as serialized JSON strings rather than typed values,
//! so malformed persisted data is representable and the fail-closed recovery
//! path is testable.

use crate::{error::StoreError, types::Session};

/// Prefix marking a token as a valid demo credential.
pub const TOKEN_PREFIX: &str = "demo-token-";

/// Persisted credential pair as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Serialized [`Session`] JSON.
    pub session_json: String,
    /// Opaque token; valid only with the demo prefix.
    pub token: String,
}

/// Collaborator persisting the active session between runs.
pub trait SessionStore {
    /// Persist the session and its token, replacing any previous pair.
    fn save(&mut self, session: &Session, token: &str) -> Result<(), StoreError>;

    /// Load the previously persisted pair. `Ok(None)` when absent.
    fn load(&self) -> Result<Option<StoredCredential>, StoreError>;

    /// Remove any persisted pair. Clearing an empty store is a no-op.
    fn clear(&mut self);
}

/// Mint a fresh demo token.
pub fn mint_token(wall_clock_millis: u64) -> String {
    format!("{TOKEN_PREFIX}{wall_clock_millis}")
}

/// Decode a stored credential into a session, enforcing the token contract.
///
/// # Errors
///
/// - [`StoreError::BadToken`] when the token lacks the demo prefix
/// - [`StoreError::Malformed`] when the session payload does not parse
pub fn decode_credential(credential: &StoredCredential) -> Result<Session, StoreError> {
    if !credential.token.starts_with(TOKEN_PREFIX) {
        return Err(StoreError::BadToken);
    }
    Ok(serde_json::from_str(&credential.session_json)?)
}

/// In-memory store mirroring a browser's local storage.
///
/// Values live as raw strings, so tests can seed malformed payloads through
/// [`MemoryStore::insert_raw`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<StoredCredential>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw values, bypassing serialization.
    pub fn insert_raw(&mut self, session_json: impl Into<String>, token: impl Into<String>) {
        self.slot =
            Some(StoredCredential { session_json: session_json.into(), token: token.into() });
    }

    /// Whether a credential pair is currently stored.
    pub fn is_populated(&self) -> bool {
        self.slot.is_some()
    }
}

impl SessionStore for MemoryStore {
    fn save(&mut self, session: &Session, token: &str) -> Result<(), StoreError> {
        let session_json = serde_json::to_string(session)?;
        self.slot = Some(StoredCredential { session_json, token: token.to_string() });
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredCredential>, StoreError> {
        Ok(self.slot.clone())
    }

    fn clear(&mut self) {
        self.slot = None;
    }
}
