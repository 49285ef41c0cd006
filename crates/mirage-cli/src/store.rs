//! JSON-file session store.
//!
//! Persists the credential pair as a small JSON document next to wherever
//! the user points `--store`. A missing file means no stored session;
//! anything unreadable or unparsable surfaces as a [`StoreError`] and the
//! session controller falls back to the signed-out state.

use std::{fs, io, path::PathBuf};

use mirage_core::{
    error::StoreError,
    store::{SessionStore, StoredCredential},
    types::Session,
};
use serde_json::json;

/// [`SessionStore`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at the given path. The file is only created on the
    /// first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn save(&mut self, session: &Session, token: &str) -> Result<(), StoreError> {
        let payload = json!({
            "session": serde_json::to_string(session)?,
            "token": token,
        });
        fs::write(&self.path, serde_json::to_string_pretty(&payload)?)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredCredential>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        let (Some(session_json), Some(token)) =
            (value["session"].as_str(), value["token"].as_str())
        else {
            // Present but missing fields reads as an empty store; the next
            // save overwrites it.
            return Ok(None);
        };
        Ok(Some(StoredCredential {
            session_json: session_json.to_owned(),
            token: token.to_owned(),
        }))
    }

    fn clear(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to clear session file");
            }
        }
    }
}
