//! Core data types: sessions, participants, presence, and messages.

use serde::{Deserialize, Serialize};

/// Identifier shared by sessions and roster participants.
///
/// Messages reference their author through this id. The reference is
/// lookup-only: a participant may leave the roster representation without
/// invalidating historical messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a single timeline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The authenticated identity bound to the current process.
///
/// Exactly one session may be active per process. Created on successful
/// login or registration, destroyed on logout or when a persisted credential
/// turns out to be invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Freshly generated id, unique per sign-in.
    pub id: ActorId,
    /// Email address the session was created with.
    pub email: String,
    /// Name shown next to the user's messages.
    pub display_name: String,
    /// Wall-clock creation time, milliseconds since the Unix epoch.
    pub created_at_millis: u64,
}

/// Display name derived from an email address: its local part.
///
/// `"neo@matrix.io"` becomes `"neo"`. An address without `@` is used as-is.
pub fn display_name_for(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// A participant's availability, mutable over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Active and reachable.
    Online,
    /// Signed in but idle.
    Away,
    /// Not reachable.
    Offline,
}

impl Presence {
    /// Human-readable label used in system messages and roster rendering.
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Offline => "offline",
        }
    }

    /// Whether this presence counts towards the online aggregate.
    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A roster participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Participant id, shared id space with sessions.
    pub id: ActorId,
    /// Name shown in the roster and on messages.
    pub display_name: String,
    /// Current availability.
    pub presence: Presence,
    /// Single-character avatar shown next to the name.
    pub avatar_glyph: char,
}

impl User {
    /// Build a participant whose avatar glyph is the first letter of the
    /// display name.
    pub fn new(id: ActorId, display_name: impl Into<String>, presence: Presence) -> Self {
        let display_name = display_name.into();
        let avatar_glyph = display_name.chars().next().unwrap_or('?');
        Self { id, display_name, presence, avatar_glyph }
    }
}

/// A single chat message, immutable once created.
///
/// `author_id` must reference a roster participant (the sender or a simulated
/// bot) at creation time, or be the committing session's own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Freshly generated id, unique per message.
    pub id: MessageId,
    /// Author reference (lookup-only, see [`ActorId`]).
    pub author_id: ActorId,
    /// Author name captured at creation time.
    pub author_name: String,
    /// Raw message text. Must pass through [`crate::escape::escape_text`]
    /// before insertion into any markup.
    pub text: String,
    /// Wall-clock send time, milliseconds since the Unix epoch.
    pub sent_at_millis: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_email_local_part() {
        assert_eq!(display_name_for("neo@matrix.io"), "neo");
        assert_eq!(display_name_for("trinity@zion.example"), "trinity");
        assert_eq!(display_name_for("no-at-sign"), "no-at-sign");
        assert_eq!(display_name_for(""), "");
    }

    #[test]
    fn avatar_glyph_is_first_letter() {
        let user = User::new(ActorId(1), "Morpheus", Presence::Away);
        assert_eq!(user.avatar_glyph, 'M');

        let anonymous = User::new(ActorId(2), "", Presence::Online);
        assert_eq!(anonymous.avatar_glyph, '?');
    }

    #[test]
    fn session_round_trips_through_json() {
        let session = Session {
            id: ActorId(42),
            email: "neo@matrix.io".to_string(),
            display_name: "neo".to_string(),
            created_at_millis: 1_700_000_000_000,
        };

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
