//! Insertion-ordered roster of chat participants.

use crate::types::{ActorId, Presence, User};

/// Maximum number of participants the growth simulation may reach.
pub const ROSTER_CAP: usize = 15;

/// Live mapping of known participants, insertion order preserved for display.
///
/// New entries are append-only; existing entries are mutated only through
/// [`Roster::set_presence`]. The cap is enforced here so that no caller can
/// grow the roster past [`ROSTER_CAP`].
#[derive(Debug, Clone, Default)]
pub struct Roster {
    users: Vec<User>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a roster from seed participants, in order.
    ///
    /// Entries beyond the cap or with duplicate ids are dropped.
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        let mut roster = Self::new();
        for user in users {
            let _ = roster.push(user);
        }
        roster
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the roster has no participants.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Participants in insertion order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Look up a participant by id.
    pub fn get(&self, id: ActorId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Append a new participant.
    ///
    /// Returns `false` without mutating when the cap is reached or the id is
    /// already present.
    pub fn push(&mut self, user: User) -> bool {
        if self.users.len() >= ROSTER_CAP || self.get(user.id).is_some() {
            return false;
        }
        self.users.push(user);
        true
    }

    /// Reassign a participant's presence.
    ///
    /// Returns the previous presence, or `None` when the id is unknown.
    pub fn set_presence(&mut self, id: ActorId, presence: Presence) -> Option<Presence> {
        let user = self.users.iter_mut().find(|user| user.id == id)?;
        let previous = user.presence;
        user.presence = presence;
        Some(previous)
    }

    /// Number of participants currently online.
    pub fn online_count(&self) -> usize {
        self.users.iter().filter(|user| user.presence.is_online()).count()
    }
}
