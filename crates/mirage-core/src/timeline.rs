//! Append-only message timeline.

use crate::types::Message;

/// A system line interleaved with chat messages (connectivity announcements,
/// presence changes, arrivals). System lines have no author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemLine {
    /// Announcement text.
    pub text: String,
    /// Wall-clock time, milliseconds since the Unix epoch.
    pub at_millis: u64,
}

/// One timeline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEntry {
    /// A chat message authored by a participant or the local session.
    Chat(Message),
    /// A system announcement.
    System(SystemLine),
}

/// Ordered, append-only sequence of timeline entries.
///
/// Entries are never edited or deleted. Order is the order the appending
/// callbacks actually ran, which may differ from real-time send order when
/// randomized delays reorder them.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries, system lines included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timeline has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Append a chat message.
    pub fn append_message(&mut self, message: Message) {
        self.entries.push(TimelineEntry::Chat(message));
    }

    /// Append a system line.
    pub fn append_system(&mut self, line: SystemLine) {
        self.entries.push(TimelineEntry::System(line));
    }

    /// Chat messages in append order, system lines skipped.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            TimelineEntry::Chat(message) => Some(message),
            TimelineEntry::System(_) => None,
        })
    }

    /// Number of chat messages. This is the message-count aggregate pushed to
    /// the presentation layer; system lines do not count.
    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    /// Whether any system line contains `needle`.
    pub fn has_system_containing(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| match entry {
            TimelineEntry::System(line) => line.text.contains(needle),
            TimelineEntry::Chat(_) => false,
        })
    }
}
