//! Chat engine state machine.
//!
//! Owns connection state, the roster, and the message timeline, and drives
//! the simulated network activity: presence churn, roster growth, and peer
//! replies, all on deadlines fired by [`ChatEngine::tick`].
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐ connect  ┌────────────┐  delay   ┌───────────┐
//! │ Disconnected │─────────>│ Connecting │─────────>│ Connected │
//! └──────────────┘          └────────────┘          └───────────┘
//!        ^                        │                       │
//!        └────────── disconnect ──┴───────────────────────┘
//! ```
//!
//! `disconnect` cancels every pending deadline, so tests can deterministically
//! stop background activity.

use std::time::Duration;

use mirage_core::{
    env::Environment,
    error::SendError,
    roster::{ROSTER_CAP, Roster},
    timeline::{SystemLine, Timeline},
    types::{ActorId, Message, MessageId, Presence, Session, User},
};

use crate::action::UiAction;

/// Delay between `connect()` and the Connected transition.
pub const CONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Interval of the presence-churn process while connected.
pub const PRESENCE_TICK: Duration = Duration::from_secs(10);

/// Interval of the roster-growth process while connected.
pub const ARRIVAL_TICK: Duration = Duration::from_secs(15);

/// Lower bound of the simulated reply delay (inclusive).
pub const REPLY_DELAY_MIN: Duration = Duration::from_millis(1000);

/// Upper bound of the simulated reply delay (exclusive).
pub const REPLY_DELAY_MAX: Duration = Duration::from_millis(3000);

/// Per-tick probability that one participant's presence is reassigned.
const PRESENCE_CHURN_CHANCE: f64 = 0.3;

/// Per-tick probability that a new participant arrives.
const ARRIVAL_CHANCE: f64 = 0.2;

/// Probability that a sent message receives a reply. Most messages get none.
const REPLY_CHANCE: f64 = 0.3;

/// Participants that answer messages when they are online.
const BOT_NAMES: &[&str] = &["Neo", "Trinity", "Oracle"];

/// Name pool for simulated arrivals. Names may repeat; ids never do.
const ARRIVAL_POOL: &[&str] = &["Smith", "Persephone", "Merovingian", "Seraph", "Niobe"];

/// Canned reply texts.
const REPLY_POOL: &[&str] = &[
    "Interesting thought...",
    "Keep it up!",
    "What do the others think?",
    "You are on the right track.",
    "Let's talk that through.",
    "I agree with you.",
    "Something to think about...",
];

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected; no background activity.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Connected; presence churn and roster growth are running.
    Connected,
}

/// Chat engine state machine.
///
/// Pure state machine following the action pattern: operations take time as
/// a parameter and return [`UiAction`] values for the runtime to execute.
/// The environment is consulted only for randomness and wall-clock stamps.
#[derive(Debug, Clone)]
pub struct ChatEngine<E: Environment> {
    env: E,
    state: ConnectionState,
    roster: Roster,
    timeline: Timeline,
    connect_due: Option<E::Instant>,
    presence_due: Option<E::Instant>,
    arrival_due: Option<E::Instant>,
    reply_due: Vec<E::Instant>,
}

impl<E: Environment> ChatEngine<E> {
    /// Create a disconnected engine seeded with the demo roster and message
    /// history.
    pub fn new(env: E) -> Self {
        let wall = env.wall_clock_millis();
        let roster = Roster::from_users([
            User::new(ActorId(1), "Neo", Presence::Online),
            User::new(ActorId(2), "Trinity", Presence::Online),
            User::new(ActorId(3), "Morpheus", Presence::Away),
            User::new(ActorId(4), "Cypher", Presence::Offline),
            User::new(ActorId(5), "Oracle", Presence::Online),
        ]);

        let mut timeline = Timeline::new();
        let seed_messages = [
            (1u64, 1u64, "Neo", "Welcome to the Matrix chat.", 3_600_000u64),
            (2, 2, "Trinity", "Follow the white rabbit...", 1_800_000),
            (3, 5, "Oracle", "Know thyself.", 600_000),
        ];
        for (id, author, name, text, age_millis) in seed_messages {
            timeline.append_message(Message {
                id: MessageId(id),
                author_id: ActorId(author),
                author_name: name.to_string(),
                text: text.to_string(),
                sent_at_millis: wall.saturating_sub(age_millis),
            });
        }

        Self {
            env,
            state: ConnectionState::Disconnected,
            roster,
            timeline,
            connect_due: None,
            presence_due: None,
            arrival_due: None,
            reply_due: Vec::new(),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The live participant roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The message timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Initial render of the seeded roster and timeline.
    pub fn bootstrap(&self) -> Vec<UiAction> {
        let mut actions = vec![UiAction::RenderRoster(self.roster.users().to_vec())];
        for message in self.timeline.messages() {
            actions.push(UiAction::AppendMessage { message: message.clone(), own: false });
        }
        actions.push(UiAction::SetOnlineCount(self.roster.online_count()));
        actions.push(UiAction::SetMessageCount(self.timeline.message_count()));
        actions
    }

    /// Begin connecting.
    ///
    /// Idempotent: calling while Connecting or Connected is a no-op, so at
    /// most one Connecting to Connected transition and one connectivity
    /// announcement can result from repeated calls.
    pub fn connect(&mut self, now: E::Instant) -> Vec<UiAction> {
        if self.state != ConnectionState::Disconnected {
            return Vec::new();
        }

        tracing::debug!("connecting");
        self.state = ConnectionState::Connecting;
        self.connect_due = Some(now + CONNECT_DELAY);
        vec![UiAction::SetConnectionLabel("Connecting...".to_string())]
    }

    /// Stop all simulated background activity and return to Disconnected.
    ///
    /// Cancels the pending connect completion, both periodic processes, and
    /// any scheduled replies.
    pub fn disconnect(&mut self) -> Vec<UiAction> {
        if self.state == ConnectionState::Disconnected {
            return Vec::new();
        }

        tracing::debug!("disconnected");
        self.state = ConnectionState::Disconnected;
        self.connect_due = None;
        self.presence_due = None;
        self.arrival_due = None;
        self.reply_due.clear();
        vec![UiAction::SetConnectionLabel("Offline".to_string())]
    }

    /// Commit a message from the active session to the timeline.
    ///
    /// The text is trimmed; an empty result or a missing session is an
    /// explicit, observable rejection that leaves the timeline and counters
    /// untouched. On acceptance a simulated reply is scheduled after a
    /// randomized delay.
    ///
    /// # Errors
    ///
    /// - [`SendError::NotAuthenticated`] when `session` is `None`
    /// - [`SendError::EmptyText`] when the trimmed text is empty
    pub fn send_message(
        &mut self,
        session: Option<&Session>,
        raw_text: &str,
        now: E::Instant,
    ) -> Result<Vec<UiAction>, SendError> {
        let session = session.ok_or(SendError::NotAuthenticated)?;
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyText);
        }

        let message = Message {
            id: MessageId(self.env.random_u64()),
            author_id: session.id,
            author_name: session.display_name.clone(),
            text: text.to_string(),
            sent_at_millis: self.env.wall_clock_millis(),
        };
        self.timeline.append_message(message.clone());

        let delay = self.env.random_duration(REPLY_DELAY_MIN, REPLY_DELAY_MAX);
        self.reply_due.push(now + delay);

        tracing::debug!(id = %message.id, "message committed");
        Ok(vec![
            UiAction::AppendMessage { message, own: true },
            UiAction::SetMessageCount(self.timeline.message_count()),
        ])
    }

    /// Fire all due deadlines: connect completion, presence churn, roster
    /// growth, and scheduled replies.
    ///
    /// Large time jumps fire each elapsed periodic interval once, in order.
    pub fn tick(&mut self, now: E::Instant) -> Vec<UiAction> {
        let mut actions = Vec::new();

        if self.connect_due.is_some_and(|due| due <= now) {
            self.connect_due = None;
            self.state = ConnectionState::Connected;
            self.presence_due = Some(now + PRESENCE_TICK);
            self.arrival_due = Some(now + ARRIVAL_TICK);

            tracing::debug!("connected");
            actions.push(UiAction::SetConnectionLabel("Connected".to_string()));
            actions.extend(self.system("Connection established. You are online."));
            actions.push(UiAction::SetOnlineCount(self.roster.online_count()));
        }

        while let Some(due) = self.presence_due {
            if due > now {
                break;
            }
            self.presence_due = Some(due + PRESENCE_TICK);
            actions.extend(self.churn_presence());
        }

        while let Some(due) = self.arrival_due {
            if due > now {
                break;
            }
            self.arrival_due = Some(due + ARRIVAL_TICK);
            actions.extend(self.simulate_arrival());
        }

        if self.reply_due.iter().any(|due| *due <= now) {
            let (mut due, waiting): (Vec<_>, Vec<_>) =
                std::mem::take(&mut self.reply_due).into_iter().partition(|due| *due <= now);
            self.reply_due = waiting;
            due.sort_unstable();
            for _ in due {
                actions.extend(self.simulate_reply());
            }
        }

        actions
    }

    /// Append a system line to the timeline and return its render action.
    fn system(&mut self, text: &str) -> Vec<UiAction> {
        self.timeline.append_system(SystemLine {
            text: text.to_string(),
            at_millis: self.env.wall_clock_millis(),
        });
        vec![UiAction::AppendSystemMessage(text.to_string())]
    }

    /// One presence-churn round: maybe reassign one participant to online or
    /// away (never offline), announcing the change when it is an actual
    /// change.
    fn churn_presence(&mut self) -> Vec<UiAction> {
        if !self.env.chance(PRESENCE_CHURN_CHANCE) || self.roster.is_empty() {
            return Vec::new();
        }

        let picked = &self.roster.users()[self.env.random_index(self.roster.len())];
        let (id, name) = (picked.id, picked.display_name.clone());
        let next = if self.env.chance(0.5) { Presence::Online } else { Presence::Away };

        let previous = self.roster.set_presence(id, next);
        if previous == Some(next) {
            return Vec::new();
        }

        tracing::debug!(%name, presence = next.label(), "presence changed");
        let mut actions = vec![UiAction::RenderRoster(self.roster.users().to_vec())];
        actions.extend(self.system(&format!("{name} is now {}", next.label())));
        actions.push(UiAction::SetOnlineCount(self.roster.online_count()));
        actions
    }

    /// One roster-growth round: maybe synthesize a new participant from the
    /// fixed name pool, bounded by the roster cap.
    fn simulate_arrival(&mut self) -> Vec<UiAction> {
        if !self.env.chance(ARRIVAL_CHANCE) || self.roster.len() >= ROSTER_CAP {
            return Vec::new();
        }

        let name = ARRIVAL_POOL[self.env.random_index(ARRIVAL_POOL.len())];
        let user = User::new(ActorId(self.env.random_u64()), name, Presence::Online);
        if !self.roster.push(user) {
            return Vec::new();
        }

        tracing::debug!(%name, "participant arrived");
        let mut actions = vec![UiAction::RenderRoster(self.roster.users().to_vec())];
        actions.extend(self.system(&format!("{name} joined the chat")));
        actions.push(UiAction::SetOnlineCount(self.roster.online_count()));
        actions
    }

    /// One scheduled reply: usually suppressed, otherwise authored by a
    /// uniformly chosen bot that is currently online.
    fn simulate_reply(&mut self) -> Vec<UiAction> {
        if !self.env.chance(REPLY_CHANCE) {
            return Vec::new();
        }

        let bots: Vec<(ActorId, String)> = self
            .roster
            .users()
            .iter()
            .filter(|user| {
                BOT_NAMES.contains(&user.display_name.as_str()) && user.presence.is_online()
            })
            .map(|user| (user.id, user.display_name.clone()))
            .collect();
        if bots.is_empty() {
            return Vec::new();
        }

        let (author_id, author_name) = bots[self.env.random_index(bots.len())].clone();
        let text = REPLY_POOL[self.env.random_index(REPLY_POOL.len())];

        let message = Message {
            id: MessageId(self.env.random_u64()),
            author_id,
            author_name,
            text: text.to_string(),
            sent_at_millis: self.env.wall_clock_millis(),
        };
        self.timeline.append_message(message.clone());

        tracing::debug!(author = %message.author_name, "simulated reply");
        vec![
            UiAction::AppendMessage { message, own: false },
            UiAction::SetMessageCount(self.timeline.message_count()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StubEnv;

    fn engine() -> (StubEnv, ChatEngine<StubEnv>) {
        let env = StubEnv::new();
        let engine = ChatEngine::new(env.clone());
        (env, engine)
    }

    fn session() -> Session {
        Session {
            id: ActorId(99),
            email: "neo@matrix.io".to_string(),
            display_name: "neo".to_string(),
            created_at_millis: 0,
        }
    }

    fn connected() -> (StubEnv, ChatEngine<StubEnv>) {
        let (env, mut engine) = engine();
        let _ = engine.connect(env.now());
        env.advance(CONNECT_DELAY);
        let _ = engine.tick(env.now());
        (env, engine)
    }

    fn system_messages(actions: &[UiAction]) -> Vec<&str> {
        actions
            .iter()
            .filter_map(|action| match action {
                UiAction::AppendSystemMessage(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bootstrap_renders_seeded_state() {
        let (_, engine) = engine();
        let actions = engine.bootstrap();

        assert!(matches!(&actions[0], UiAction::RenderRoster(users) if users.len() == 5));
        let rendered_messages = actions
            .iter()
            .filter(|a| matches!(a, UiAction::AppendMessage { own: false, .. }))
            .count();
        assert_eq!(rendered_messages, 3);
        assert!(actions.contains(&UiAction::SetOnlineCount(3)));
        assert!(actions.contains(&UiAction::SetMessageCount(3)));
    }

    #[test]
    fn connect_transitions_after_the_fixed_delay() {
        let (env, mut engine) = engine();
        let actions = engine.connect(env.now());
        assert_eq!(engine.state(), ConnectionState::Connecting);
        assert_eq!(actions, [UiAction::SetConnectionLabel("Connecting...".to_string())]);

        env.advance(CONNECT_DELAY - Duration::from_millis(1));
        assert!(engine.tick(env.now()).is_empty());
        assert_eq!(engine.state(), ConnectionState::Connecting);

        env.advance(Duration::from_millis(1));
        let actions = engine.tick(env.now());
        assert_eq!(engine.state(), ConnectionState::Connected);
        assert_eq!(system_messages(&actions), ["Connection established. You are online."]);
        assert!(engine.timeline().has_system_containing("Connection established"));
    }

    #[test]
    fn connect_is_idempotent() {
        let (env, mut engine) = engine();
        let _ = engine.connect(env.now());
        assert!(engine.connect(env.now()).is_empty());

        env.advance(CONNECT_DELAY);
        // Churn and arrivals are not due yet; only the completion fires.
        let actions = engine.tick(env.now());
        assert_eq!(system_messages(&actions).len(), 1);

        // Connecting again while connected stays a no-op.
        assert!(engine.connect(env.now()).is_empty());
        assert!(engine.tick(env.now()).is_empty());
    }

    #[test]
    fn send_message_appends_exactly_one_own_message() {
        let (env, mut engine) = connected();
        let before = engine.timeline().message_count();

        let actions = engine.send_message(Some(&session()), "  hello matrix  ", env.now()).unwrap();

        assert_eq!(engine.timeline().message_count(), before + 1);
        let appended = engine.timeline().messages().last().unwrap();
        assert_eq!(appended.author_id, session().id);
        assert_eq!(appended.text, "hello matrix");
        assert!(actions.contains(&UiAction::SetMessageCount(before + 1)));
        assert!(
            actions.iter().any(|a| matches!(a, UiAction::AppendMessage { own: true, .. }))
        );
        assert_eq!(engine.reply_due.len(), 1);
    }

    #[test]
    fn send_message_rejects_blank_text_and_missing_session() {
        let (env, mut engine) = connected();
        let before = engine.timeline().message_count();

        assert_eq!(
            engine.send_message(Some(&session()), "   \t  ", env.now()),
            Err(SendError::EmptyText)
        );
        assert_eq!(
            engine.send_message(None, "hello", env.now()),
            Err(SendError::NotAuthenticated)
        );

        assert_eq!(engine.timeline().message_count(), before);
        assert!(engine.reply_due.is_empty());
    }

    #[test]
    fn replies_are_usually_suppressed() {
        let (env, mut engine) = connected();
        // Message id and reply delay draw from the fallback counter.
        let _ = engine.send_message(Some(&session()), "anyone there?", env.now()).unwrap();
        let before = engine.timeline().message_count();

        env.script_randoms([StubEnv::CHANCE_FAIL]); // suppress the reply
        env.advance(REPLY_DELAY_MAX);
        let actions = engine.tick(env.now());

        assert_eq!(engine.timeline().message_count(), before);
        assert!(!actions.iter().any(|a| matches!(a, UiAction::AppendMessage { .. })));
        assert!(engine.reply_due.is_empty());
    }

    #[test]
    fn reply_comes_from_an_online_bot() {
        let (env, mut engine) = connected();
        let _ = engine.send_message(Some(&session()), "hello?", env.now()).unwrap();
        let before = engine.timeline().message_count();

        // Reply draws: chance, bot index, text index, message id.
        env.script_randoms([StubEnv::CHANCE_PASS, 1, 0, 777]);
        env.advance(REPLY_DELAY_MAX);
        let actions = engine.tick(env.now());

        assert_eq!(engine.timeline().message_count(), before + 1);
        let reply = engine.timeline().messages().last().unwrap();
        assert_eq!(reply.author_name, "Trinity");
        assert_eq!(reply.text, "Interesting thought...");
        assert!(actions.contains(&UiAction::SetMessageCount(before + 1)));
    }

    #[test]
    fn reply_is_dropped_when_no_bot_is_online() {
        let (env, mut engine) = connected();
        for bot_id in [1, 2, 5] {
            let _ = engine.roster.set_presence(ActorId(bot_id), Presence::Away);
        }
        let _ = engine.send_message(Some(&session()), "echo?", env.now()).unwrap();
        let before = engine.timeline().message_count();

        env.script_randoms([StubEnv::CHANCE_PASS]);
        env.advance(REPLY_DELAY_MAX);
        let _ = engine.tick(env.now());

        assert_eq!(engine.timeline().message_count(), before);
    }

    #[test]
    fn presence_churn_announces_actual_changes() {
        let (env, mut engine) = connected();

        // Churn draws: gate chance, participant index, online-vs-away chance.
        // Index 3 is Cypher (offline), forced online.
        env.script_randoms([StubEnv::CHANCE_PASS, 3, StubEnv::CHANCE_PASS]);
        env.advance(PRESENCE_TICK);
        let actions = engine.tick(env.now());

        assert_eq!(system_messages(&actions), ["Cypher is now online"]);
        assert_eq!(
            engine.roster.get(ActorId(4)).map(|u| u.presence),
            Some(Presence::Online)
        );
        assert!(actions.iter().any(|a| matches!(a, UiAction::RenderRoster(_))));
        assert!(actions.contains(&UiAction::SetOnlineCount(4)));
    }

    #[test]
    fn presence_churn_is_silent_without_a_change() {
        let (env, mut engine) = connected();

        // Index 0 is Neo, already online; reassigning online is no change.
        env.script_randoms([StubEnv::CHANCE_PASS, 0, StubEnv::CHANCE_PASS]);
        env.advance(PRESENCE_TICK);
        let actions = engine.tick(env.now());

        assert!(system_messages(&actions).is_empty());
        assert!(!engine.timeline().has_system_containing("is now"));
    }

    #[test]
    fn arrivals_grow_the_roster_up_to_the_cap() {
        let (env, mut engine) = connected();

        // Presence churn fires first (suppressed), then the arrival round:
        // gate chance, name index 0 (Smith), id draw.
        env.script_randoms([
            StubEnv::CHANCE_FAIL,
            StubEnv::CHANCE_PASS,
            0,
            4242,
        ]);
        env.advance(ARRIVAL_TICK);
        let actions = engine.tick(env.now());

        assert_eq!(engine.roster().len(), 6);
        assert_eq!(system_messages(&actions), ["Smith joined the chat"]);

        // At the cap, a passing gate adds nobody.
        for id in 100..109 {
            let _ = engine.roster.push(User::new(ActorId(id), "Extra", Presence::Online));
        }
        assert_eq!(engine.roster().len(), ROSTER_CAP);

        env.script_randoms([StubEnv::CHANCE_FAIL, StubEnv::CHANCE_PASS]);
        env.advance(ARRIVAL_TICK);
        let _ = engine.tick(env.now());
        assert_eq!(engine.roster().len(), ROSTER_CAP);
    }

    #[test]
    fn disconnect_cancels_all_background_activity() {
        let (env, mut engine) = connected();
        let _ = engine.send_message(Some(&session()), "going dark", env.now()).unwrap();
        let before = engine.timeline().len();

        let actions = engine.disconnect();
        assert_eq!(engine.state(), ConnectionState::Disconnected);
        assert_eq!(actions, [UiAction::SetConnectionLabel("Offline".to_string())]);

        env.advance(Duration::from_secs(600));
        assert!(engine.tick(env.now()).is_empty());
        assert_eq!(engine.timeline().len(), before);

        // Disconnecting twice is a no-op.
        assert!(engine.disconnect().is_empty());
    }
}
