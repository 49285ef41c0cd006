//! End-to-end chat engine scenarios over the deterministic harness.

use std::time::Duration;

use mirage_app::{CONNECT_DELAY, ConnectionState, SIMULATED_LATENCY, Severity, UiAction};
use mirage_core::ROSTER_CAP;
use mirage_harness::Sim;
use proptest::prelude::ProptestConfig;

fn connected_sim(seed: u64) -> Sim {
    let mut sim = Sim::new(seed);
    sim.login("neo@matrix.io", "pw");
    sim.advance(SIMULATED_LATENCY);
    sim.advance(CONNECT_DELAY);
    assert_eq!(sim.engine().state(), ConnectionState::Connected);
    sim
}

#[test]
fn connect_twice_yields_one_transition_and_one_announcement() {
    let mut sim = Sim::new(20);
    sim.connect();
    sim.connect();
    sim.advance(CONNECT_DELAY);

    assert_eq!(sim.presenter().connection_labels(), ["Connecting...", "Connected"]);
    let announcements = sim
        .presenter()
        .system_messages()
        .iter()
        .filter(|text| text.contains("Connection established"))
        .count();
    assert_eq!(announcements, 1);
}

#[test]
fn send_message_appends_one_message_and_bumps_the_counter() {
    let mut sim = connected_sim(21);
    let before = sim.engine().timeline().message_count();
    sim.take_actions();

    sim.send("  there is no spoon  ");

    assert_eq!(sim.engine().timeline().message_count(), before + 1);
    let session_id = sim.controller().session().map(|s| s.id).unwrap();
    let committed = sim.engine().timeline().messages().last().cloned().unwrap();
    assert_eq!(committed.author_id, session_id);
    assert_eq!(committed.text, "there is no spoon");

    assert_eq!(sim.presenter().last_message_count(), Some(before + 1));
    assert_eq!(
        sim.presenter().count_matching(|a| matches!(a, UiAction::AppendMessage { own: true, .. })),
        1
    );
}

#[test]
fn whitespace_only_text_is_rejected_observably() {
    let mut sim = connected_sim(22);
    let before = sim.engine().timeline().message_count();
    sim.take_actions();

    sim.send("   \t   ");

    assert_eq!(sim.engine().timeline().message_count(), before);
    assert_eq!(sim.presenter().last_message_count(), None);
    assert!(
        sim.presenter()
            .notifications()
            .iter()
            .any(|(_, severity)| *severity == Severity::Error)
    );
}

#[test]
fn anonymous_sends_are_rejected_observably() {
    let mut sim = Sim::new(23);
    let before = sim.engine().timeline().message_count();
    sim.take_actions();

    sim.send("knock knock");

    assert_eq!(sim.engine().timeline().message_count(), before);
    assert_eq!(sim.presenter().notifications(), [("not signed in", Severity::Error)]);
}

#[test]
fn roster_never_exceeds_the_cap_and_eventually_reaches_it() {
    let mut sim = connected_sim(24);

    let step = Duration::from_secs(5);
    for _ in 0..1440 {
        sim.advance(step);
        assert!(sim.engine().roster().len() <= ROSTER_CAP);
    }
    // Two simulated hours of growth ticks saturate the roster.
    assert_eq!(sim.engine().roster().len(), ROSTER_CAP);
}

#[test]
fn presence_churn_announces_changes_and_never_goes_offline() {
    let mut sim = connected_sim(25);
    sim.run_for(Duration::from_secs(600), Duration::from_secs(5));

    let churn_lines: Vec<&str> = sim
        .presenter()
        .system_messages()
        .iter()
        .copied()
        .filter(|text| text.contains(" is now "))
        .collect();
    assert!(!churn_lines.is_empty());
    for line in churn_lines {
        assert!(line.ends_with(" is now online") || line.ends_with(" is now away"));
    }
}

#[test]
fn replies_come_only_from_online_bots() {
    let mut sim = connected_sim(26);
    sim.take_actions();

    for i in 0..40 {
        sim.send(&format!("ping {i}"));
        sim.advance(Duration::from_secs(5));
    }
    sim.advance(Duration::from_secs(10));

    let replies: Vec<String> = sim
        .presenter()
        .actions()
        .iter()
        .filter_map(|action| match action {
            UiAction::AppendMessage { message, own: false } => {
                Some(message.author_name.clone())
            },
            _ => None,
        })
        .collect();
    assert!(!replies.is_empty());
    for author in replies {
        assert!(["Neo", "Trinity", "Oracle"].contains(&author.as_str()));
    }
}

#[test]
fn disconnect_stops_all_background_activity() {
    let mut sim = connected_sim(27);
    sim.send("going dark");
    sim.disconnect();
    assert_eq!(sim.engine().state(), ConnectionState::Disconnected);

    let timeline_len = sim.engine().timeline().len();
    sim.take_actions();
    sim.run_for(Duration::from_secs(600), Duration::from_secs(5));

    assert!(sim.presenter().actions().is_empty());
    assert_eq!(sim.engine().timeline().len(), timeline_len);
}

proptest::proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn roster_cap_holds_for_any_seed(seed in 0u64..1_000) {
        let mut sim = connected_sim(seed);
        sim.run_for(Duration::from_secs(900), Duration::from_secs(15));
        proptest::prop_assert!(sim.engine().roster().len() <= ROSTER_CAP);
    }
}
