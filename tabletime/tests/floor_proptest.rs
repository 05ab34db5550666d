/// Property-based tests for the floor state machine using proptest
///
/// Random intent sequences are fed to the dispatcher and the floor is
/// checked against its invariants after every step.
use proptest::prelude::*;
use tabletime::auth::{AdminCredentials, AuthRequest};
use tabletime::floor::{Floor, RECENT_CLEARED_CAPACITY, RecentCleared, TableId};
use tabletime::sync::{ClientEvent, Dispatcher, Reply, ServerEvent, TablePayload};

// Ids 0..=25 cover valid tables, the two gaps and out-of-range numbers
fn table_payload_strategy() -> impl Strategy<Value = TablePayload> {
    (
        prop::option::weighted(0.95, 0u32..=25),
        prop::option::of("[A-Za-z0-9 ()]{0,16}"),
    )
        .prop_map(|(id, table_identifier)| TablePayload {
            id,
            table_identifier,
        })
}

fn event_strategy() -> impl Strategy<Value = ClientEvent> {
    prop_oneof![
        4 => table_payload_strategy().prop_map(ClientEvent::StartTable),
        3 => table_payload_strategy().prop_map(ClientEvent::BillTable),
        4 => table_payload_strategy().prop_map(ClientEvent::ClearTable),
        1 => Just(ClientEvent::ResetAll),
        2 => table_payload_strategy().prop_map(ClientEvent::RemoveFromCleared),
        1 => "Table [0-9]{1,2} \\([0-9] pac\\)"
            .prop_map(|label| ClientEvent::RemoveClearedItem { label }),
        1 => ("[a-z]{0,6}", "[0-9]{0,5}").prop_map(|(username, password)| {
            ClientEvent::Authenticate(AuthRequest { username, password })
        }),
    ]
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Floor::standard(), AdminCredentials::default())
}

fn target(event: &ClientEvent) -> Option<Option<TableId>> {
    match event {
        ClientEvent::StartTable(p)
        | ClientEvent::BillTable(p)
        | ClientEvent::ClearTable(p)
        | ClientEvent::RemoveFromCleared(p) => Some(p.id),
        _ => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        max_global_rejects: 16_384,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_invariants_hold_for_any_sequence(
        events in prop::collection::vec(event_strategy(), 0..80)
    ) {
        let mut d = dispatcher();

        for (step, event) in events.into_iter().enumerate() {
            d.handle_at(event, step as i64);

            let floor = d.floor();
            prop_assert!(floor.recent.len() <= RECENT_CLEARED_CAPACITY);
            prop_assert_eq!(floor.store.len(), 20);
            for table in floor.store.iter() {
                let view = table.view();
                prop_assert!(!(view.billed && view.cleared));
                prop_assert_eq!(view.start.is_some(), view.billed || view.cleared);
            }
        }
    }

    #[test]
    fn test_unknown_ids_never_mutate(
        prefix in prop::collection::vec(event_strategy(), 0..30),
        event in event_strategy(),
    ) {
        let mut d = dispatcher();
        for (step, e) in prefix.into_iter().enumerate() {
            d.handle_at(e, step as i64);
        }

        let is_unknown = match target(&event) {
            Some(None) => true,
            Some(Some(id)) => !d.floor().store.contains(id),
            None => false,
        };
        prop_assume!(is_unknown);

        let before = d.floor().clone();
        let reply = d.handle_at(event, 1_000);
        prop_assert_eq!(reply, Reply::Direct(ServerEvent::error("invalid table id")));
        prop_assert_eq!(d.floor(), &before);
    }

    #[test]
    fn test_reset_all_is_idempotent(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let mut d = dispatcher();
        for (step, e) in events.into_iter().enumerate() {
            d.handle_at(e, step as i64);
        }

        d.handle_at(ClientEvent::ResetAll, 0);
        let once = d.floor().clone();
        d.handle_at(ClientEvent::ResetAll, 0);

        prop_assert_eq!(d.floor(), &once);
        prop_assert_eq!(d.floor(), &Floor::standard());
    }

    #[test]
    fn test_recent_keeps_newest_pushes(labels in prop::collection::vec("[a-z]{1,8}", 0..30)) {
        let mut recent = RecentCleared::new();
        for label in &labels {
            recent.push_front(label.clone());
        }

        let expected: Vec<String> = labels
            .iter()
            .rev()
            .take(RECENT_CLEARED_CAPACITY)
            .cloned()
            .collect();
        prop_assert_eq!(recent.to_vec(), expected);
    }

    #[test]
    fn test_remove_matching_removes_at_most_one(
        ids in prop::collection::vec(1u32..=22, 0..10),
        target in 1u32..=22,
    ) {
        let mut recent = RecentCleared::new();
        for id in &ids {
            recent.push_front(format!("Table {id} (4 pac)"));
        }

        let before = recent.len();
        let removed = recent.remove_matching(target);
        prop_assert_eq!(removed.is_some(), ids.contains(&target));
        prop_assert_eq!(recent.len(), before - usize::from(removed.is_some()));
    }
}
