//! Property-based tests for the transition engine.
//!
//! These tests use proptest to generate random state/action tables and
//! random action sequences, checking the machine against a simple model.

use futures::executor::block_on;
use parking_lot::Mutex;
use proptest::prelude::*;
use statewire::core::{EnterEvent, ExitEvent, MachineConfig, StateDefinition};
use statewire::emitter::handler;
use statewire::engine::notifier_name;
use statewire::{create_machine, MachineHandle, MachineOptions};
use std::sync::Arc;

const STATES: usize = 4;
const ACTIONS: usize = 3;

fn state(i: usize) -> String {
    format!("s{i}")
}

fn action(i: usize) -> String {
    format!("a{i}")
}

/// Table cell `[s * ACTIONS + a]` holds the target of action `a` in state `s`.
type Table = Vec<Option<usize>>;

prop_compose! {
    fn arbitrary_table()(cells in prop::collection::vec(prop::option::of(0..STATES), STATES * ACTIONS)) -> Table {
        cells
    }
}

fn build_config(table: &Table) -> MachineConfig {
    (0..STATES)
        .map(|s| {
            let def = (0..ACTIONS).fold(StateDefinition::new(), |def, a| {
                match table[s * ACTIONS + a] {
                    Some(target) => def.goto(action(a), state(target)),
                    None => def,
                }
            });
            (state(s), def)
        })
        .collect()
}

fn build_machine(table: &Table, initial: usize) -> MachineHandle {
    create_machine(build_config(table), MachineOptions::new(state(initial))).unwrap()
}

fn record_enters(machine: &MachineHandle) -> Arc<Mutex<Vec<EnterEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let log = events.clone();
    machine.on_enter(handler(move |event: EnterEvent| {
        let log = log.clone();
        async move {
            log.lock().push(event);
            Ok(())
        }
    }));
    events
}

fn count_exits(machine: &MachineHandle) -> Arc<Mutex<usize>> {
    let exits = Arc::new(Mutex::new(0));
    let counter = exits.clone();
    machine.on_exit(handler(move |_: ExitEvent| {
        let counter = counter.clone();
        async move {
            *counter.lock() += 1;
            Ok(())
        }
    }));
    exits
}

proptest! {
    #[test]
    fn machine_starts_in_initial_state(table in arbitrary_table(), initial in 0..STATES) {
        let machine = build_machine(&table, initial);
        prop_assert_eq!(machine.state(), state(initial));
    }

    #[test]
    fn every_distinct_action_and_state_gets_an_entry(table in arbitrary_table()) {
        let machine = build_machine(&table, 0);

        let declared: Vec<String> = (0..ACTIONS)
            .filter(|a| (0..STATES).any(|s| table[s * ACTIONS + a].is_some()))
            .map(action)
            .collect();
        let names: Vec<&str> = machine.actions().names().collect();
        prop_assert_eq!(names, declared.iter().map(String::as_str).collect::<Vec<_>>());

        for s in 0..STATES {
            prop_assert!(machine.notifier(&notifier_name(&state(s))).is_some());
        }
    }

    #[test]
    fn illegal_action_is_noop_with_one_exit(table in arbitrary_table(), initial in 0..STATES, a in 0..ACTIONS) {
        prop_assume!(table[initial * ACTIONS + a].is_none());
        let machine = build_machine(&table, initial);
        let exits = count_exits(&machine);
        let enters = record_enters(&machine);

        let result = block_on(machine.transition(&action(a), None)).unwrap();

        prop_assert_eq!(result, None);
        prop_assert_eq!(machine.state(), state(initial));
        prop_assert_eq!(*exits.lock(), 1);
        prop_assert!(enters.lock().is_empty());
    }

    #[test]
    fn random_walk_matches_model(
        table in arbitrary_table(),
        initial in 0..STATES,
        walk in prop::collection::vec(0..ACTIONS, 1..20)
    ) {
        let machine = build_machine(&table, initial);
        let enters = record_enters(&machine);
        let exits = count_exits(&machine);

        let mut expected = initial;
        let mut commits = Vec::new();
        for &a in &walk {
            let before = expected;
            let result = block_on(machine.transition(&action(a), None)).unwrap();

            match table[before * ACTIONS + a] {
                Some(target) => {
                    expected = target;
                    prop_assert_eq!(result, Some(state(target)));
                    commits.push((state(before), state(target)));
                }
                None => prop_assert_eq!(result, None),
            }
            prop_assert_eq!(machine.state(), state(expected));
        }

        let enters = enters.lock();
        prop_assert_eq!(enters.len(), commits.len());
        for (event, (last, current)) in enters.iter().zip(&commits) {
            prop_assert_eq!(&event.last, last);
            prop_assert_eq!(&event.current, current);
        }
        prop_assert_eq!(*exits.lock(), walk.len());
    }

    #[test]
    fn unsubscribed_handler_sees_no_later_events(
        table in arbitrary_table(),
        walk in prop::collection::vec(0..ACTIONS, 0..10),
        later in prop::collection::vec(0..ACTIONS, 1..10)
    ) {
        let machine = build_machine(&table, 0);
        let exits = Arc::new(Mutex::new(0));
        let counter = exits.clone();
        let subscription = machine.on_exit(handler(move |_: ExitEvent| {
            let counter = counter.clone();
            async move {
                *counter.lock() += 1;
                Ok(())
            }
        }));

        for &a in &walk {
            block_on(machine.transition(&action(a), None)).unwrap();
        }
        subscription.unsubscribe();
        subscription.unsubscribe();
        for &a in &later {
            block_on(machine.transition(&action(a), None)).unwrap();
        }

        prop_assert_eq!(*exits.lock(), walk.len());
    }
}
