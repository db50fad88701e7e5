mod common;

use modstore::mvi::{Intent, ModuleState, Reducer};
use modstore::{create_store, Action, ModuleInstance, StoreError, TransitionError};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
struct Counter {
    value: i64,
    #[serde(default)]
    history: Vec<i64>,
}

impl ModuleState for Counter {}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
enum CounterIntent {
    Increment,
    Add(i64),
    Reset,
}

impl Intent for CounterIntent {}

struct CounterReducer;

impl Reducer for CounterReducer {
    type State = Counter;
    type Intent = CounterIntent;

    fn reduce(mut state: Counter, intent: CounterIntent) -> Counter {
        match intent {
            CounterIntent::Increment => state.value += 1,
            CounterIntent::Add(amount) => state.value += amount,
            CounterIntent::Reset => return Counter::default(),
        }
        state.history.push(state.value);
        state
    }
}

fn counter(partition_key: &str) -> ModuleInstance {
    ModuleInstance::from_default::<CounterReducer>(partition_key, "counter").unwrap()
}

#[test]
fn typed_reducer_runs_through_dispatch() {
    common::init_tracing();
    let store = create_store(vec![counter("stats")]);

    store
        .dispatch(Action::new("stats", "counter", "increment"))
        .unwrap();
    store
        .dispatch(Action::new("stats", "counter", "add").with_payload(json!(5)))
        .unwrap();

    assert_eq!(
        common::module_value(&store.get_state().unwrap(), "stats", "counter"),
        Some(json!({"value": 6, "history": [1, 6]}))
    );
}

#[test]
fn typed_state_seeds_the_initial_value() {
    let start = Counter {
        value: 10,
        history: vec![],
    };
    let store = create_store(vec![ModuleInstance::from_reducer::<CounterReducer>(
        "stats", "counter", start,
    )
    .unwrap()]);

    store
        .dispatch(Action::new("stats", "counter", "reset"))
        .unwrap();

    assert_eq!(
        common::module_value(&store.get_state().unwrap(), "stats", "counter"),
        Some(json!({"value": 0, "history": []}))
    );
}

#[test]
fn unknown_intent_fails_without_touching_state() {
    let store = create_store(vec![counter("stats")]);
    let before = store.get_state().unwrap();

    let err = store
        .dispatch(Action::new("stats", "counter", "multiply"))
        .unwrap_err();

    match err {
        StoreError::Transition { id, source } => {
            assert_eq!(id, "counter");
            assert!(matches!(source, TransitionError::Intent(_)));
        }
        other => panic!("Expected Transition error, got {other:?}"),
    }
    assert!(store.get_state().unwrap().ptr_eq(&before));
}

#[test]
fn state_that_no_longer_decodes_is_reported() {
    let raw = ModuleInstance::new("stats", "raw", json!({"value": "many"}), |_, _| {});
    let typed = counter("stats").with_initial_state(json!({"value": "many"}));
    let store = create_store(vec![raw, typed.in_partition("broken")]);

    let err = store
        .dispatch(Action::new("broken", "counter", "increment"))
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Transition {
            source: TransitionError::State(_),
            ..
        }
    ));
}

#[test]
fn typed_and_raw_modules_share_a_partition() {
    let raw = ModuleInstance::new("stats", "log", json!([]), |state, action| {
        if let Some(entries) = state.as_array_mut() {
            entries.push(json!(action.kind));
        }
    });
    let store = create_store(vec![counter("stats"), raw]);

    store
        .dispatch(Action::new("stats", "counter", "increment"))
        .unwrap();
    store
        .dispatch(Action::new("stats", "log", "increment"))
        .unwrap();

    assert_eq!(
        store.get_state().unwrap().to_value(),
        json!({"stats": {
            "counter": {"value": 1, "history": [1]},
            "log": ["increment"],
        }})
    );
}
