//! Property tests for the change-fold.
//!
//! These check the fold against independent models: membership is decided by
//! the last change per key, and field values by the last change that
//! mentioned the field.

use proptest::prelude::*;
use ripple_engine::{ChangeType, DocumentChange, Fields, Mirror};
use serde_json::json;
use std::collections::{HashMap, HashSet};

fn fields(value: serde_json::Value) -> Fields {
    value.as_object().cloned().unwrap()
}

fn one_field(name: &str, value: i64) -> Fields {
    let mut fields = Fields::new();
    fields.insert(name.to_string(), serde_json::Value::from(value));
    fields
}

fn arb_change() -> impl Strategy<Value = DocumentChange> {
    let key = prop_oneof![Just("a"), Just("b"), Just("c"), Just("d"), Just("e")];
    let field = prop_oneof![Just("x"), Just("y"), Just("z")];

    (key, 0..3usize, field, any::<i64>()).prop_map(|(key, kind, field, value)| match kind {
        0 => DocumentChange::added(key, one_field(field, value)),
        1 => DocumentChange::modified(key, one_field(field, value)),
        _ => DocumentChange::removed(key),
    })
}

proptest! {
    /// Mirror membership equals {keys ever added or modified} minus {keys
    /// whose most recent change is removed}.
    #[test]
    fn key_set_follows_last_change(changes in prop::collection::vec(arb_change(), 0..60)) {
        let mut mirror = Mirror::new();
        // One change per batch: batching must not affect the final state.
        for change in &changes {
            mirror.apply_batch(std::slice::from_ref(change));
        }

        let mut last_change: HashMap<&str, ChangeType> = HashMap::new();
        for change in &changes {
            last_change.insert(change.key.as_str(), change.change_type);
        }
        let expected: HashSet<&str> = last_change
            .into_iter()
            .filter(|(_, ty)| *ty != ChangeType::Removed)
            .map(|(key, _)| key)
            .collect();

        let actual: HashSet<&str> = mirror.keys().map(String::as_str).collect();
        prop_assert_eq!(actual, expected);
    }

    /// For a live document, each field holds the value of the last change
    /// that mentioned it (partial updates never drop fields).
    #[test]
    fn fields_follow_last_mention(changes in prop::collection::vec(arb_change(), 0..60)) {
        let mut mirror = Mirror::new();
        mirror.apply_batch(&changes);

        // Model: per key, fields written since the last removal.
        let mut model: HashMap<String, Fields> = HashMap::new();
        for change in &changes {
            match change.change_type {
                ChangeType::Added | ChangeType::Modified => {
                    let entry = model.entry(change.key.clone()).or_default();
                    for (name, value) in &change.data {
                        entry.insert(name.clone(), value.clone());
                    }
                }
                ChangeType::Removed => {
                    model.remove(&change.key);
                }
            }
        }

        for (key, expected_fields) in &model {
            let doc = mirror.get(key).expect("model says key is live");
            prop_assert_eq!(&doc.fields, expected_fields);
        }
    }

    /// Folding the same sequence twice into fresh mirrors yields identical
    /// snapshots.
    #[test]
    fn fold_is_deterministic(changes in prop::collection::vec(arb_change(), 0..60)) {
        let mut first = Mirror::new();
        let mut second = Mirror::new();
        first.apply_batch(&changes);
        second.apply_batch(&changes);

        prop_assert_eq!(first.snapshot(), second.snapshot());
    }
}

#[test]
fn interleaved_partial_updates_accumulate() {
    let mut mirror = Mirror::new();
    mirror.apply_batch(&[DocumentChange::added("1", fields(json!({"a": 1})))]);
    mirror.apply_batch(&[DocumentChange::modified("1", fields(json!({"b": 2})))]);

    let doc = mirror.get("1").unwrap();
    assert_eq!(doc.get("a"), Some(&json!(1)));
    assert_eq!(doc.get("b"), Some(&json!(2)));
}
