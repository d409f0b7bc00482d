use proptest::prelude::*;
use serde_json::json;
use stateset::arbiter::{activate, apply_active, resolve};
use stateset::collection::{State, StateCollection};
use stateset::preset::{Preset, property_hash};
use stateset::target::{PropertyStore, ValueMapTarget};

const PROPERTIES: [&str; 4] = ["height", "speed", "health", "stamina"];

/// Per-state preset contents: for each property, whether this state's
/// preset defines it and with which integer value.
fn arb_preset_values() -> impl Strategy<Value = Vec<Option<i64>>> {
    proptest::collection::vec(proptest::option::of(0..1000i64), PROPERTIES.len())
}

fn build_preset(values: &[Option<i64>]) -> Preset {
    let mut preset = Preset::new("Movement");
    for (i, value) in values.iter().enumerate() {
        if let Some(v) = value {
            preset.add_property("i64", PROPERTIES[i], json!(v)).unwrap();
        }
    }
    preset
}

/// A collection of up to four block-free states plus Default, with random
/// per-state preset contents, and a subset of states to activate.
fn arb_collection() -> impl Strategy<Value = (StateCollection, Vec<bool>)> {
    (
        proptest::collection::vec(arb_preset_values(), 1..5),
        arb_preset_values(),
        proptest::collection::vec(any::<bool>(), 5),
    )
        .prop_map(|(state_values, default_values, toggles)| {
            let mut states: Vec<State> = state_values
                .iter()
                .enumerate()
                .map(|(i, values)| State::new(format!("S{}", i), Some(build_preset(values))))
                .collect();
            states.push(State::new("Default", Some(build_preset(&default_values))));
            let collection = StateCollection::from_states(states).unwrap();
            (collection, toggles)
        })
}

fn baseline_target() -> ValueMapTarget {
    let mut target = ValueMapTarget::new("Movement");
    for property in PROPERTIES {
        target = target.with("i64", property, json!(-1));
    }
    target
}

/// Reference semantics: first active state (priority order) whose preset
/// defines the property wins.
fn expected_value(collection: &StateCollection, property: &str) -> Option<serde_json::Value> {
    let hash = property_hash("i64", property);
    collection
        .states()
        .iter()
        .filter(|s| s.is_active())
        .find_map(|s| s.preset().and_then(|p| p.get_value(hash)).cloned())
}

proptest! {
    #[test]
    fn resolve_matches_first_active_preset_scan((collection, toggles) in arb_collection()) {
        let mut collection = collection;
        let mut target = baseline_target();
        for (i, on) in toggles.iter().enumerate() {
            if *on && i + 1 < collection.len() {
                let name = format!("S{}", i);
                activate(&mut collection, &name, &mut target).unwrap();
            }
        }

        for property in PROPERTIES {
            let hash = property_hash("i64", property);
            prop_assert_eq!(resolve(&collection, hash).cloned(), expected_value(&collection, property));
        }
    }

    #[test]
    fn resolution_is_idempotent((collection, toggles) in arb_collection()) {
        let mut collection = collection;
        let mut target = baseline_target();
        for (i, on) in toggles.iter().enumerate() {
            if *on && i + 1 < collection.len() {
                activate(&mut collection, &format!("S{}", i), &mut target).unwrap();
            }
        }

        let first: Vec<_> = PROPERTIES
            .iter()
            .map(|p| resolve(&collection, property_hash("i64", p)).cloned())
            .collect();
        let second: Vec<_> = PROPERTIES
            .iter()
            .map(|p| resolve(&collection, property_hash("i64", p)).cloned())
            .collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn reapplying_an_unchanged_active_set_changes_nothing((collection, toggles) in arb_collection()) {
        let mut collection = collection;
        let mut target = baseline_target();
        for (i, on) in toggles.iter().enumerate() {
            if *on && i + 1 < collection.len() {
                activate(&mut collection, &format!("S{}", i), &mut target).unwrap();
            }
        }

        let snapshot = target.clone();
        apply_active(&collection, &mut target);
        for property in PROPERTIES {
            prop_assert_eq!(target.get("i64", property), snapshot.get("i64", property));
        }
    }

    #[test]
    fn unresolved_properties_keep_the_baseline((collection, toggles) in arb_collection()) {
        let mut collection = collection;
        let mut target = baseline_target();
        for (i, on) in toggles.iter().enumerate() {
            if *on && i + 1 < collection.len() {
                activate(&mut collection, &format!("S{}", i), &mut target).unwrap();
            }
        }

        for property in PROPERTIES {
            if expected_value(&collection, property).is_none() {
                prop_assert_eq!(target.get("i64", property), Some(json!(-1)));
            }
        }
    }
}
