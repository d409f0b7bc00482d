use proptest::prelude::*;
use stateset::collection::{DEFAULT_STATE_NAME, State, StateCollection};
use stateset::preset::Preset;

/// One randomly chosen edit operation. Indices are taken modulo the
/// collection length at application time so every op is attemptable.
#[derive(Clone, Debug)]
enum Edit {
    Insert { name: String, blocks: Vec<String> },
    Remove { index: usize },
    Reorder { from: usize, to: usize },
    Rename { index: usize, new_name: String },
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Crouch"),
        Just("Run"),
        Just("Zoom"),
        Just("Swim"),
        Just("Climb"),
        Just("Prone"),
    ]
    .prop_map(|s| s.to_string())
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (arb_name(), proptest::collection::vec(arb_name(), 0..3))
            .prop_map(|(name, blocks)| Edit::Insert { name, blocks }),
        (0..8usize).prop_map(|index| Edit::Remove { index }),
        (0..8usize, 0..8usize).prop_map(|(from, to)| Edit::Reorder { from, to }),
        (0..8usize, arb_name()).prop_map(|(index, new_name)| Edit::Rename { index, new_name }),
    ]
}

fn apply(collection: &mut StateCollection, edit: Edit) {
    let len = collection.len();
    // Failed edits are part of the exercise; only the invariants matter.
    match edit {
        Edit::Insert { name, blocks } => {
            let state = State::new(name, Some(Preset::new("Movement"))).with_blocks(blocks);
            let _ = collection.insert_state(state);
        }
        Edit::Remove { index } => {
            let _ = collection.remove(index % len);
        }
        Edit::Reorder { from, to } => {
            let _ = collection.reorder(from % len, to % len);
        }
        Edit::Rename { index, new_name } => {
            let _ = collection.rename(index % len, &new_name);
        }
    }
}

fn assert_invariants(collection: &StateCollection) {
    // Default is last, and exactly one state is the default.
    let last = collection.len() - 1;
    assert_eq!(collection.states()[last].name(), DEFAULT_STATE_NAME);
    let default_count = collection
        .states()
        .iter()
        .filter(|s| s.name() == DEFAULT_STATE_NAME)
        .count();
    assert_eq!(default_count, 1);
    assert!(collection.is_default(last));

    // No duplicate names within a preset type scope.
    for (i, a) in collection.states().iter().enumerate() {
        for b in collection.states().iter().skip(i + 1) {
            let same_scope = a.preset().map(|p| p.object_type_name())
                == b.preset().map(|p| p.object_type_name());
            assert!(
                !(a.name() == b.name() && same_scope),
                "duplicate name {} after edits",
                a.name()
            );
        }
    }
}

proptest! {
    #[test]
    fn default_stays_last_under_arbitrary_edits(edits in proptest::collection::vec(arb_edit(), 0..40)) {
        let mut collection = StateCollection::new(Some(Preset::new("Movement")));
        for edit in edits {
            apply(&mut collection, edit);
            assert_invariants(&collection);
        }
    }

    #[test]
    fn removed_names_never_dangle_in_block_lists(
        edits in proptest::collection::vec(arb_edit(), 0..40),
        victim in 0..8usize,
    ) {
        let mut collection = StateCollection::new(Some(Preset::new("Movement")));
        for edit in edits {
            apply(&mut collection, edit);
        }

        let index = victim % collection.len();
        if let Ok(removed) = collection.remove(index) {
            for state in collection.states() {
                prop_assert!(
                    !state.blocks(removed.name()),
                    "block list still references removed state {}",
                    removed.name()
                );
            }
        }
    }

    #[test]
    fn rename_moves_every_block_reference(
        edits in proptest::collection::vec(arb_edit(), 0..40),
        index in 0..8usize,
    ) {
        let mut collection = StateCollection::new(Some(Preset::new("Movement")));
        for edit in edits {
            apply(&mut collection, edit);
        }

        let index = index % collection.len();
        let old_name = collection.states()[index].name().to_string();
        if collection.rename(index, "Renamed").is_ok() {
            for state in collection.states() {
                prop_assert!(!state.blocks(&old_name));
            }
        }
    }
}
