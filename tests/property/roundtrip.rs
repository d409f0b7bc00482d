use proptest::prelude::*;
use serde_json::json;
use stateset::preset::{Preset, property_hash};
use stateset::{CollectionDoc, Document, EntryDoc, PresetDoc, StateDoc, parse, serialize};

fn arb_state_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Crouch", "Run", "Zoom", "Swim", "Climb", "Prone"])
        .prop_map(str::to_owned)
}

fn arb_entry() -> impl Strategy<Value = EntryDoc> {
    (
        prop::sample::select(vec!["f32", "bool", "i64"]),
        prop::sample::select(vec!["height", "speed", "health", "stamina"]),
        -1000..1000i64,
    )
        .prop_map(|(type_name, property, value)| EntryDoc {
            type_name: type_name.to_owned(),
            property: property.to_owned(),
            value: json!(value),
        })
}

fn arb_preset_doc() -> impl Strategy<Value = PresetDoc> {
    proptest::collection::vec(arb_entry(), 0..4).prop_map(|mut values| {
        // Keep entries identity-unique so build() cannot trip on
        // duplicate property hashes.
        values.sort_by(|a, b| (&a.type_name, &a.property).cmp(&(&b.type_name, &b.property)));
        values.dedup_by(|a, b| a.type_name == b.type_name && a.property == b.property);
        PresetDoc {
            object: "Controller.Movement".to_owned(),
            values,
        }
    })
}

fn arb_state_doc(name: String) -> impl Strategy<Value = StateDoc> {
    (
        proptest::collection::vec(arb_state_name(), 0..3),
        proptest::option::of(arb_preset_doc()),
    )
        .prop_map(move |(blocks, preset)| StateDoc {
            name: name.clone(),
            blocks,
            preset,
        })
}

fn arb_document() -> impl Strategy<Value = Document> {
    proptest::collection::vec(arb_state_name(), 0..4)
        .prop_map(|mut names| {
            names.sort();
            names.dedup();
            names
        })
        .prop_flat_map(|names| {
            let states: Vec<_> = names
                .into_iter()
                .chain(std::iter::once("Default".to_owned()))
                .map(arb_state_doc)
                .collect();
            states
        })
        .prop_map(|states| Document {
            stateset: "0.1".to_owned(),
            collections: vec![CollectionDoc {
                id: "movement".to_owned(),
                states,
            }],
        })
}

fn to_json(doc: &Document) -> serde_json::Value {
    serde_json::to_value(doc).unwrap()
}

proptest! {
    #[test]
    fn serialize_then_parse_preserves_the_document(doc in arb_document()) {
        let yaml = serialize(&doc).unwrap();
        let reparsed = parse(&yaml).unwrap();
        prop_assert_eq!(to_json(&doc), to_json(&reparsed));
    }

    #[test]
    fn build_then_from_collection_preserves_states(doc in arb_document()) {
        let built = doc.build().unwrap();
        let reserialized: Vec<CollectionDoc> = built
            .iter()
            .map(|(id, collection)| CollectionDoc::from_collection(id, collection))
            .collect();
        let round = Document {
            stateset: doc.stateset.clone(),
            collections: reserialized,
        };
        prop_assert_eq!(to_json(&doc), to_json(&round));
    }

    #[test]
    fn preset_add_then_remove_restores_membership(
        entries in proptest::collection::vec(arb_entry(), 1..6),
    ) {
        let mut preset = Preset::new("Controller.Movement");
        let mut added = Vec::new();
        for entry in &entries {
            let hash = property_hash(&entry.type_name, &entry.property);
            if preset
                .add_property(&entry.type_name, &entry.property, entry.value.clone())
                .is_ok()
            {
                added.push(hash);
            }
        }
        for hash in &added {
            prop_assert!(preset.contains(*hash));
        }
        for hash in &added {
            prop_assert!(preset.remove_property(*hash));
        }
        prop_assert!(preset.is_empty());
    }
}
