//! Persisted document model.
//!
//! A document is the serialized form of one or more state collections: for
//! each collection an ordered list of `(name, blocks, preset)` tuples whose
//! last entry is the Default state, and for each preset the target schema
//! name plus its tracked `(type, property, value)` entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::{State, StateCollection};
use crate::engine::CollectionId;
use crate::error::StateSetError;
use crate::preset::Preset;

/// The top-level container for a parsed stateset document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    pub stateset: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<CollectionDoc>,
}

/// One state collection: an id and its ordered states, Default last.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionDoc {
    pub id: String,
    #[serde(default)]
    pub states: Vec<StateDoc>,
}

/// One serialized state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDoc {
    pub name: String,
    /// Names of sibling states this state suppresses while active.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<PresetDoc>,
}

/// One serialized preset: the target schema and its tracked entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetDoc {
    /// Dotted type path of the target schema, e.g. `Controller.Movement`.
    pub object: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EntryDoc>,
}

/// One tracked property override.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryDoc {
    /// Type tag of the property, e.g. `f32` or `Engine.Vector3`.
    #[serde(rename = "type")]
    pub type_name: String,
    pub property: String,
    pub value: Value,
}

impl Document {
    /// Construct runtime collections from a document.
    ///
    /// The document should be validated first; this surfaces the same
    /// structural problems (missing Default, duplicate names, colliding
    /// property hashes) as hard errors rather than rule diagnostics.
    pub fn build(&self) -> Result<Vec<(CollectionId, StateCollection)>, StateSetError> {
        let mut collections = Vec::with_capacity(self.collections.len());
        for doc in &self.collections {
            let mut states = Vec::with_capacity(doc.states.len());
            for state_doc in &doc.states {
                let preset = state_doc
                    .preset
                    .as_ref()
                    .map(|p| p.build())
                    .transpose()?;
                states.push(
                    State::new(state_doc.name.clone(), preset)
                        .with_blocks(state_doc.blocks.iter().cloned()),
                );
            }
            let collection = StateCollection::from_states(states)?;
            collections.push((CollectionId::new(doc.id.clone()), collection));
        }
        Ok(collections)
    }
}

impl PresetDoc {
    fn build(&self) -> Result<Preset, StateSetError> {
        let mut preset = Preset::new(self.object.clone());
        for entry in &self.values {
            preset.add_property(&entry.type_name, &entry.property, entry.value.clone())?;
        }
        Ok(preset)
    }

    /// Serialize a runtime preset back to its document form.
    pub fn from_preset(preset: &Preset) -> Self {
        PresetDoc {
            object: preset.object_type_name().to_string(),
            values: preset
                .entries()
                .iter()
                .filter(|e| e.parent.is_none())
                .map(|e| EntryDoc {
                    type_name: e.type_name.clone(),
                    property: e.name.clone(),
                    value: e.value.clone(),
                })
                .collect(),
        }
    }
}

impl StateDoc {
    /// Serialize a runtime state back to its document form.
    pub fn from_state(state: &State) -> Self {
        StateDoc {
            name: state.name().to_string(),
            blocks: state.block_list().to_vec(),
            preset: state.preset().map(PresetDoc::from_preset),
        }
    }
}

impl CollectionDoc {
    /// Serialize a runtime collection back to its document form.
    pub fn from_collection(id: &CollectionId, collection: &StateCollection) -> Self {
        CollectionDoc {
            id: id.to_string(),
            states: collection.states().iter().map(StateDoc::from_state).collect(),
        }
    }
}
