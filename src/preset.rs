//! Preset store: keyed bags of property-value overrides for one target schema.
//!
//! Each entry is keyed by a 64-bit hash combining the declaring type name and
//! the property name. Entries remember both strings so a coincidental hash
//! collision between two different properties can be told apart from a
//! genuine duplicate add.

use crate::error::{EditError, EditErrorKind, IntegrityFault, StateSetError};
use crate::target::{Describable, PropertyStore};
use serde_json::Value;

// ─── Property hashing ───────────────────────────────────────────────────────

const FNV_OFFSET: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

fn fnv1a32(input: &str) -> u32 {
    let mut hash = FNV_OFFSET;
    for byte in input.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Stable key for a `(type_name, property_name)` pair: type hash in the high
/// 32 bits, name hash in the low 32.
pub fn property_hash(type_name: &str, name: &str) -> u64 {
    ((fnv1a32(type_name) as u64) << 32) | fnv1a32(name) as u64
}

/// Derived key for the `index`-th element of a composite (list) property.
pub fn element_hash(parent: u64, index: usize) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in parent
        .to_le_bytes()
        .into_iter()
        .chain((index as u64).to_le_bytes())
    {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    // High bits carry the parent so element keys stay clustered per property.
    ((parent.rotate_left(16) & 0xffff_ffff_0000_0000) | hash as u64) | 1
}

// ─── Preset ─────────────────────────────────────────────────────────────────

/// A single tracked property override.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetEntry {
    pub hash: u64,
    pub type_name: String,
    pub name: String,
    /// Set for auxiliary element entries of a composite property.
    pub parent: Option<u64>,
    pub value: Value,
}

/// An ordered, duplicate-free bag of property overrides targeting one schema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Preset {
    object_type_name: String,
    entries: Vec<PresetEntry>,
}

impl Preset {
    pub fn new(object_type_name: impl Into<String>) -> Self {
        Preset {
            object_type_name: object_type_name.into(),
            entries: Vec::new(),
        }
    }

    pub fn object_type_name(&self) -> &str {
        &self.object_type_name
    }

    pub fn entries(&self) -> &[PresetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.entries.iter().any(|e| e.hash == hash)
    }

    /// Track a property override. Returns the entry's hash.
    ///
    /// Re-adding the exact same property is a recoverable
    /// [`EditErrorKind::DuplicateProperty`]. Two *different* properties
    /// hashing identically is an [`IntegrityFault`]: the preset data can no
    /// longer be keyed unambiguously, so the add aborts with no mutation.
    pub fn add_property(
        &mut self,
        type_name: &str,
        name: &str,
        value: Value,
    ) -> Result<u64, StateSetError> {
        let hash = property_hash(type_name, name);
        if let Some(existing) = self.entries.iter().find(|e| e.hash == hash) {
            if existing.type_name == type_name && existing.name == name {
                return Err(EditError::new(
                    EditErrorKind::DuplicateProperty,
                    format!("preset already tracks {}.{}", type_name, name),
                )
                .into());
            }
            return Err(IntegrityFault {
                hash,
                existing: (existing.type_name.clone(), existing.name.clone()),
                incoming: (type_name.to_string(), name.to_string()),
            }
            .into());
        }

        self.entries.push(PresetEntry {
            hash,
            type_name: type_name.to_string(),
            name: name.to_string(),
            parent: None,
            value,
        });
        Ok(hash)
    }

    /// Track an auxiliary entry for one element of a composite property.
    ///
    /// The parent property must already be tracked; element entries are
    /// removed together with it.
    pub fn add_element(
        &mut self,
        parent: u64,
        index: usize,
        value: Value,
    ) -> Result<u64, StateSetError> {
        let parent_entry = self
            .entries
            .iter()
            .find(|e| e.hash == parent && e.parent.is_none())
            .ok_or_else(|| {
                EditError::new(
                    EditErrorKind::OutOfRange,
                    format!("no composite property with hash {:#018x}", parent),
                )
            })?;

        let hash = element_hash(parent, index);
        let type_name = parent_entry.type_name.clone();
        let name = format!("{}[{}]", parent_entry.name, index);
        if self.entries.iter().any(|e| e.hash == hash) {
            return Err(EditError::new(
                EditErrorKind::DuplicateProperty,
                format!("preset already tracks {}.{}", type_name, name),
            )
            .into());
        }

        self.entries.push(PresetEntry {
            hash,
            type_name,
            name,
            parent: Some(parent),
            value,
        });
        Ok(hash)
    }

    /// Remove an entry and, for composite properties, every element entry
    /// tracked under it. Absent hashes are a no-op; returns whether anything
    /// was removed.
    pub fn remove_property(&mut self, hash: u64) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.hash != hash && e.parent != Some(hash));
        before != self.entries.len()
    }

    pub fn get_value(&self, hash: u64) -> Option<&Value> {
        self.entry(hash).map(|e| &e.value)
    }

    pub fn entry(&self, hash: u64) -> Option<&PresetEntry> {
        self.entries.iter().find(|e| e.hash == hash)
    }

    /// Snapshot every declared property of a live target into a new preset.
    pub fn snapshot<T>(target: &T) -> Result<Preset, StateSetError>
    where
        T: Describable + PropertyStore + ?Sized,
    {
        let mut preset = Preset::new(target.object_type_name());
        for descriptor in target.properties() {
            let value = target
                .get(&descriptor.type_name, &descriptor.name)
                .unwrap_or(Value::Null);
            preset.add_property(&descriptor.type_name, &descriptor.name, value)?;
        }
        Ok(preset)
    }
}
