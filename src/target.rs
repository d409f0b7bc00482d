//! Target abstraction: the objects whose properties presets override.
//!
//! Targets declare their schema explicitly instead of being discovered by
//! reflection. A target implements [`Describable`] to enumerate its
//! properties and [`PropertyStore`] to read and write them.

use serde_json::Value;

/// A single property a target exposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Dotted type path of the declaring type, e.g. `Controller.Movement`.
    pub type_name: String,
    /// Property name within the declaring type.
    pub name: String,
}

impl PropertyDescriptor {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        PropertyDescriptor {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

/// Explicit schema declaration for a stateful target.
pub trait Describable {
    /// Identifier of the schema this target conforms to.
    fn object_type_name(&self) -> &str;

    /// Every property the state system may snapshot or override.
    fn properties(&self) -> Vec<PropertyDescriptor>;
}

/// Read/write access to a target's live property values.
///
/// Object-safe so the engine can hold heterogeneous targets behind
/// `Box<dyn PropertyStore>`.
pub trait PropertyStore {
    /// Current value, or `None` if the target does not carry the property.
    fn get(&self, type_name: &str, name: &str) -> Option<Value>;

    /// Write a resolved value. Unknown properties are ignored; arbitration
    /// only ever writes hashes that came from a preset snapshot, so an
    /// unknown property here means the target's schema shrank since the
    /// preset was taken.
    fn set(&mut self, type_name: &str, name: &str, value: Value);
}

/// Map-backed target keyed by `"TypeName.property"`, preserving insertion
/// order. Useful as a generic target and throughout the test suites.
#[derive(Clone, Debug, Default)]
pub struct ValueMapTarget {
    object_type_name: String,
    values: serde_json::Map<String, Value>,
}

impl ValueMapTarget {
    pub fn new(object_type_name: impl Into<String>) -> Self {
        ValueMapTarget {
            object_type_name: object_type_name.into(),
            values: serde_json::Map::new(),
        }
    }

    /// Insert or overwrite a property value.
    pub fn with(mut self, type_name: &str, name: &str, value: Value) -> Self {
        self.values.insert(Self::key(type_name, name), value);
        self
    }

    fn key(type_name: &str, name: &str) -> String {
        format!("{}.{}", type_name, name)
    }
}

impl Describable for ValueMapTarget {
    fn object_type_name(&self) -> &str {
        &self.object_type_name
    }

    fn properties(&self) -> Vec<PropertyDescriptor> {
        self.values
            .keys()
            .filter_map(|key| {
                // The property name is the final dotted segment; everything
                // before it is the declaring type path.
                let (type_name, name) = key.rsplit_once('.')?;
                Some(PropertyDescriptor::new(type_name, name))
            })
            .collect()
    }
}

impl PropertyStore for ValueMapTarget {
    fn get(&self, type_name: &str, name: &str) -> Option<Value> {
        self.values.get(&Self::key(type_name, name)).cloned()
    }

    fn set(&mut self, type_name: &str, name: &str, value: Value) {
        let key = Self::key(type_name, name);
        // Only overwrite properties the target declared; see trait docs.
        if self.values.contains_key(&key) {
            self.values.insert(key, value);
        }
    }
}
