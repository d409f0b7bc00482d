//! Explicitly owned engine tying collections to their targets.
//!
//! One engine instance owns any number of independent collections, each
//! registered under a [`CollectionId`] together with the target its presets
//! write to. There is no global instance: callers construct an engine and
//! pass it where it is needed, and its lifetime bounds the lifetime of
//! everything it owns.
//!
//! Toggle requests against one collection are processed strictly in the
//! order submitted; collections never share state, so two engines (or two
//! collections in one engine) are independent.

use crate::arbiter::{self, Activation, ActivatePlan, ActiveSetDelta};
use crate::collection::StateCollection;
use crate::error::StateSetError;
use crate::target::PropertyStore;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a registered collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollectionId(String);

impl CollectionId {
    pub fn new(id: impl Into<String>) -> Self {
        CollectionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CollectionId {
    fn from(s: &str) -> Self {
        CollectionId(s.to_string())
    }
}

/// Observer of active-set changes.
///
/// `on_state_changing` fires before any value is written, so listeners can
/// snapshot transient values (spring positions, velocities) they will want
/// to restore after reapplication. `on_state_changed` fires after the
/// resolved values have been written to the target.
pub trait StateListener {
    fn on_state_changing(&mut self, id: &CollectionId, pending: &ActiveSetDelta) {
        let _ = (id, pending);
    }

    fn on_state_changed(&mut self, id: &CollectionId, applied: &ActiveSetDelta) {
        let _ = (id, applied);
    }
}

struct Slot {
    collection: StateCollection,
    target: Box<dyn PropertyStore>,
}

/// Owner of state collections and their targets.
#[derive(Default)]
pub struct StateEngine {
    slots: HashMap<CollectionId, Slot>,
    listeners: Vec<Box<dyn StateListener>>,
}

impl StateEngine {
    pub fn new() -> Self {
        StateEngine {
            slots: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a collection and the target its resolved values write to.
    /// Re-registering an id replaces the previous collection and target.
    pub fn register(
        &mut self,
        id: impl Into<CollectionId>,
        collection: StateCollection,
        target: Box<dyn PropertyStore>,
    ) {
        self.slots.insert(id.into(), Slot { collection, target });
    }

    /// Drop a collection, releasing its states, presets, and target.
    pub fn unregister(&mut self, id: &CollectionId) -> bool {
        self.slots.remove(id).is_some()
    }

    pub fn add_listener(&mut self, listener: Box<dyn StateListener>) {
        self.listeners.push(listener);
    }

    pub fn collection(&self, id: &CollectionId) -> Option<&StateCollection> {
        self.slots.get(id).map(|s| &s.collection)
    }

    /// Mutable access for edit operations (insert/remove/reorder/rename).
    pub fn collection_mut(&mut self, id: &CollectionId) -> Option<&mut StateCollection> {
        self.slots.get_mut(id).map(|s| &mut s.collection)
    }

    /// Resolve one property hash against a collection's current active set.
    pub fn resolve(&self, id: &CollectionId, hash: u64) -> Option<&Value> {
        self.slots
            .get(id)
            .and_then(|s| arbiter::resolve(&s.collection, hash))
    }

    /// Request activation of a named state, firing listener notifications
    /// around the value writes. Blocked activations change nothing and fire
    /// no notifications.
    pub fn request_activate(
        &mut self,
        id: &CollectionId,
        name: &str,
    ) -> Result<Activation, StateSetError> {
        let slot = self
            .slots
            .get_mut(id)
            .ok_or_else(|| StateSetError::UnknownCollection(id.to_string()))?;

        match arbiter::plan_activate(&slot.collection, name)? {
            ActivatePlan::Blocked { by } => Ok(Activation::Blocked { by }),
            ActivatePlan::Apply { index, delta } => {
                for listener in &mut self.listeners {
                    listener.on_state_changing(id, &delta);
                }
                arbiter::commit(&mut slot.collection, index, true, slot.target.as_mut());
                for listener in &mut self.listeners {
                    listener.on_state_changed(id, &delta);
                }
                Ok(Activation::Applied(delta))
            }
        }
    }

    /// Request deactivation of a named state. Never blocked; deactivating an
    /// already-inactive state changes nothing and fires no notifications.
    pub fn request_deactivate(
        &mut self,
        id: &CollectionId,
        name: &str,
    ) -> Result<ActiveSetDelta, StateSetError> {
        let slot = self
            .slots
            .get_mut(id)
            .ok_or_else(|| StateSetError::UnknownCollection(id.to_string()))?;

        let plan = arbiter::plan_deactivate(&slot.collection, name)?;
        if let Some(index) = plan.index {
            for listener in &mut self.listeners {
                listener.on_state_changing(id, &plan.delta);
            }
            arbiter::commit(&mut slot.collection, index, false, slot.target.as_mut());
            for listener in &mut self.listeners {
                listener.on_state_changed(id, &plan.delta);
            }
        }
        Ok(plan.delta)
    }
}
