//! Arbitration: which states end up active, and which values win.
//!
//! Block lists gate *transitions into* the active set only. A blocked
//! activation is a normal negative outcome, not an error, and an activation
//! never retroactively deactivates states that were already active — if B is
//! active and A (which blocks B) activates afterwards, both stay active and
//! reconciling that is the caller's business. Deactivation is never blocked.

use crate::collection::{DEFAULT_STATE_NAME, StateCollection};
use crate::error::{EditError, EditErrorKind, StateSetError};
use crate::target::PropertyStore;
use serde_json::Value;

/// Active-state snapshots around a toggle, in priority order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSetDelta {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

impl ActiveSetDelta {
    pub fn is_unchanged(&self) -> bool {
        self.before == self.after
    }
}

/// Outcome of an activation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// The state entered the active set and values were (re)applied.
    Applied(ActiveSetDelta),
    /// An already-active state's block list names the requested state.
    /// Nothing changed.
    Blocked { by: String },
}

/// A validated activation, computed without touching the collection so
/// callers can notify listeners before committing.
pub(crate) enum ActivatePlan {
    Blocked { by: String },
    Apply { index: usize, delta: ActiveSetDelta },
}

pub(crate) fn plan_activate(
    collection: &StateCollection,
    name: &str,
) -> Result<ActivatePlan, StateSetError> {
    let index = locate(collection, name)?;

    if let Some(blocker) = collection
        .states()
        .iter()
        .enumerate()
        .find(|(i, s)| *i != index && s.is_active() && s.blocks(name))
        .map(|(_, s)| s.name().to_string())
    {
        return Ok(ActivatePlan::Blocked { by: blocker });
    }

    let before = collection.active_names();
    let after = collection
        .states()
        .iter()
        .enumerate()
        .filter(|(i, s)| s.is_active() || *i == index)
        .map(|(_, s)| s.name().to_string())
        .collect();

    Ok(ActivatePlan::Apply {
        index,
        delta: ActiveSetDelta { before, after },
    })
}

/// A validated deactivation. `index` is `None` when the state was already
/// inactive and there is nothing to commit.
pub(crate) struct DeactivatePlan {
    pub(crate) index: Option<usize>,
    pub(crate) delta: ActiveSetDelta,
}

pub(crate) fn plan_deactivate(
    collection: &StateCollection,
    name: &str,
) -> Result<DeactivatePlan, StateSetError> {
    let index = locate(collection, name)?;

    let before = collection.active_names();
    if !collection.states()[index].is_active() {
        return Ok(DeactivatePlan {
            index: None,
            delta: ActiveSetDelta {
                after: before.clone(),
                before,
            },
        });
    }

    let after = collection
        .states()
        .iter()
        .enumerate()
        .filter(|(i, s)| s.is_active() && *i != index)
        .map(|(_, s)| s.name().to_string())
        .collect();
    Ok(DeactivatePlan {
        index: Some(index),
        delta: ActiveSetDelta { before, after },
    })
}

pub(crate) fn commit(
    collection: &mut StateCollection,
    index: usize,
    active: bool,
    target: &mut dyn PropertyStore,
) {
    collection.states_mut()[index].set_active(active);
    apply_active(collection, target);
}

/// Request activation of the named state.
///
/// Returns [`Activation::Blocked`] when another currently active state's
/// block list contains the name. On success the full active set is
/// re-resolved and written to `target`.
pub fn activate(
    collection: &mut StateCollection,
    name: &str,
    target: &mut dyn PropertyStore,
) -> Result<Activation, StateSetError> {
    match plan_activate(collection, name)? {
        ActivatePlan::Blocked { by } => Ok(Activation::Blocked { by }),
        ActivatePlan::Apply { index, delta } => {
            commit(collection, index, true, target);
            Ok(Activation::Applied(delta))
        }
    }
}

/// Request deactivation of the named state. Never blocked.
///
/// Deactivating an already-inactive state is a no-op with an unchanged
/// delta. Otherwise the full active set is re-resolved, which can reveal a
/// lower-priority state's value for properties the departing state owned.
pub fn deactivate(
    collection: &mut StateCollection,
    name: &str,
    target: &mut dyn PropertyStore,
) -> Result<ActiveSetDelta, StateSetError> {
    let plan = plan_deactivate(collection, name)?;
    if let Some(index) = plan.index {
        commit(collection, index, false, target);
    }
    Ok(plan.delta)
}

/// Resolve the effective value of one property hash against the current
/// active set: the highest-priority active state whose preset defines the
/// hash wins; `None` means no active preset defines it and the live target
/// value stands.
pub fn resolve(collection: &StateCollection, hash: u64) -> Option<&Value> {
    collection
        .states()
        .iter()
        .filter(|s| s.is_active())
        .find_map(|s| s.preset().and_then(|p| p.get_value(hash)))
}

/// Re-resolve and write every property appearing in any active state's
/// preset. Always a full recompute: deactivating a high-priority state must
/// reveal lower-priority values for the same properties, which an
/// incremental update of only the toggled state's preset would miss.
pub fn apply_active(collection: &StateCollection, target: &mut dyn PropertyStore) {
    let mut seen: Vec<u64> = Vec::new();
    for state in collection.states().iter().filter(|s| s.is_active()) {
        let Some(preset) = state.preset() else {
            continue;
        };
        for entry in preset.entries() {
            if seen.contains(&entry.hash) {
                continue;
            }
            seen.push(entry.hash);
            // States iterate in priority order, so the first preset that
            // defines a hash owns it for this pass.
            target.set(&entry.type_name, &entry.name, entry.value.clone());
        }
    }
}

fn locate(collection: &StateCollection, name: &str) -> Result<usize, StateSetError> {
    if name == DEFAULT_STATE_NAME {
        return Err(EditError::new(
            EditErrorKind::CannotToggleDefault,
            "the Default state is the resolution floor and cannot be toggled",
        )
        .into());
    }
    collection
        .index_of(name)
        .ok_or_else(|| StateSetError::UnknownState(name.to_string()))
}
