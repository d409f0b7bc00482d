//! States and the ordered collections that own them.
//!
//! A collection is an ordered stack of named states, highest priority first,
//! whose last element is always the `Default` state: the mandatory baseline
//! that resolution falls back to. Every edit operation preserves that
//! invariant or fails without mutating anything.

use crate::error::{EditError, EditErrorKind};
use crate::preset::Preset;

/// Fixed name of the mandatory baseline state.
pub const DEFAULT_STATE_NAME: &str = "Default";

/// A named, orderable override unit referencing a preset and a block list.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    name: String,
    preset: Option<Preset>,
    active: bool,
    block_list: Vec<String>,
}

impl State {
    pub fn new(name: impl Into<String>, preset: Option<Preset>) -> Self {
        State {
            name: name.into(),
            preset,
            active: false,
            block_list: Vec::new(),
        }
    }

    /// Add block-list entries at construction time.
    pub fn with_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_list.extend(blocks.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preset(&self) -> Option<&Preset> {
        self.preset.as_ref()
    }

    pub fn preset_mut(&mut self) -> Option<&mut Preset> {
        self.preset.as_mut()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn block_list(&self) -> &[String] {
        &self.block_list
    }

    pub fn blocks(&self, name: &str) -> bool {
        self.block_list.iter().any(|n| n == name)
    }

    /// Scope key for name-uniqueness checks: states compare against siblings
    /// whose presets target the same schema.
    fn type_scope(&self) -> &str {
        self.preset.as_ref().map_or("", |p| p.object_type_name())
    }
}

/// The ordered stack of states belonging to one stateful object.
#[derive(Clone, Debug, PartialEq)]
pub struct StateCollection {
    states: Vec<State>,
}

impl StateCollection {
    /// Create a collection holding only the `Default` state.
    pub fn new(default_preset: Option<Preset>) -> Self {
        let mut default = State::new(DEFAULT_STATE_NAME, default_preset);
        // The baseline is the resolution floor; it is always active and is
        // never toggled through the public API.
        default.active = true;
        StateCollection {
            states: vec![default],
        }
    }

    /// Build a collection from pre-ordered states. The last state must be
    /// named `Default` and no other state may carry that name.
    pub fn from_states(mut states: Vec<State>) -> Result<Self, EditError> {
        match states.last() {
            Some(last) if last.name == DEFAULT_STATE_NAME => {}
            _ => {
                return Err(EditError::new(
                    EditErrorKind::InvalidName,
                    "the last state of a collection must be named 'Default'",
                ));
            }
        }
        let last = states.len() - 1;
        for (i, state) in states.iter().enumerate() {
            if i != last && state.name == DEFAULT_STATE_NAME {
                return Err(EditError::new(
                    EditErrorKind::DuplicateName,
                    "only the last state may be named 'Default'",
                ));
            }
            if state.name.is_empty() {
                return Err(EditError::new(
                    EditErrorKind::InvalidName,
                    "state names must be non-empty",
                ));
            }
        }
        for i in 0..last {
            let scope = states[i].type_scope().to_string();
            if states[i + 1..last]
                .iter()
                .any(|s| s.name == states[i].name && s.type_scope() == scope)
            {
                return Err(EditError::new(
                    EditErrorKind::DuplicateName,
                    format!("duplicate state name '{}'", states[i].name),
                ));
            }
        }
        states[last].active = true;
        Ok(StateCollection { states })
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        // A well-formed collection always holds at least the Default state.
        false
    }

    /// True iff the state at `index` is the collection's Default.
    pub fn is_default(&self, index: usize) -> bool {
        index + 1 == self.states.len()
    }

    pub fn default_state(&self) -> &State {
        self.states.last().unwrap_or_else(|| unreachable!())
    }

    /// Index of the first (highest-priority) state with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name == name)
    }

    /// Names of all states currently in the active set, priority order.
    pub fn active_names(&self) -> Vec<String> {
        self.states
            .iter()
            .filter(|s| s.active)
            .map(|s| s.name.clone())
            .collect()
    }

    pub(crate) fn states_mut(&mut self) -> &mut [State] {
        &mut self.states
    }

    /// Mutable access to one state, for in-place preset edits. Name, order
    /// and activity stay under the collection's control.
    pub fn state_mut(&mut self, index: usize) -> Option<&mut State> {
        self.states.get_mut(index)
    }

    // ─── Edit operations ────────────────────────────────────────────────────

    /// Insert a new state at index 0 (highest priority).
    ///
    /// The name must be unique, case sensitively, among siblings whose
    /// presets target the same schema. No auto-renaming: a colliding name is
    /// the caller's problem to disambiguate.
    pub fn insert(&mut self, name: &str, preset: Option<Preset>) -> Result<usize, EditError> {
        self.insert_state(State::new(name, preset))
    }

    /// Insert a pre-built state (e.g. one carrying a block list) at index 0.
    pub fn insert_state(&mut self, state: State) -> Result<usize, EditError> {
        if state.name.is_empty() {
            return Err(EditError::new(
                EditErrorKind::InvalidName,
                "state names must be non-empty",
            ));
        }
        if state.name == DEFAULT_STATE_NAME {
            return Err(EditError::new(
                EditErrorKind::InvalidName,
                "'Default' is reserved for the baseline state",
            ));
        }
        let scope = state.type_scope();
        if self
            .states
            .iter()
            .any(|s| s.name == state.name && s.type_scope() == scope)
        {
            return Err(EditError::new(
                EditErrorKind::DuplicateName,
                format!("a state named '{}' already exists", state.name),
            ));
        }
        self.states.insert(0, state);
        Ok(0)
    }

    /// Remove the state at `index`, scrubbing its name from every remaining
    /// block list so no dangling references survive. Dropping the state also
    /// releases its preset.
    pub fn remove(&mut self, index: usize) -> Result<State, EditError> {
        if index >= self.states.len() {
            return Err(EditError::new(
                EditErrorKind::OutOfRange,
                format!("index {} out of range", index),
            ));
        }
        if self.is_default(index) {
            return Err(EditError::new(
                EditErrorKind::CannotRemoveDefault,
                "the Default state cannot be removed",
            ));
        }
        let removed = self.states.remove(index);
        for state in &mut self.states {
            state.block_list.retain(|n| n != &removed.name);
        }
        Ok(removed)
    }

    /// Move the state at `from` to position `to`. Whatever the move did, the
    /// Default state is forced back to the last position afterwards.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        let len = self.states.len();
        if from >= len || to >= len {
            return Err(EditError::new(
                EditErrorKind::OutOfRange,
                format!("reorder {} -> {} out of range", from, to),
            ));
        }
        let state = self.states.remove(from);
        self.states.insert(to, state);

        // Enforced unconditionally, not merely checked.
        if let Some(default_index) = self.states.iter().position(|s| s.name == DEFAULT_STATE_NAME)
        {
            let last = self.states.len() - 1;
            if default_index != last {
                self.states.swap(default_index, last);
            }
        }
        Ok(())
    }

    /// Rename the state at `index`, rewriting every sibling block list that
    /// referenced the old name.
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<(), EditError> {
        if index >= self.states.len() {
            return Err(EditError::new(
                EditErrorKind::OutOfRange,
                format!("index {} out of range", index),
            ));
        }
        if self.is_default(index) {
            return Err(EditError::new(
                EditErrorKind::CannotRemoveDefault,
                "the Default state cannot be renamed",
            ));
        }
        if new_name.is_empty() {
            return Err(EditError::new(
                EditErrorKind::InvalidName,
                "state names must be non-empty",
            ));
        }
        if new_name == DEFAULT_STATE_NAME {
            return Err(EditError::new(
                EditErrorKind::InvalidName,
                "'Default' is reserved for the baseline state",
            ));
        }
        let scope = self.states[index].type_scope().to_string();
        if self
            .states
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.name == new_name && s.type_scope() == scope)
        {
            return Err(EditError::new(
                EditErrorKind::DuplicateName,
                format!("a state named '{}' already exists", new_name),
            ));
        }

        let old_name = std::mem::replace(&mut self.states[index].name, new_name.to_string());
        // Every block list is rewritten, the renamed state's own included,
        // so a self-blocking entry cannot dangle.
        for state in &mut self.states {
            for entry in &mut state.block_list {
                if *entry == old_name {
                    *entry = new_name.to_string();
                }
            }
        }
        Ok(())
    }
}
