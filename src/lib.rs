//! Named-state preset arbitration.
//!
//! A stateful object carries an ordered stack of named states, highest
//! priority first. Each state references a preset (a keyed bag of property
//! overrides) and a block list of sibling names it suppresses while active.
//! The last state is always `Default`: the mandatory baseline that property
//! resolution falls back to. Activating a state is gated by the block lists
//! of the states already active; resolution then scans the active stack top
//! down and the first preset defining a property wins.
//!
//! ```text
//! parse(yaml) → Document → validate(doc) → ValidationResult
//!                        → Document::build() → StateCollection
//!                        → serialize(doc) → yaml
//! StateEngine::request_activate / request_deactivate → ActiveSetDelta
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use stateset::arbiter::Activation;
//! use stateset::engine::{CollectionId, StateEngine};
//! use stateset::target::ValueMapTarget;
//!
//! let yaml = r#"
//! stateset: "0.1"
//! collections:
//!   - id: character
//!     states:
//!       - name: Crouch
//!         blocks: [Run]
//!         preset:
//!           object: Controller.Movement
//!           values:
//!             - { type: f32, property: height, value: 0.9 }
//!       - name: Run
//!         preset:
//!           object: Controller.Movement
//!           values:
//!             - { type: f32, property: speed, value: 8.0 }
//!       - name: Default
//!         preset:
//!           object: Controller.Movement
//!           values:
//!             - { type: f32, property: height, value: 1.8 }
//!             - { type: f32, property: speed, value: 4.0 }
//! "#;
//!
//! let result = stateset::load(yaml).expect("valid document");
//!
//! let mut engine = StateEngine::new();
//! let target = ValueMapTarget::new("Controller.Movement")
//!     .with("f32", "height", json!(1.8))
//!     .with("f32", "speed", json!(4.0));
//! for (id, collection) in result.document.build().expect("well-formed") {
//!     engine.register(id, collection, Box::new(target.clone()));
//! }
//!
//! let id = CollectionId::new("character");
//! let outcome = engine.request_activate(&id, "Crouch").unwrap();
//! assert!(matches!(outcome, Activation::Applied(_)));
//!
//! // Crouch blocks Run while it is active.
//! let outcome = engine.request_activate(&id, "Run").unwrap();
//! assert!(matches!(outcome, Activation::Blocked { .. }));
//! ```

pub mod arbiter;
pub mod collection;
pub mod engine;
pub mod error;
pub mod parse;
pub mod preset;
pub mod serialize;
pub mod target;
pub mod types;
pub mod validate;

pub use error::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use parse::parse;
pub use serialize::serialize;
pub use validate::validate;

/// Result of the [`load`] convenience entry point.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed document.
    pub document: Document,
    /// Non-fatal warnings produced during validation.
    pub warnings: Vec<Diagnostic>,
}

/// Convenience entry point composing parse → validate.
///
/// Returns the document and any warnings on success.
/// Returns all errors (parse or validation) on failure.
///
/// # Errors
///
/// Returns `Err(Vec<StateSetError>)` if parsing fails or validation finds
/// errors.
pub fn load(input: &str) -> Result<LoadResult, Vec<StateSetError>> {
    let doc = parse::parse(input).map_err(|e| vec![StateSetError::Parse(e)])?;

    let result = validate::validate(&doc);
    if !result.errors.is_empty() {
        return Err(result
            .errors
            .into_iter()
            .map(StateSetError::Validation)
            .collect());
    }

    Ok(LoadResult {
        document: doc,
        warnings: result.warnings,
    })
}
