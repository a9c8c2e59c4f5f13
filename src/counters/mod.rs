//! Counter system: identifiers, definitions, runtime state and registry.
//!
//! ## Key Types
//!
//! - `CounterId`: Closed set of counters a slot can carry
//! - `CounterKind`: Counter / Toggle / Switch tap semantics
//! - `Exclusivity`: Per-slot, globally exclusive, or globally synchronized
//! - `CounterState`: Runtime state of one counter on one slot
//! - `CounterRegistry`: Static definition lookup

pub mod definition;
pub mod registry;

pub use definition::{CounterDefinition, CounterId, CounterKind, CounterState, Exclusivity};
pub use registry::CounterRegistry;
