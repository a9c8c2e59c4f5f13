//! Counter registry for definition lookup.
//!
//! The `CounterRegistry` exposes the static counter table. Lookups are
//! infallible because `CounterId` is a closed enumeration.

use super::definition::{CounterDefinition, CounterId, CounterKind, Exclusivity};

/// Registry of counter definitions.
///
/// ## Example
///
/// ```
/// use commander_tracker::counters::{CounterId, CounterKind, CounterRegistry, Exclusivity};
///
/// assert_eq!(CounterRegistry::kind_of(CounterId::Poison), CounterKind::Counter);
/// assert_eq!(
///     CounterRegistry::exclusivity_of(CounterId::Monarch),
///     Exclusivity::GlobalExclusiveToggle
/// );
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CounterRegistry;

impl CounterRegistry {
    /// Get the definition of a counter.
    #[must_use]
    pub const fn get(id: CounterId) -> CounterDefinition {
        id.definition()
    }

    /// Get the behavioral kind of a counter.
    #[must_use]
    pub const fn kind_of(id: CounterId) -> CounterKind {
        id.definition().kind
    }

    /// Get the exclusivity class of a counter.
    #[must_use]
    pub const fn exclusivity_of(id: CounterId) -> Exclusivity {
        id.definition().exclusivity
    }

    /// Get the display label of a counter.
    #[must_use]
    pub const fn label(id: CounterId) -> &'static str {
        id.definition().label
    }

    /// Get the number of registered counters.
    #[must_use]
    pub const fn len() -> usize {
        CounterId::ALL.len()
    }

    /// Iterate over all counter definitions in display order.
    pub fn iter() -> impl Iterator<Item = CounterDefinition> {
        CounterId::ALL.into_iter().map(CounterId::definition)
    }

    /// Find counters by kind.
    pub fn find_by_kind(kind: CounterKind) -> impl Iterator<Item = CounterDefinition> {
        Self::iter().filter(move |d| d.kind == kind)
    }

    /// Find counters matching a predicate.
    pub fn find<F>(predicate: F) -> impl Iterator<Item = CounterDefinition>
    where
        F: Fn(&CounterDefinition) -> bool,
    {
        Self::iter().filter(move |d| predicate(d))
    }
}
