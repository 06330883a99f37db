//! Card registry for definition lookup.

use rustc_hash::FxHashMap;

use crate::core::DefinitionId;

use super::definition::CardDefinition;

/// Registry of card definitions.
///
/// Stores all definitions for a game and provides lookup by id.
///
/// ## Example
///
/// ```
/// use duelcore::cards::{CardRegistry, CardDefinition, CardType};
/// use duelcore::core::DefinitionId;
///
/// let mut registry = CardRegistry::new();
/// let id = registry.register(
///     CardDefinition::new(DefinitionId::new(0), "Scout", CardType::Unit).with_cost(1),
/// );
/// assert_eq!(registry.get(id).unwrap().title, "Scout");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    definitions: FxHashMap<DefinitionId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, returning its id.
    ///
    /// Panics if a definition with the same id already exists.
    pub fn register(&mut self, definition: CardDefinition) -> DefinitionId {
        let id = definition.id;
        if self.definitions.contains_key(&id) {
            panic!("definition {id} already registered");
        }
        self.definitions.insert(id, definition);
        id
    }

    /// Get a definition by id.
    #[must_use]
    pub fn get(&self, id: DefinitionId) -> Option<&CardDefinition> {
        self.definitions.get(&id)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        let id = registry.register(CardDefinition::new(
            DefinitionId::new(1),
            "Outpost",
            CardType::Base,
        ));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(id).unwrap().title, "Outpost");
        assert!(registry.get(DefinitionId::new(99)).is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(DefinitionId::new(1), "A", CardType::Unit));
        registry.register(CardDefinition::new(DefinitionId::new(1), "B", CardType::Unit));
    }
}
