//! Ability registry for definition lookup.

use rustc_hash::FxHashMap;

use crate::core::AbilityId;

use super::definition::AbilityDefinition;

/// Registry of ability definitions.
#[derive(Clone, Debug, Default)]
pub struct AbilityRegistry {
    abilities: FxHashMap<AbilityId, AbilityDefinition>,
    next_id: u32,
}

impl AbilityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next free ability id.
    pub fn next_id(&mut self) -> AbilityId {
        let id = AbilityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register an ability definition, returning its id.
    ///
    /// Panics if an ability with the same id already exists.
    pub fn register(&mut self, ability: AbilityDefinition) -> AbilityId {
        let id = ability.id;
        if self.abilities.contains_key(&id) {
            panic!("ability {id} already registered");
        }
        self.next_id = self.next_id.max(id.raw() + 1);
        self.abilities.insert(id, ability);
        id
    }

    /// Get an ability definition by id.
    #[must_use]
    pub fn get(&self, id: AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.get(&id)
    }

    /// Number of registered abilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}
