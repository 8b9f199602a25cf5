//! Named collection of traits attached to one entity
//!
//! Keys are folded to uppercase so `"hp"`, `"Hp"` and `"HP"` address the
//! same trait. One container per entity; the entity owns it outright.

use ahash::AHashMap;

use super::Trait;
use crate::core::error::TraitError;

/// Uppercase key → `Trait` map
#[derive(Debug, Clone, Default)]
pub struct TraitContainer {
    traits: AHashMap<String, Trait>,
}

impl TraitContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new trait under `key`. Fails if the key is taken.
    pub fn add(&mut self, key: &str, value: Trait) -> Result<(), TraitError> {
        let key = key.to_uppercase();
        if self.traits.contains_key(&key) {
            return Err(TraitError::Duplicate(key));
        }
        self.traits.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Trait> {
        self.traits.get(&key.to_uppercase())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Trait> {
        self.traits.get_mut(&key.to_uppercase())
    }

    pub fn remove(&mut self, key: &str) -> Option<Trait> {
        self.traits.remove(&key.to_uppercase())
    }

    pub fn clear(&mut self) {
        self.traits.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.traits.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TraitKind;

    #[test]
    fn test_add_and_get_is_case_insensitive() {
        let mut traits = TraitContainer::new();
        traits.add("hp", Trait::new(TraitKind::Gauge, 10)).unwrap();
        assert_eq!(traits.get("HP").unwrap().actual(), 10);
        assert_eq!(traits.get("Hp").unwrap().actual(), 10);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut traits = TraitContainer::new();
        traits.add("STR", Trait::new(TraitKind::Static, 3)).unwrap();
        let err = traits.add("str", Trait::new(TraitKind::Static, 1));
        assert_eq!(err.unwrap_err(), TraitError::Duplicate("STR".into()));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut traits = TraitContainer::new();
        traits.add("STR", Trait::new(TraitKind::Static, 3)).unwrap();
        traits.add("CUN", Trait::new(TraitKind::Static, 2)).unwrap();
        assert!(traits.remove("str").is_some());
        assert!(traits.get("STR").is_none());
        traits.clear();
        assert!(traits.is_empty());
    }

    #[test]
    fn test_mutation_through_get_mut() {
        let mut traits = TraitContainer::new();
        traits.add("SP", Trait::new(TraitKind::Gauge, 10)).unwrap();
        traits.get_mut("sp").unwrap().set_current(4);
        assert_eq!(traits.get("SP").unwrap().actual(), 4);
    }
}
