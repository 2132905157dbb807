//! The catalog registry
//!
//! Maps specimen ids to constructors so hosts can instantiate entries by
//! name. Registration order is presentation order.

use crate::error::CatalogError;
use crate::specimen::{Specimen, SpecimenMeta};
use crate::specimens::{FirstLight, HeldGround, LettersSettle, SealedIntent};
use rustc_hash::FxHashMap;

/// Constructs a fresh specimen instance
pub type SpecimenCtor = fn() -> Box<dyn Specimen>;

struct Entry {
    meta: SpecimenMeta,
    ctor: SpecimenCtor,
}

/// Id → constructor registry over the catalog
pub struct CatalogRegistry {
    entries: FxHashMap<&'static str, Entry>,
    order: Vec<&'static str>,
}

impl CatalogRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// A registry pre-loaded with the built-in reference specimens
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(FirstLight::META, || Box::new(FirstLight::new()));
        registry.register(HeldGround::META, || Box::new(HeldGround::new()));
        registry.register(LettersSettle::META, || Box::new(LettersSettle::new()));
        registry.register(SealedIntent::META, || Box::new(SealedIntent::new()));
        registry
    }

    /// Register a specimen; a duplicate id replaces the old entry
    pub fn register(&mut self, meta: SpecimenMeta, ctor: SpecimenCtor) {
        if self.entries.insert(meta.id, Entry { meta, ctor }).is_some() {
            tracing::warn!(specimen = meta.id, "replacing existing catalog entry");
        } else {
            self.order.push(meta.id);
        }
    }

    /// Instantiate a specimen by id
    pub fn create(&self, id: &str) -> Result<Box<dyn Specimen>, CatalogError> {
        self.entries
            .get(id)
            .map(|entry| (entry.ctor)())
            .ok_or_else(|| CatalogError::UnknownSpecimen(id.to_string()))
    }

    /// Metadata for one entry
    pub fn meta(&self, id: &str) -> Option<&SpecimenMeta> {
        self.entries.get(id).map(|entry| &entry.meta)
    }

    /// All metadata in registration order
    pub fn metas(&self) -> Vec<&SpecimenMeta> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| &e.meta))
            .collect()
    }

    /// Metadata for one series, in registration order
    pub fn by_series(&self, series: &str) -> Vec<&SpecimenMeta> {
        self.metas()
            .into_iter()
            .filter(|meta| meta.series == series)
            .collect()
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> &[&'static str] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries() {
        let registry = CatalogRegistry::builtin();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.ids()[0], "first_light");
        assert!(registry.meta("held_ground").is_some());
    }

    #[test]
    fn test_create_known_and_unknown() {
        let registry = CatalogRegistry::builtin();

        let specimen = registry.create("sealed_intent").unwrap();
        assert_eq!(specimen.meta().id, "sealed_intent");

        let err = registry.create("missing").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSpecimen(_)));
    }

    #[test]
    fn test_by_series() {
        let registry = CatalogRegistry::builtin();
        let rituals = registry.by_series("word_rituals");
        assert_eq!(rituals.len(), 1);
        assert_eq!(rituals[0].id, "letters_settle");
    }

    #[test]
    fn test_duplicate_registration_replaces() {
        let mut registry = CatalogRegistry::builtin();
        let before = registry.len();
        registry.register(FirstLight::META, || Box::new(FirstLight::new()));
        assert_eq!(registry.len(), before);
        assert_eq!(registry.ids().len(), before);
    }
}
