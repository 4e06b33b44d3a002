//! Typed edges and the reinforce-on-conflict relationship store.
//!
//! A relationship is identified by `(from_id, to_id, rel_type)`. Inserting
//! the same triple again strengthens the stored edge instead of adding a
//! second one.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::now_timestamp;

/// Relationship type names emitted by the builder.
pub mod rel_types {
    /// Concept → document it was extracted from.
    pub const EXTRACTED_FROM: &str = "extracted_from";
    /// Concept → concept sharing at least one document.
    pub const RELATED_TO: &str = "related_to";
    /// Anchor → anchor triangulation.
    pub const SUPPORTS: &str = "supports";
}

/// Strength added on every reinforcement.
pub const REINFORCEMENT_STEP: f64 = 0.1;

/// Upper bound on relationship strength.
pub const MAX_STRENGTH: f64 = 1.0;

/// A directed, typed edge between two node ids.
///
/// Endpoints are not required to exist in the node store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from_id: String,
    pub to_id: String,
    pub rel_type: String,

    /// In `[0.0, 1.0]`.
    pub strength: f64,

    /// Descriptive only; the edge is stored once, in the given direction.
    pub bidirectional: bool,

    /// Epoch seconds.
    pub created: f64,

    /// Epoch seconds.
    pub last_reinforced: f64,

    pub reinforcement_count: u64,
}

impl Relationship {
    /// Create a new unidirectional relationship.
    ///
    /// `strength` is stored as given and must lie in `[0.0, 1.0]`.
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        rel_type: impl Into<String>,
        strength: f64,
    ) -> Self {
        debug_assert!(
            (0.0..=MAX_STRENGTH).contains(&strength),
            "relationship strength {strength} outside [0, {MAX_STRENGTH}]"
        );
        let now = now_timestamp();
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            rel_type: rel_type.into(),
            strength,
            bidirectional: false,
            created: now,
            last_reinforced: now,
            reinforcement_count: 1,
        }
    }

    /// Flag the relationship as bidirectional.
    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    fn key(&self) -> RelationshipKey {
        RelationshipKey {
            from_id: self.from_id.clone(),
            to_id: self.to_id.clone(),
            rel_type: self.rel_type.clone(),
        }
    }

    fn reinforce(&mut self) {
        self.reinforcement_count += 1;
        self.last_reinforced = now_timestamp();
        self.strength = (self.strength + REINFORCEMENT_STEP).min(MAX_STRENGTH);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RelationshipKey {
    from_id: String,
    to_id: String,
    rel_type: String,
}

/// Relationships in insertion order, unique per `(from, to, type)`.
#[derive(Debug, Clone, Default)]
pub struct RelationshipStore {
    relationships: Vec<Relationship>,
    /// key → position in `relationships`
    index: HashMap<RelationshipKey, usize>,
}

impl RelationshipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relationship, reinforcing the stored one when the triple exists.
    ///
    /// A new relationship keeps its supplied strength. Returns the effective
    /// stored relationship.
    pub fn add_relationship(&mut self, rel: Relationship) -> &Relationship {
        let key = rel.key();
        if let Some(&position) = self.index.get(&key) {
            let existing = &mut self.relationships[position];
            existing.reinforce();
            return existing;
        }

        let position = self.relationships.len();
        self.relationships.push(rel);
        self.index.insert(key, position);
        &self.relationships[position]
    }

    /// Look up a relationship by its triple.
    pub fn find(&self, from_id: &str, to_id: &str, rel_type: &str) -> Option<&Relationship> {
        let key = RelationshipKey {
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            rel_type: rel_type.to_string(),
        };
        self.index.get(&key).map(|&position| &self.relationships[position])
    }

    /// Iterate relationships in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    /// Iterate relationships of one type in insertion order.
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.relationships.iter().filter(move |r| r.rel_type == rel_type)
    }

    /// Relationship counts per type.
    pub fn count_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for rel in &self.relationships {
            *counts.entry(rel.rel_type.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// All relationships as an ordered slice.
    pub fn as_slice(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Number of stored relationships.
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_relationship_keeps_strength() {
        let mut store = RelationshipStore::new();
        let rel = store.add_relationship(Relationship::new("a", "b", rel_types::RELATED_TO, 0.5));

        assert_eq!(rel.strength, 0.5);
        assert_eq!(rel.reinforcement_count, 1);
        assert!(!rel.bidirectional);
    }

    #[test]
    fn test_boundary_strengths_are_stored_as_given() {
        let mut store = RelationshipStore::new();
        store.add_relationship(Relationship::new("a", "b", rel_types::RELATED_TO, 0.0));
        store.add_relationship(Relationship::new("b", "c", rel_types::RELATED_TO, 1.0));

        let strengths: Vec<f64> = store.iter().map(|r| r.strength).collect();
        assert_eq!(strengths, vec![0.0, 1.0]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_range_strength_is_rejected() {
        Relationship::new("a", "b", rel_types::RELATED_TO, 1.5);
    }

    #[test]
    fn test_repeat_insert_reinforces() {
        let mut store = RelationshipStore::new();
        for _ in 0..3 {
            store.add_relationship(Relationship::new("a", "b", rel_types::RELATED_TO, 0.5));
        }

        assert_eq!(store.len(), 1);
        let rel = store.find("a", "b", rel_types::RELATED_TO).unwrap();
        assert_eq!(rel.reinforcement_count, 3);
        assert!((rel.strength - 0.7).abs() < 1e-9);
        assert!(rel.last_reinforced >= rel.created);
    }

    #[test]
    fn test_strength_saturates() {
        let mut store = RelationshipStore::new();
        for _ in 0..5 {
            store.add_relationship(Relationship::new("a", "b", rel_types::SUPPORTS, 0.9));
        }

        let rel = store.find("a", "b", rel_types::SUPPORTS).unwrap();
        assert_eq!(rel.strength, 1.0);
        assert_eq!(rel.reinforcement_count, 5);
    }

    #[test]
    fn test_key_includes_direction_and_type() {
        let mut store = RelationshipStore::new();
        store.add_relationship(Relationship::new("a", "b", rel_types::RELATED_TO, 0.5));
        store.add_relationship(Relationship::new("b", "a", rel_types::RELATED_TO, 0.5));
        store.add_relationship(Relationship::new("a", "b", rel_types::SUPPORTS, 0.5));

        assert_eq!(store.len(), 3);
        assert!(store.iter().all(|r| r.reinforcement_count == 1));
    }

    #[test]
    fn test_count_by_type() {
        let mut store = RelationshipStore::new();
        store.add_relationship(Relationship::new("c1", "d1", rel_types::EXTRACTED_FROM, 0.9));
        store.add_relationship(Relationship::new("c2", "d1", rel_types::EXTRACTED_FROM, 0.9));
        store.add_relationship(Relationship::new("c1", "c2", rel_types::RELATED_TO, 0.3));

        let counts = store.count_by_type();
        assert_eq!(counts.get(rel_types::EXTRACTED_FROM), Some(&2));
        assert_eq!(counts.get(rel_types::RELATED_TO), Some(&1));
        assert_eq!(store.of_type(rel_types::EXTRACTED_FROM).count(), 2);
    }

    #[test]
    fn test_relationship_wire_format() {
        let rel = Relationship::new("a", "b", rel_types::SUPPORTS, 0.9).bidirectional();
        let value = serde_json::to_value(&rel).unwrap();

        assert_eq!(value["fromId"], "a");
        assert_eq!(value["toId"], "b");
        assert_eq!(value["relType"], "supports");
        assert_eq!(value["bidirectional"], true);
        assert_eq!(value["reinforcementCount"], 1);
    }
}
