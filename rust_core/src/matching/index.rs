//! In-memory candidate pool keyed by entity identifier.

use crate::error::MatchError;
use crate::models::Entity;
use crate::utils::matching::{normalize_name, ParsedName};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Precomputed comparison form of an entity's name.
#[derive(Debug, Clone)]
pub(crate) enum NameKey {
    /// Normalized linked-identity name
    Linked(String),
    /// Own name, split for the abbreviated comparison path
    Own(ParsedName),
    /// Single-token own name ("Pele"); compared whole against the query
    Bare(String),
}

#[derive(Debug, Clone)]
pub(crate) struct IndexedEntity {
    pub(crate) entity: Entity,
    pub(crate) key: NameKey,
}

/// Read-only entity pool.
///
/// Entities keep the order they were supplied in. The matcher breaks score ties by
/// that order, so building from the same input always gives the same answers.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    entries: Vec<IndexedEntity>,
    by_id: FxHashMap<String, usize>,
}

impl EntityIndex {
    /// Build the index, rejecting duplicate identifiers.
    pub fn build<I>(entities: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = Entity>,
    {
        let mut index = Self::default();

        for entity in entities {
            if index.by_id.contains_key(&entity.id) {
                return Err(MatchError::DuplicateIdentifier(entity.id));
            }

            let key = match &entity.linked_identity {
                Some(identity) => NameKey::Linked(normalize_name(&identity.full_name)),
                None => match ParsedName::parse(&entity.name) {
                    Ok(parsed) => NameKey::Own(parsed),
                    Err(e) => {
                        warn!("Entity {} matches on its whole name only: {}", entity.id, e);
                        NameKey::Bare(normalize_name(&entity.name))
                    }
                },
            };

            index.by_id.insert(entity.id.clone(), index.entries.len());
            index.entries.push(IndexedEntity { entity, key });
        }

        debug!("Built entity index with {} entities", index.entries.len());
        Ok(index)
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.by_id.get(id).map(|&i| &self.entries[i].entity)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entities in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter().map(|e| &e.entity)
    }

    /// Entities whose own name could not be abbreviated, in index order.
    pub fn malformed(&self) -> impl Iterator<Item = &Entity> {
        self.entries
            .iter()
            .filter(|e| matches!(e.key, NameKey::Bare(_)))
            .map(|e| &e.entity)
    }

    pub(crate) fn entries(&self) -> &[IndexedEntity] {
        &self.entries
    }
}
