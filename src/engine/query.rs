//! Query construction and matching.
//!
//! A query names the component types an entity must have (`with`) and the
//! types it must not have (`without`). Construction is builder-style and
//! consuming, resolved against the owning world's component registry.
//!
//! ## Design goals
//! * **Fail fast:** an overlapping required/excluded declaration is a
//!   programmer error and is rejected at [`QueryBuilder::build`], at
//!   system construction time before the game loop starts, never per
//!   tick.
//! * **Determinism:** evaluation yields entities in ascending index order,
//!   so a tick's iteration order is reproducible regardless of storage
//!   churn.
//! * **Snapshot semantics:** evaluating a query walks storage state as of
//!   the call; it is one finite pass, restartable by evaluating again, and
//!   never a live view across structural changes.
//!
//! Built [`Query`] values are cheap to clone and reusable across ticks.
//! Evaluation itself lives on the world
//! ([`World::query`](crate::engine::world::World::query)), which owns the
//! storages the query must intersect.

use crate::engine::component::ComponentRegistry;
use crate::engine::entity::Entity;
use crate::engine::error::{ECSError, ECSResult};
use crate::engine::types::{ComponentID, Signature};

/// Builder for component queries.
///
/// Obtained from [`World::query_builder`](crate::engine::world::World::query_builder).
/// The builder is consumed by [`build`](Self::build), ensuring a query
/// definition cannot be extended after validation.
pub struct QueryBuilder<'a> {
    registry: &'a ComponentRegistry,
    required: Signature,
    excluded: Signature,
    required_ids: Vec<ComponentID>,
}

impl<'a> std::fmt::Debug for QueryBuilder<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("required", &self.required)
            .field("excluded", &self.excluded)
            .field("required_ids", &self.required_ids)
            .finish_non_exhaustive()
    }
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(registry: &'a ComponentRegistry) -> Self {
        Self {
            registry,
            required: Signature::EMPTY,
            excluded: Signature::EMPTY,
            required_ids: Vec::new(),
        }
    }

    /// Requires component `T` to be present on matched entities.
    pub fn with<T: 'static>(mut self) -> ECSResult<Self> {
        let component_id = self.registry.require_id_of::<T>()?;
        if !self.required.has(component_id) {
            self.required.set(component_id);
            self.required_ids.push(component_id);
        }
        Ok(self)
    }

    /// Requires component `T` to be absent on matched entities.
    pub fn without<T: 'static>(mut self) -> ECSResult<Self> {
        let component_id = self.registry.require_id_of::<T>()?;
        self.excluded.set(component_id);
        Ok(self)
    }

    /// Validates and finalizes the query.
    ///
    /// Fails with [`ECSError::MalformedQuery`] if any component type is
    /// both required and excluded.
    pub fn build(self) -> ECSResult<Query> {
        if !self.required.disjoint_from(&self.excluded) {
            let overlap = self
                .required_ids
                .iter()
                .copied()
                .find(|&component_id| self.excluded.has(component_id))
                .expect("overlap bit implies an overlapping required id");
            return Err(ECSError::MalformedQuery {
                component: self.registry.name_of(overlap),
            });
        }

        Ok(Query {
            required: self.required,
            excluded: self.excluded,
            required_ids: self.required_ids,
        })
    }
}

/// A validated component query.
#[derive(Clone, Debug)]
pub struct Query {
    required: Signature,
    excluded: Signature,
    required_ids: Vec<ComponentID>,
}

impl Query {
    /// Signature of the required component set.
    #[inline]
    pub fn required(&self) -> &Signature {
        &self.required
    }

    /// Signature of the excluded component set.
    #[inline]
    pub fn excluded(&self) -> &Signature {
        &self.excluded
    }

    /// Required component IDs in declaration order.
    #[inline]
    pub fn required_ids(&self) -> &[ComponentID] {
        &self.required_ids
    }

    /// Returns `true` if an entity with `signature` satisfies this query.
    #[inline]
    pub fn matches(&self, signature: &Signature) -> bool {
        signature.contains_all(&self.required) && signature.disjoint_from(&self.excluded)
    }
}

/// Iterator over the entities matched by one query evaluation.
///
/// Holds the matched set as of evaluation time, in ascending entity index
/// order. Re-evaluate the query to observe later structural changes.
pub struct QueryIter {
    matched: Vec<Entity>,
    cursor: usize,
}

impl QueryIter {
    pub(crate) fn new(mut matched: Vec<Entity>) -> Self {
        matched.sort_unstable_by_key(|entity| entity.index());
        Self { matched, cursor: 0 }
    }

    /// Number of matched entities remaining.
    pub fn remaining(&self) -> usize {
        self.matched.len() - self.cursor
    }
}

impl Iterator for QueryIter {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let entity = self.matched.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(entity)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for QueryIter {}
