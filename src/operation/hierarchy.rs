//! Parent/child relationships between running operations

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use super::listener::OperationListener;
use super::types::{
    OperationDescriptor, OperationFinishEvent, OperationId, OperationProgressEvent,
    OperationStartEvent,
};
use crate::core::config::TrackerConfig;
use crate::core::errors::Result;

/// Answers "closest ancestor of this operation satisfying a predicate".
pub trait ParentResolver: Send + Sync {
    /// Walk from `id` (inclusive) towards the root and return the first
    /// operation for which `predicate` holds.
    ///
    /// The predicate is evaluated against live state at each step; callers
    /// must not assume the result still satisfies it once this returns.
    fn find_closest_ancestor(
        &self,
        id: OperationId,
        predicate: &dyn Fn(OperationId) -> bool,
    ) -> Option<OperationId>;
}

impl<R: ParentResolver + ?Sized> ParentResolver for Arc<R> {
    fn find_closest_ancestor(
        &self,
        id: OperationId,
        predicate: &dyn Fn(OperationId) -> bool,
    ) -> Option<OperationId> {
        (**self).find_closest_ancestor(id, predicate)
    }
}

/// Records the parent of every running operation from lifecycle events.
///
/// Register it ahead of any listener that resolves ancestors so parent links
/// exist before and outlive the operations that query them.
pub struct OperationParentTracker {
    parents: DashMap<OperationId, OperationId>,
}

impl OperationParentTracker {
    pub fn new() -> Self {
        Self {
            parents: DashMap::new(),
        }
    }

    /// Size the parent index from `config`, rejecting an invalid one
    pub fn with_config(config: &TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parents: DashMap::with_capacity_and_shard_amount(
                config.initial_capacity,
                config.shard_amount,
            ),
        })
    }

    /// Parent of a running operation, if it has one
    pub fn parent_of(&self, id: OperationId) -> Option<OperationId> {
        self.parents.get(&id).map(|entry| *entry.value())
    }

    /// Number of running operations with a recorded parent
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl Default for OperationParentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ParentResolver for OperationParentTracker {
    fn find_closest_ancestor(
        &self,
        id: OperationId,
        predicate: &dyn Fn(OperationId) -> bool,
    ) -> Option<OperationId> {
        // A well formed hierarchy never needs more steps than recorded links
        let max_steps = self.parents.len() + 1;
        let mut current = id;
        for _ in 0..max_steps {
            if predicate(current) {
                return Some(current);
            }
            // The shard guard is dropped before the next probe
            current = self.parent_of(current)?;
        }
        trace!("Ancestor walk from {} exceeded {} steps", id, max_steps);
        None
    }
}

impl OperationListener for OperationParentTracker {
    fn started(&self, operation: &OperationDescriptor, _event: &OperationStartEvent) {
        if let Some(parent_id) = operation.parent_id {
            self.parents.insert(operation.id, parent_id);
        }
    }

    fn progress(&self, _operation_id: OperationId, _event: &OperationProgressEvent) {}

    fn finished(&self, operation: &OperationDescriptor, _event: &OperationFinishEvent) {
        self.parents.remove(&operation.id);
    }
}
