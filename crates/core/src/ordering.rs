//! Ordering of block collections.
//!
//! Page blocks (one row per block) and zone blocks (one JSON document per
//! zone) are both ordered collections of blocks. They share this module so a
//! reorder means the same thing for both: every assignment in the request is
//! applied, unknown ids reject the whole request, and ties in position are
//! broken by the collection's natural sequence (row id for page blocks, array
//! index for zone blocks).

use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum number of assignments accepted in a single reorder request.
pub const MAX_REORDER_BATCH: usize = 1_000;

/// An item with a stable key and a mutable render position.
pub trait Positioned {
    type Key: Clone + Eq + Hash + Display + Debug;

    fn key(&self) -> &Self::Key;
    fn position(&self) -> i32;
    fn set_position(&mut self, position: i32);
}

/// One `{ id, order }` entry of a reorder request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment<K> {
    pub id: K,
    pub order: i32,
}

/// Why a reorder request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError<K: Display + Debug> {
    #[error("id {0} appears more than once in the reorder request")]
    DuplicateId(K),

    #[error("id {0} is not part of the collection")]
    UnknownId(K),
}

impl ReorderError<DbId> {
    /// Map onto the HTTP-facing taxonomy for a row-backed collection.
    pub fn into_core(self, entity: &'static str) -> CoreError {
        match self {
            ReorderError::UnknownId(id) => CoreError::NotFound { entity, id },
            dup @ ReorderError::DuplicateId(_) => CoreError::Validation(dup.to_string()),
        }
    }
}

impl ReorderError<String> {
    /// Zone block ids are client-generated strings, so an unknown one is a
    /// malformed request rather than a missing resource.
    pub fn into_validation(self) -> CoreError {
        CoreError::Validation(self.to_string())
    }
}

/// Reject requests that assign the same id twice.
pub fn validate_assignments<K>(assignments: &[OrderAssignment<K>]) -> Result<(), ReorderError<K>>
where
    K: Clone + Eq + Hash + Display + Debug,
{
    let mut seen = HashSet::with_capacity(assignments.len());
    for assignment in assignments {
        if !seen.insert(&assignment.id) {
            return Err(ReorderError::DuplicateId(assignment.id.clone()));
        }
    }
    Ok(())
}

/// Check the batch size of a reorder request.
pub fn validate_batch_size(len: usize) -> Result<(), CoreError> {
    if len > MAX_REORDER_BATCH {
        Err(CoreError::Validation(format!(
            "Reorder request has {len} entries, exceeding the maximum of {MAX_REORDER_BATCH}"
        )))
    } else {
        Ok(())
    }
}

/// Apply `assignments` to `items` in place.
///
/// Either every assignment is applied or none is. Returns the keys whose
/// position actually changed, in assignment order, so callers can skip
/// writing untouched rows. Applying the same assignments twice is a no-op the
/// second time.
pub fn apply_reorder<T: Positioned>(
    items: &mut [T],
    assignments: &[OrderAssignment<T::Key>],
) -> Result<Vec<T::Key>, ReorderError<T::Key>> {
    validate_assignments(assignments)?;

    let mut targets = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let index = items
            .iter()
            .position(|item| item.key() == &assignment.id)
            .ok_or_else(|| ReorderError::UnknownId(assignment.id.clone()))?;
        targets.push((index, assignment.order));
    }

    let mut changed = Vec::new();
    for (index, order) in targets {
        let item = &mut items[index];
        if item.position() != order {
            item.set_position(order);
            changed.push(item.key().clone());
        }
    }
    Ok(changed)
}

/// Stable sort by position; equal positions keep their current relative order.
pub fn sort_by_position<T: Positioned>(items: &mut [T]) {
    items.sort_by_key(|item| item.position());
}

/// Rewrite positions to `0..n` following the current slice order.
///
/// Returns the number of items whose position changed.
pub fn normalize_positions<T: Positioned>(items: &mut [T]) -> usize {
    let mut updated = 0;
    for (index, item) in items.iter_mut().enumerate() {
        let target = index as i32;
        if item.position() != target {
            item.set_position(target);
            updated += 1;
        }
    }
    updated
}

/// Position for a block appended after `current_max`.
pub fn next_position(current_max: Option<i32>) -> i32 {
    current_max.map_or(0, |max| max.saturating_add(1))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: DbId,
        order: i32,
    }

    impl Positioned for Item {
        type Key = DbId;

        fn key(&self) -> &DbId {
            &self.id
        }
        fn position(&self) -> i32 {
            self.order
        }
        fn set_position(&mut self, position: i32) {
            self.order = position;
        }
    }

    fn items(pairs: &[(DbId, i32)]) -> Vec<Item> {
        pairs.iter().map(|&(id, order)| Item { id, order }).collect()
    }

    fn assign(pairs: &[(DbId, i32)]) -> Vec<OrderAssignment<DbId>> {
        pairs
            .iter()
            .map(|&(id, order)| OrderAssignment { id, order })
            .collect()
    }

    #[test]
    fn swap_two_blocks() {
        let mut blocks = items(&[(1, 0), (2, 1)]);
        let changed = apply_reorder(&mut blocks, &assign(&[(1, 1), (2, 0)])).unwrap();
        assert_eq!(changed, vec![1, 2]);

        sort_by_position(&mut blocks);
        assert_eq!(blocks.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn reorder_is_idempotent() {
        let mut blocks = items(&[(1, 0), (2, 1), (3, 2)]);
        let request = assign(&[(3, 0), (1, 2)]);

        apply_reorder(&mut blocks, &request).unwrap();
        let once = blocks.clone();
        let changed = apply_reorder(&mut blocks, &request).unwrap();

        assert!(changed.is_empty());
        assert_eq!(blocks, once);
    }

    #[test]
    fn unknown_id_applies_nothing() {
        let mut blocks = items(&[(1, 0), (2, 1)]);
        let before = blocks.clone();
        let err = apply_reorder(&mut blocks, &assign(&[(1, 5), (99, 0)])).unwrap_err();

        assert_eq!(err, ReorderError::UnknownId(99));
        assert_eq!(blocks, before);
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut blocks = items(&[(1, 0)]);
        assert_eq!(
            apply_reorder(&mut blocks, &assign(&[(1, 2), (1, 3)])).unwrap_err(),
            ReorderError::DuplicateId(1)
        );
    }

    #[test]
    fn ties_keep_existing_sequence() {
        let mut blocks = items(&[(10, 1), (11, 0), (12, 1)]);
        sort_by_position(&mut blocks);
        assert_eq!(
            blocks.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![11, 10, 12]
        );
    }

    #[test]
    fn normalize_fills_gaps_and_duplicates() {
        let mut blocks = items(&[(1, 0), (2, 5), (3, 5), (4, 100)]);
        let updated = normalize_positions(&mut blocks);
        assert_eq!(updated, 3);
        assert_eq!(
            blocks.iter().map(|b| b.order).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn next_position_after_max() {
        assert_eq!(next_position(None), 0);
        assert_eq!(next_position(Some(4)), 5);
        assert_eq!(next_position(Some(i32::MAX)), i32::MAX);
    }

    #[test]
    fn reorder_errors_map_to_taxonomy() {
        assert_matches!(
            ReorderError::UnknownId(7).into_core("PageBlock"),
            CoreError::NotFound { entity: "PageBlock", id: 7 }
        );
        assert_matches!(
            ReorderError::DuplicateId(7).into_core("PageBlock"),
            CoreError::Validation(_)
        );
        assert_matches!(
            ReorderError::UnknownId("b9".to_string()).into_validation(),
            CoreError::Validation(_)
        );
    }

    #[test]
    fn batch_size_limit() {
        assert!(validate_batch_size(MAX_REORDER_BATCH).is_ok());
        assert!(validate_batch_size(MAX_REORDER_BATCH + 1).is_err());
    }
}
