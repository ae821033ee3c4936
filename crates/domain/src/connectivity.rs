//! Territory connectivity check.
//!
//! A clan's cells must stay one 8-connected region. Before a cell is released
//! the remaining cells are flood-filled from an arbitrary start; the removal is
//! safe only if the fill reaches every one of them.
//!
//! Neighbour lookup looks up the eight surrounding keys in a hash set, so the
//! check is linear in the number of cells.

use std::collections::{HashSet, VecDeque};

use crate::value_objects::CellKey;

/// True if `cells` without `removed` is still a single 8-connected region.
///
/// Zero or one remaining cell is trivially connected. `removed` need not be a
/// member of `cells`.
pub fn is_connected_without(cells: &HashSet<CellKey>, removed: &CellKey) -> bool {
    single_region(cells, Some(removed))
}

/// True if `cells` is a single 8-connected region (empty counts as connected).
pub fn is_connected(cells: &HashSet<CellKey>) -> bool {
    single_region(cells, None)
}

fn single_region(cells: &HashSet<CellKey>, removed: Option<&CellKey>) -> bool {
    let is_removed = |c: &CellKey| removed == Some(c);
    let remaining = cells.len() - cells.iter().filter(|c| is_removed(c)).count();
    if remaining <= 1 {
        return true;
    }

    let Some(start) = cells.iter().find(|c| !is_removed(c)) else {
        return true;
    };

    let mut visited: HashSet<&CellKey> = HashSet::with_capacity(remaining);
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for neighbor in cell.neighbors() {
            if is_removed(&neighbor) {
                continue;
            }
            if let Some(member) = cells.get(&neighbor) {
                if visited.insert(member) {
                    queue.push_back(member);
                }
            }
        }
    }

    visited.len() == remaining
}
