//! Ports for collaborators owned outside the territory subsystem.

use holdfast_domain::{ClanName, ClanRelation, ClanStanding, WorldName};

/// Read-only view of the clan registry.
#[cfg_attr(test, mockall::automock)]
pub trait ClanDirectory: Send + Sync {
    /// Head counts for the clan; unknown clans have an empty standing.
    fn standing(&self, clan: &ClanName) -> ClanStanding;

    /// How `actor` relates to `owner`. Identical names are `Member`.
    fn relation(&self, actor: &ClanName, owner: &ClanName) -> ClanRelation;
}

/// Which worlds currently exist.
#[cfg_attr(test, mockall::automock)]
pub trait WorldDirectory: Send + Sync {
    fn exists(&self, world: &WorldName) -> bool;
}
