//! Region aggregate - a contestable map cell and its capture state machine
//!
//! A region is either unclaimed or owned by a clan with a positive
//! strength. Every scored capture attempt feeds through
//! [`Region::resolve_attempt`], which applies exactly one transition and
//! reports it as a [`CaptureOutcome`].
//!
//! # Invariants
//!
//! - `strength` stays in 0..=strength_cap
//! - `index` is immutable for the lifetime of the region
//! - locked regions reject every transition

use serde::{Deserialize, Serialize};

use crate::ids::{ClanId, RegionIndex};
use crate::value_objects::BattleSettings;

/// Result of a capture attempt against a region.
///
/// The variants carry enough to update the actor's lifetime statistics:
/// influence accrues when the actor's clan holds the region afterwards,
/// damage accrues when the attempt struck an enemy holder, and a flip
/// accrues both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The region is locked; nothing changed.
    Locked,
    /// An unclaimed region now belongs to the actor's clan.
    Claimed { strength: i32 },
    /// The actor reinforced a region its clan already holds.
    Reinforced { strength: i32 },
    /// An enemy region was damaged but held.
    Damaged { remaining: i32 },
    /// An enemy region was depleted and flipped to the actor's clan.
    /// The new strength is the attacking power, not the leftover.
    Flipped { strength: i32 },
}

impl CaptureOutcome {
    /// True when the attempt counts toward lifetime damage dealt.
    pub fn accrues_damage(&self) -> bool {
        matches!(
            self,
            CaptureOutcome::Damaged { .. } | CaptureOutcome::Flipped { .. }
        )
    }

    /// True when the attempt counts toward lifetime influence.
    pub fn accrues_influence(&self) -> bool {
        matches!(
            self,
            CaptureOutcome::Claimed { .. }
                | CaptureOutcome::Reinforced { .. }
                | CaptureOutcome::Flipped { .. }
        )
    }
}

/// A contestable cell of the battle map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    index: RegionIndex,
    owner_clan_id: Option<ClanId>,
    strength: i32,
    locked: bool,
}

impl Region {
    /// Create an unclaimed, unlocked region. Done once at map setup.
    pub fn new(index: RegionIndex) -> Self {
        Self {
            index,
            owner_clan_id: None,
            strength: 0,
            locked: false,
        }
    }

    // =========================================================================
    // Builder Methods (used when loading from storage)
    // =========================================================================

    pub fn with_owner(mut self, clan_id: ClanId, strength: i32) -> Self {
        self.owner_clan_id = Some(clan_id);
        self.strength = strength.max(0);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn index(&self) -> RegionIndex {
        self.index
    }

    #[inline]
    pub fn owner_clan_id(&self) -> Option<ClanId> {
        self.owner_clan_id
    }

    #[inline]
    pub fn strength(&self) -> i32 {
        self.strength
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// True when the given clan currently holds this region.
    pub fn is_held_by(&self, clan_id: ClanId) -> bool {
        self.owner_clan_id == Some(clan_id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Administrative lock: the region rejects all capture attempts.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Apply one scored capture attempt with the given buff-adjusted power.
    ///
    /// `power` must be positive; the caller derives it from the actor's
    /// damage (attacking) or defense (reinforcing) stat.
    pub fn resolve_attempt(
        &mut self,
        actor_clan: ClanId,
        power: i32,
        settings: &BattleSettings,
    ) -> CaptureOutcome {
        if self.locked {
            return CaptureOutcome::Locked;
        }
        let cap = settings.strength_cap;
        match self.owner_clan_id {
            None => {
                self.owner_clan_id = Some(actor_clan);
                self.strength = power.min(cap);
                CaptureOutcome::Claimed {
                    strength: self.strength,
                }
            }
            Some(owner) if owner == actor_clan => {
                self.strength = (self.strength + power).min(cap);
                CaptureOutcome::Reinforced {
                    strength: self.strength,
                }
            }
            Some(_) if self.strength > power => {
                self.strength -= power;
                CaptureOutcome::Damaged {
                    remaining: self.strength,
                }
            }
            Some(_) => {
                // Depleted: the region flips at the attacking power.
                self.owner_clan_id = Some(actor_clan);
                self.strength = power.min(cap);
                CaptureOutcome::Flipped {
                    strength: self.strength,
                }
            }
        }
    }
}
