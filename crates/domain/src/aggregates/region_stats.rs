//! Lifetime territory-battle statistics per character.
//!
//! Used for leaderboards only; gameplay logic never reads these. Both
//! counters are monotonically non-decreasing.

use serde::{Deserialize, Serialize};

use crate::aggregates::CaptureOutcome;
use crate::ids::CharacterId;

/// Lifetime counters a character accumulates across capture attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRegionStats {
    character_id: CharacterId,
    total_damage_dealt: i64,
    total_influence_points: i64,
}

impl CharacterRegionStats {
    /// Zeroed counters for a character with no recorded attempts.
    pub fn new(character_id: CharacterId) -> Self {
        Self {
            character_id,
            total_damage_dealt: 0,
            total_influence_points: 0,
        }
    }

    pub fn with_totals(mut self, damage_dealt: i64, influence_points: i64) -> Self {
        self.total_damage_dealt = damage_dealt.max(0);
        self.total_influence_points = influence_points.max(0);
        self
    }

    #[inline]
    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    #[inline]
    pub fn total_damage_dealt(&self) -> i64 {
        self.total_damage_dealt
    }

    #[inline]
    pub fn total_influence_points(&self) -> i64 {
        self.total_influence_points
    }

    /// Accrue the counters a capture outcome earns. A flip accrues both.
    pub fn record(&mut self, outcome: &CaptureOutcome, power: i32) {
        let power = i64::from(power.max(0));
        if outcome.accrues_damage() {
            self.total_damage_dealt += power;
        }
        if outcome.accrues_influence() {
            self.total_influence_points += power;
        }
    }
}
