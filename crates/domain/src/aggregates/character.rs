//! Character aggregate - a player's persistent progression state
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: all fields are encapsulated
//! - **Derived stats**: damage, defense and max energy are always
//!   recomputed from skill points, never stored independently
//! - **Outcome enums**: mutations return what actually happened
//!   (`EnergyRefill`, `ExperienceOutcome`, ...) instead of booleans
//!
//! # Invariants
//!
//! - `level` is in 1..=100 and never decreases
//! - `experience` is non-negative and monotonically non-decreasing
//! - skill-point fields are non-negative and never decrease
//! - energy is in 0..=max_energy; `stored_energy == None` means "full"
//! - `currency_balance` never goes negative

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::{CharacterId, ClanId};
use crate::progression;
use crate::value_objects::{BattleSettings, CharacterName};

/// Base value of damage and defense before skill points.
const BASE_COMBAT_STAT: i32 = 5;

/// Base max energy before skill points.
const BASE_MAX_ENERGY: i32 = 10;

/// Result of running the energy regeneration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyRefill {
    /// First observation: the refill clock was unset, energy is now full
    /// and the clock starts at the observation time. The caller must
    /// persist the character for the clock to stick.
    Initialized { energy: i32 },
    /// No full interval has elapsed; nothing was mutated.
    Unchanged { energy: i32 },
    /// One or more intervals elapsed; energy and the refill clock moved.
    Ticked { energy: i32, intervals: i64 },
}

impl EnergyRefill {
    /// Current energy after the refill step, whatever happened.
    pub fn energy(&self) -> i32 {
        match *self {
            EnergyRefill::Initialized { energy }
            | EnergyRefill::Unchanged { energy }
            | EnergyRefill::Ticked { energy, .. } => energy,
        }
    }

    /// True if the character state changed and needs persisting.
    pub fn is_dirty(&self) -> bool {
        !matches!(self, EnergyRefill::Unchanged { .. })
    }
}

/// Result of spending energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendOutcome {
    Spent { remaining: i32 },
    Insufficient { available: i32, required: i32 },
}

/// Result of granting experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceOutcome {
    /// Level increased; energy was force-refilled to max.
    LeveledUp { from: i32, to: i32 },
    /// Experience recorded without crossing a level threshold.
    Gained { level: i32 },
}

/// Result of a skill-point allocation attempt.
///
/// Allocations are given as new per-stat totals. Out-of-range requests are
/// rejected outright - there is no clamping to "close enough" values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    Allocated { spent: i32, available: i32 },
    /// A requested total is below the points already spent on that stat.
    WouldDecrease,
    /// The requested totals exceed the level's budget.
    OverBudget { requested: i32, budget: i32 },
}

/// Result of paying currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid { balance: i64 },
    InsufficientFunds { balance: i64, price: i64 },
}

/// A player's character.
#[derive(Debug, Clone)]
pub struct Character {
    id: CharacterId,
    name: CharacterName,

    // Progression
    level: i32,
    experience: i64,

    // Skill points (monotonically non-decreasing once saved)
    damage_skill_points: i32,
    defense_skill_points: i32,
    energy_skill_points: i32,

    // Stamina (None = full)
    stored_energy: Option<i32>,
    last_energy_refill_at: Option<DateTime<Utc>>,

    // Economy
    currency_balance: i64,

    // Membership
    clan_id: Option<ClanId>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a fresh level-1 character with full energy and no clan.
    pub fn new(name: CharacterName) -> Self {
        Self {
            id: CharacterId::new(),
            name,
            level: 1,
            experience: 0,
            damage_skill_points: 0,
            defense_skill_points: 0,
            energy_skill_points: 0,
            stored_energy: None,
            last_energy_refill_at: None,
            currency_balance: 0,
            clan_id: None,
        }
    }

    // =========================================================================
    // Builder Methods (used when loading from storage)
    // =========================================================================

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_level(mut self, level: i32, experience: i64) -> Self {
        self.level = level.clamp(1, progression::MAX_LEVEL);
        self.experience = experience.max(0);
        self
    }

    pub fn with_skill_points(mut self, damage: i32, defense: i32, energy: i32) -> Self {
        self.damage_skill_points = damage.max(0);
        self.defense_skill_points = defense.max(0);
        self.energy_skill_points = energy.max(0);
        self
    }

    pub fn with_energy(
        mut self,
        stored_energy: Option<i32>,
        last_refill_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.stored_energy = stored_energy;
        self.last_energy_refill_at = last_refill_at;
        self
    }

    pub fn with_currency(mut self, balance: i64) -> Self {
        self.currency_balance = balance.max(0);
        self
    }

    pub fn with_clan(mut self, clan_id: ClanId) -> Self {
        self.clan_id = Some(clan_id);
        self
    }

    // =========================================================================
    // Identity Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn clan_id(&self) -> Option<ClanId> {
        self.clan_id
    }

    // =========================================================================
    // Progression Accessors
    // =========================================================================

    #[inline]
    pub fn level(&self) -> i32 {
        self.level
    }

    #[inline]
    pub fn experience(&self) -> i64 {
        self.experience
    }

    /// Experience accumulated past the current level's threshold.
    pub fn xp_into_level(&self) -> i64 {
        self.experience - progression::xp_required_for_level(self.level)
    }

    /// Width of the XP band between this level and the next.
    pub fn xp_to_next_level(&self) -> i64 {
        progression::xp_to_next_level(self.level)
    }

    // =========================================================================
    // Derived Stats (never stored)
    // =========================================================================

    #[inline]
    pub fn damage(&self) -> i32 {
        BASE_COMBAT_STAT + self.damage_skill_points
    }

    #[inline]
    pub fn defense(&self) -> i32 {
        BASE_COMBAT_STAT + self.defense_skill_points
    }

    #[inline]
    pub fn max_energy(&self) -> i32 {
        BASE_MAX_ENERGY + self.energy_skill_points
    }

    #[inline]
    pub fn damage_skill_points(&self) -> i32 {
        self.damage_skill_points
    }

    #[inline]
    pub fn defense_skill_points(&self) -> i32 {
        self.defense_skill_points
    }

    #[inline]
    pub fn energy_skill_points(&self) -> i32 {
        self.energy_skill_points
    }

    pub fn skill_point_budget(&self) -> i32 {
        progression::skill_point_budget(self.level)
    }

    pub fn skill_points_spent(&self) -> i32 {
        self.damage_skill_points + self.defense_skill_points + self.energy_skill_points
    }

    pub fn skill_points_available(&self) -> i32 {
        self.skill_point_budget() - self.skill_points_spent()
    }

    // =========================================================================
    // Economy Accessors
    // =========================================================================

    #[inline]
    pub fn currency_balance(&self) -> i64 {
        self.currency_balance
    }

    // =========================================================================
    // Stamina Accessors
    // =========================================================================

    /// Current energy as stored; `None` in storage means "full".
    ///
    /// Run [`Character::refill_energy`] first if wall-clock regeneration
    /// should be applied.
    pub fn current_energy(&self) -> i32 {
        self.stored_energy
            .unwrap_or_else(|| self.max_energy())
            .min(self.max_energy())
    }

    #[inline]
    pub fn stored_energy(&self) -> Option<i32> {
        self.stored_energy
    }

    #[inline]
    pub fn last_energy_refill_at(&self) -> Option<DateTime<Utc>> {
        self.last_energy_refill_at
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Regenerate energy from elapsed wall-clock time.
    ///
    /// The refill clock advances by whole intervals rather than resetting
    /// to `now`, so partial progress toward the next tick is never lost.
    /// Calling again with no elapsed time is a no-op.
    pub fn refill_energy(&mut self, now: DateTime<Utc>, settings: &BattleSettings) -> EnergyRefill {
        let max = self.max_energy();

        let Some(last) = self.last_energy_refill_at else {
            // First observation initializes the clock at full energy.
            self.stored_energy = Some(max);
            self.last_energy_refill_at = Some(now);
            return EnergyRefill::Initialized { energy: max };
        };

        let stored = self.current_energy();
        let interval = settings.refill_interval_minutes.max(1);
        let intervals = (now - last).num_minutes() / interval;
        if intervals <= 0 {
            return EnergyRefill::Unchanged { energy: stored };
        }

        let per_interval = (f64::from(max) * settings.refill_fraction).round().max(1.0) as i32;
        let gained = (i64::from(per_interval) * intervals).min(i64::from(max)) as i32;
        let energy = (stored + gained).min(max);
        self.stored_energy = Some(energy);
        self.last_energy_refill_at = Some(last + Duration::minutes(intervals * interval));
        EnergyRefill::Ticked { energy, intervals }
    }

    /// Spend energy, rejecting the spend if it would go below zero.
    ///
    /// Callers must run [`Character::refill_energy`] first so the stored
    /// value is current.
    pub fn spend_energy(&mut self, cost: i32) -> SpendOutcome {
        let available = self.current_energy();
        if available < cost {
            return SpendOutcome::Insufficient {
                available,
                required: cost,
            };
        }
        let remaining = available - cost;
        self.stored_energy = Some(remaining);
        SpendOutcome::Spent { remaining }
    }

    /// Adjust energy by a signed amount, clamped to 0..=max. Returns the
    /// resulting energy. Used for instant item effects.
    pub fn adjust_energy(&mut self, delta: i32) -> i32 {
        let energy = (self.current_energy() + delta).clamp(0, self.max_energy());
        self.stored_energy = Some(energy);
        energy
    }

    /// Record earned experience and recompute the level monotonically.
    ///
    /// Leveling up force-refills energy to max, overriding whatever the
    /// regeneration step computed in the same transaction.
    pub fn grant_experience(&mut self, amount: i64) -> ExperienceOutcome {
        self.experience = self.experience.saturating_add(amount.max(0));
        let new_level = progression::level_for_experience(self.level, self.experience);
        if new_level > self.level {
            let from = self.level;
            self.level = new_level;
            self.stored_energy = Some(self.max_energy());
            return ExperienceOutcome::LeveledUp {
                from,
                to: new_level,
            };
        }
        ExperienceOutcome::Gained { level: self.level }
    }

    /// Add currency to the balance.
    pub fn grant_currency(&mut self, amount: i64) {
        self.currency_balance = self.currency_balance.saturating_add(amount.max(0));
    }

    /// Pay `price` from the balance, rejecting if funds are insufficient.
    pub fn pay_currency(&mut self, price: i64) -> PaymentOutcome {
        if self.currency_balance < price {
            return PaymentOutcome::InsufficientFunds {
                balance: self.currency_balance,
                price,
            };
        }
        self.currency_balance -= price;
        PaymentOutcome::Paid {
            balance: self.currency_balance,
        }
    }

    /// Set new per-stat skill point totals.
    ///
    /// Totals must not decrease any stat and their sum must fit the
    /// level's budget; anything else is rejected without mutation.
    pub fn allocate_skill_points(
        &mut self,
        damage: i32,
        defense: i32,
        energy: i32,
    ) -> AllocationOutcome {
        if damage < self.damage_skill_points
            || defense < self.defense_skill_points
            || energy < self.energy_skill_points
        {
            return AllocationOutcome::WouldDecrease;
        }
        let requested = damage + defense + energy;
        let budget = self.skill_point_budget();
        if requested > budget {
            return AllocationOutcome::OverBudget { requested, budget };
        }
        self.damage_skill_points = damage;
        self.defense_skill_points = defense;
        self.energy_skill_points = energy;
        AllocationOutcome::Allocated {
            spent: requested,
            available: budget - requested,
        }
    }

    /// Join a clan. A character belongs to at most one clan.
    pub fn join_clan(&mut self, clan_id: ClanId) {
        self.clan_id = Some(clan_id);
    }

    /// Leave the current clan.
    pub fn leave_clan(&mut self) {
        self.clan_id = None;
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Intermediate format for serialization that matches the wire format
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterWireFormat {
    id: CharacterId,
    name: CharacterName,
    level: i32,
    experience: i64,
    damage_skill_points: i32,
    defense_skill_points: i32,
    energy_skill_points: i32,
    stored_energy: Option<i32>,
    last_energy_refill_at: Option<DateTime<Utc>>,
    currency_balance: i64,
    clan_id: Option<ClanId>,
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            name: self.name.clone(),
            level: self.level,
            experience: self.experience,
            damage_skill_points: self.damage_skill_points,
            defense_skill_points: self.defense_skill_points,
            energy_skill_points: self.energy_skill_points,
            stored_energy: self.stored_energy,
            last_energy_refill_at: self.last_energy_refill_at,
            currency_balance: self.currency_balance,
            clan_id: self.clan_id,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CharacterWireFormat::deserialize(deserializer)?;
        Ok(Character {
            id: wire.id,
            name: wire.name,
            level: wire.level.clamp(1, progression::MAX_LEVEL),
            experience: wire.experience.max(0),
            damage_skill_points: wire.damage_skill_points.max(0),
            defense_skill_points: wire.defense_skill_points.max(0),
            energy_skill_points: wire.energy_skill_points.max(0),
            stored_energy: wire.stored_energy,
            last_energy_refill_at: wire.last_energy_refill_at,
            currency_balance: wire.currency_balance.max(0),
            clan_id: wire.clan_id,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
