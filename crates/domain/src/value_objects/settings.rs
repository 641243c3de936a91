//! Battle settings value object
//!
//! Tunable constants of the territory battle, passed into the engine at
//! construction instead of living as ambient globals. A deployment loads
//! one `BattleSettings` and hands it to the use cases; the domain never
//! reads configuration on its own.

use serde::{Deserialize, Serialize};

/// Tunable constants of the progression and territory-contest rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BattleSettings {
    /// Energy spent when a task is issued (spent on issuance, not on a
    /// correct answer).
    pub task_energy_cost: i32,

    /// Minutes between energy regeneration ticks.
    pub refill_interval_minutes: i64,

    /// Fraction of max energy restored per tick (at least 1 point).
    pub refill_fraction: f64,

    /// Upper bound on a region's strength.
    pub strength_cap: i32,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            task_energy_cost: 1,
            refill_interval_minutes: 30,
            refill_fraction: 0.2,
            strength_cap: 1000,
        }
    }
}
