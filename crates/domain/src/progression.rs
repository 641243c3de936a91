//! Progression calculator: the level curve, skill-point budget, and reward
//! ranges.
//!
//! Everything here is a pure, total function of its inputs. Leaderboards and
//! game balance depend on exact integer arithmetic, so the XP formulas use
//! integer (floor) division throughout - never floating point.
//!
//! The curve has two growth regimes: levels up to [`FAST_LEVEL_CEILING`]
//! cost half as much XP per level as the levels above it.

use std::ops::RangeInclusive;

/// Hard level cap; `level_for_experience` never exceeds it.
pub const MAX_LEVEL: i32 = 100;

/// Last level of the fast growth regime.
pub const FAST_LEVEL_CEILING: i32 = 10;

const FAST_XP_BASE: i64 = 40;
const SLOW_XP_BASE: i64 = 80;

/// Per-level XP base, keyed on the level itself.
fn xp_base(level: i32) -> i64 {
    if level <= FAST_LEVEL_CEILING {
        FAST_XP_BASE
    } else {
        SLOW_XP_BASE
    }
}

/// Total experience required to hold `level`.
///
/// Level 1 (and below) requires nothing; otherwise the threshold is
/// `base(L) * L * (L - 1) / 2`, which divides exactly since `L * (L - 1)`
/// is always even.
pub fn xp_required_for_level(level: i32) -> i64 {
    if level <= 1 {
        return 0;
    }
    let l = i64::from(level);
    xp_base(level) * l * (l - 1) / 2
}

/// Width of the XP band between `level` and `level + 1`, keyed on the
/// current level.
pub fn xp_to_next_level(level: i32) -> i64 {
    xp_base(level) * i64::from(level)
}

/// Largest level (capped at [`MAX_LEVEL`]) whose threshold the experience
/// total meets, scanning upward from the stored level.
///
/// Scanning upward makes leveling monotonic and idempotent: a character
/// never loses a level already reached, even where the thresholds would
/// disagree with the stored value.
pub fn level_for_experience(stored_level: i32, experience: i64) -> i32 {
    let mut level = stored_level.max(1);
    while level < MAX_LEVEL && xp_required_for_level(level + 1) <= experience {
        level += 1;
    }
    level
}

/// Total skill points granted by `level`: 10 at level 1, plus 3 per level
/// gained after that.
pub fn skill_point_budget(level: i32) -> i32 {
    10 + (level - 1).max(0) * 3
}

/// Inclusive currency reward range for a correct answer at `level`.
///
/// The engine draws a uniform random integer from this range. The lower
/// bound never drops below 10.
pub fn currency_reward_range(level: i32) -> RangeInclusive<i64> {
    let base = 40 + 5 * i64::from(level);
    let spread = 5 + i64::from(level) / 3;
    (base - spread).max(10)..=(base + spread)
}

/// Task difficulty tier fed to the external task generator.
pub fn difficulty_tier(level: i32) -> u8 {
    if level < 10 {
        1
    } else if level <= 20 {
        2
    } else {
        3
    }
}
