//! Effect value objects for shop items and buffs
//!
//! An item carries an ordered list of effects. Each effect names the stat
//! it modifies, a percentage change, the scope it targets, and an optional
//! duration. Sign normalization is a pure function here so the rule
//! "curses always harm, enhancements always help" lives in exactly one
//! place, regardless of how the percentage was authored.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Shop item category. Determines the sign of every effect the item
/// carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Enhancement,
    Curse,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::Enhancement => write!(f, "enhancement"),
            ItemCategory::Curse => write!(f, "curse"),
        }
    }
}

impl FromStr for ItemCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enhancement" => Ok(ItemCategory::Enhancement),
            "curse" => Ok(ItemCategory::Curse),
            _ => Err(DomainError::parse(format!("Invalid item category: {}", s))),
        }
    }
}

/// Stat category an effect modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Damage,
    Defense,
    CurrentEnergy,
    MaxEnergy,
    XpReward,
    NumsReward,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectKind::Damage => write!(f, "damage"),
            EffectKind::Defense => write!(f, "defense"),
            EffectKind::CurrentEnergy => write!(f, "currentEnergy"),
            EffectKind::MaxEnergy => write!(f, "maxEnergy"),
            EffectKind::XpReward => write!(f, "xpReward"),
            EffectKind::NumsReward => write!(f, "numsReward"),
        }
    }
}

impl FromStr for EffectKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "damage" => Ok(EffectKind::Damage),
            "defense" => Ok(EffectKind::Defense),
            "currentEnergy" => Ok(EffectKind::CurrentEnergy),
            "maxEnergy" => Ok(EffectKind::MaxEnergy),
            "xpReward" => Ok(EffectKind::XpReward),
            "numsReward" => Ok(EffectKind::NumsReward),
            _ => Err(DomainError::parse(format!("Invalid effect kind: {}", s))),
        }
    }
}

/// Scope an effect targets when the item is used.
///
/// A closed variant rather than a string-valued column, so scope matching
/// stays exhaustive and compiler-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectTarget {
    /// The character using the item.
    #[serde(rename = "self")]
    SelfOnly,
    /// Every member of the user's clan.
    Clan,
    /// Every actor interacting with a chosen region.
    Region,
}

impl fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectTarget::SelfOnly => write!(f, "self"),
            EffectTarget::Clan => write!(f, "clan"),
            EffectTarget::Region => write!(f, "region"),
        }
    }
}

impl FromStr for EffectTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self" => Ok(EffectTarget::SelfOnly),
            "clan" => Ok(EffectTarget::Clan),
            "region" => Ok(EffectTarget::Region),
            _ => Err(DomainError::parse(format!("Invalid effect target: {}", s))),
        }
    }
}

/// A single stat modifier carried by a shop item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    kind: EffectKind,
    /// Percentage change as authored; sign is normalized by the item
    /// category at aggregation time, not here.
    percent_change: f64,
    target: EffectTarget,
    /// None = unlimited while the buff exists.
    duration_minutes: Option<i64>,
}

impl Effect {
    pub fn new(
        kind: EffectKind,
        percent_change: f64,
        target: EffectTarget,
        duration_minutes: Option<i64>,
    ) -> Self {
        Self {
            kind,
            percent_change,
            target,
            duration_minutes,
        }
    }

    #[inline]
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    #[inline]
    pub fn percent_change(&self) -> f64 {
        self.percent_change
    }

    #[inline]
    pub fn target(&self) -> EffectTarget {
        self.target
    }

    #[inline]
    pub fn duration_minutes(&self) -> Option<i64> {
        self.duration_minutes
    }

    /// Lazy expiry check: an effect with a finite duration stops applying
    /// once `now` passes `used_at + duration`. Unlimited effects never
    /// expire on their own.
    pub fn is_expired(&self, used_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.duration_minutes {
            Some(minutes) => now > used_at + Duration::minutes(minutes),
            None => false,
        }
    }
}

/// Normalize an authored percentage by the item category.
///
/// Curses always harm (forced negative) and enhancements always help
/// (forced positive), regardless of the sign the percentage was authored
/// with.
pub fn normalize_sign(category: ItemCategory, raw_pct: f64) -> f64 {
    match category {
        ItemCategory::Enhancement => raw_pct.abs(),
        ItemCategory::Curse => -raw_pct.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, minute, 0).single().expect("valid time")
    }

    mod sign_normalization {
        use super::*;

        #[test]
        fn enhancement_forces_positive() {
            assert_eq!(normalize_sign(ItemCategory::Enhancement, -10.0), 10.0);
            assert_eq!(normalize_sign(ItemCategory::Enhancement, 10.0), 10.0);
        }

        #[test]
        fn curse_forces_negative() {
            assert_eq!(normalize_sign(ItemCategory::Curse, 10.0), -10.0);
            assert_eq!(normalize_sign(ItemCategory::Curse, -10.0), -10.0);
        }
    }

    mod expiry {
        use super::*;

        #[test]
        fn unlimited_effect_never_expires() {
            let effect = Effect::new(EffectKind::Damage, 10.0, EffectTarget::SelfOnly, None);
            assert!(!effect.is_expired(at(0), at(59)));
        }

        #[test]
        fn finite_effect_expires_strictly_after_duration() {
            let effect = Effect::new(EffectKind::Damage, 10.0, EffectTarget::SelfOnly, Some(30));
            assert!(!effect.is_expired(at(0), at(30)));
            assert!(effect.is_expired(at(0), at(31)));
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn effect_target_parses_wire_strings() {
            assert_eq!("self".parse::<EffectTarget>().expect("parse"), EffectTarget::SelfOnly);
            assert_eq!("clan".parse::<EffectTarget>().expect("parse"), EffectTarget::Clan);
            assert!("world".parse::<EffectTarget>().is_err());
        }

        #[test]
        fn effect_serializes_with_camel_case_kind() {
            let effect = Effect::new(EffectKind::XpReward, 15.0, EffectTarget::Clan, Some(60));
            let json = serde_json::to_string(&effect).expect("serialize");
            assert!(json.contains("\"xpReward\""));
            let back: Effect = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, effect);
        }
    }
}
