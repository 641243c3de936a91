//! ClassQuest domain: the progression and territory-contest rules.
//!
//! This crate is pure: no I/O, no async, no ambient clock or randomness.
//! Time enters through method parameters and random draws are made by the
//! caller from ranges this crate computes. All state mutation goes through
//! aggregate methods that return outcome enums, so callers can react to
//! what actually happened instead of re-deriving it.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod progression;
pub mod value_objects;

pub use aggregates::{
    AllocationOutcome, CaptureOutcome, Character, CharacterRegionStats, EnergyRefill,
    ExperienceOutcome, PaymentOutcome, Region, SpendOutcome,
};
pub use entities::{ActiveBuff, BuffScope, Clan, Purchase, ShopItem};
pub use error::DomainError;
pub use ids::{BuffId, CharacterId, ClanId, ItemId, PurchaseId, RegionIndex, TaskId};
pub use value_objects::{
    normalize_sign, BattleSettings, CharacterName, ClanName, Effect, EffectKind, EffectTarget,
    ItemCategory,
};
