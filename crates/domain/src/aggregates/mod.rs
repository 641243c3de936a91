//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns outcome enums from mutations

mod character;
mod region;
mod region_stats;

pub use character::{
    AllocationOutcome, Character, EnergyRefill, ExperienceOutcome, PaymentOutcome, SpendOutcome,
};
pub use region::{CaptureOutcome, Region};
pub use region_stats::CharacterRegionStats;
