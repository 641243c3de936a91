//! Value objects - Immutable objects defined by their attributes

mod effect;
mod names;
mod settings;

pub use effect::{normalize_sign, Effect, EffectKind, EffectTarget, ItemCategory};
pub use names::{CharacterName, ClanName};
pub use settings::BattleSettings;
