//! Use cases - orchestration of domain rules over the storage ports.

pub mod battle;
pub mod character_sheet;
pub mod effects;
pub mod shop;
pub mod skills;

pub use battle::{BattleError, BattleReport, BattleUseCases, SubmissionOutcome, TaskDescription};
pub use character_sheet::{CharacterSheet, CharacterSheetUseCases, RegionView, SheetError};
pub use effects::{adjusted_power, EffectAggregator, EffectTotals};
pub use shop::{PurchaseReceipt, ShopError, ShopUseCases, UseReceipt};
pub use skills::{SkillError, SkillSummary, SkillUseCases};
