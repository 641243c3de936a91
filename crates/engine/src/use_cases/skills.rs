//! Skill point allocation.
//!
//! Allocations arrive as new per-stat totals. Spending more than the
//! level's budget or decreasing previously spent points is rejected
//! outright - no clamping to "close enough" values.

use std::sync::Arc;

use classquest_domain::{AllocationOutcome, CharacterId};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Skill points already spent cannot be reclaimed")]
    WouldDecrease,
    #[error("Allocation of {requested} points exceeds the budget of {budget}")]
    OverBudget { requested: i32, budget: i32 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Allocation summary returned on success.
#[derive(Debug, Clone, Copy)]
pub struct SkillSummary {
    pub damage: i32,
    pub defense: i32,
    pub max_energy: i32,
    pub spent: i32,
    pub available: i32,
}

pub struct SkillUseCases {
    characters: Arc<dyn CharacterRepo>,
}

impl SkillUseCases {
    pub fn new(characters: Arc<dyn CharacterRepo>) -> Self {
        Self { characters }
    }

    /// Set new skill point totals for a character and persist them.
    pub async fn allocate(
        &self,
        character_id: CharacterId,
        damage: i32,
        defense: i32,
        energy: i32,
    ) -> Result<SkillSummary, SkillError> {
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(SkillError::CharacterNotFound)?;

        match character.allocate_skill_points(damage, defense, energy) {
            AllocationOutcome::WouldDecrease => Err(SkillError::WouldDecrease),
            AllocationOutcome::OverBudget { requested, budget } => {
                Err(SkillError::OverBudget { requested, budget })
            }
            AllocationOutcome::Allocated { spent, available } => {
                self.characters.save(&character).await?;
                tracing::info!(
                    character_id = %character_id,
                    spent,
                    available,
                    "skill points allocated"
                );
                Ok(SkillSummary {
                    damage: character.damage(),
                    defense: character.defense(),
                    max_energy: character.max_energy(),
                    spent,
                    available,
                })
            }
        }
    }
}
