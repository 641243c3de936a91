//! The two player-facing battle operations: request a task and submit an
//! answer.
//!
//! Requesting spends energy on issuance, before the player sees the
//! question. Submitting grants XP/currency, resolves the region contest
//! and consumes one-shot buffs. Every validation failure aborts before
//! any write - a rejected request never costs energy.

use std::sync::Arc;

use classquest_domain::{
    progression, BattleSettings, CaptureOutcome, CharacterId, CharacterRegionStats, ClanId,
    EffectKind, ExperienceOutcome, RegionIndex, SpendOutcome, TaskId,
};

use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, IssuedTask, RandomPort, RegionRepo, RegionStatsRepo, RepoError,
    SubmissionWrites, TaskGenError, TaskGeneratorPort, TaskRepo, UnitOfWork,
};
use crate::infrastructure::region_locks::RegionLockRegistry;
use crate::use_cases::effects::{adjusted_power, EffectAggregator};

#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Region not found")]
    RegionNotFound,
    #[error("Task not found")]
    TaskNotFound,
    #[error("Character has no clan")]
    MissingClan,
    #[error("Region is locked")]
    RegionLocked,
    #[error("Insufficient energy: {available} available, {required} required")]
    InsufficientEnergy { available: i32, required: i32 },
    #[error("Task was issued for a different character or region")]
    TaskMismatch,
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    TaskGen(#[from] TaskGenError),
}

/// What the player sees after requesting a task.
#[derive(Debug, Clone)]
pub struct TaskDescription {
    pub task_id: TaskId,
    pub prompt: String,
    pub difficulty_tier: u8,
    pub energy_remaining: i32,
}

/// Result of scoring a submitted answer.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// Wrong answer. One-shot buffs were still consumed; nothing else
    /// changed.
    Incorrect,
    Correct(Box<BattleReport>),
}

/// Post-submission state for client display.
#[derive(Debug, Clone)]
pub struct BattleReport {
    pub level: i32,
    pub leveled_up: bool,
    pub xp_into_level: i64,
    pub xp_to_next_level: i64,
    pub energy: i32,
    pub currency_awarded: i64,
    pub capture: CaptureOutcome,
    pub region_owner: Option<ClanId>,
    pub region_strength: i32,
}

/// Orchestrates the task-issue and answer-submission flows.
pub struct BattleUseCases {
    characters: Arc<dyn CharacterRepo>,
    regions: Arc<dyn RegionRepo>,
    stats: Arc<dyn RegionStatsRepo>,
    tasks: Arc<dyn TaskRepo>,
    store: Arc<dyn UnitOfWork>,
    generator: Arc<dyn TaskGeneratorPort>,
    effects: Arc<EffectAggregator>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    region_locks: Arc<RegionLockRegistry>,
    settings: BattleSettings,
}

impl BattleUseCases {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        regions: Arc<dyn RegionRepo>,
        stats: Arc<dyn RegionStatsRepo>,
        tasks: Arc<dyn TaskRepo>,
        store: Arc<dyn UnitOfWork>,
        generator: Arc<dyn TaskGeneratorPort>,
        effects: Arc<EffectAggregator>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        region_locks: Arc<RegionLockRegistry>,
        settings: BattleSettings,
    ) -> Self {
        Self {
            characters,
            regions,
            stats,
            tasks,
            store,
            generator,
            effects,
            clock,
            random,
            region_locks,
            settings,
        }
    }

    /// Issue a task against a region, spending energy up front.
    ///
    /// Validation order matters: clan membership, region state and energy
    /// are all checked before anything is written, so a rejection leaves
    /// the character untouched.
    pub async fn request_task(
        &self,
        character_id: CharacterId,
        region_index: RegionIndex,
    ) -> Result<TaskDescription, BattleError> {
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(BattleError::CharacterNotFound)?;
        if character.clan_id().is_none() {
            return Err(BattleError::MissingClan);
        }
        let region = self
            .regions
            .get(region_index)
            .await?
            .ok_or(BattleError::RegionNotFound)?;
        if region.is_locked() {
            return Err(BattleError::RegionLocked);
        }

        let now = self.clock.now();
        character.refill_energy(now, &self.settings);
        match character.spend_energy(self.settings.task_energy_cost) {
            SpendOutcome::Insufficient {
                available,
                required,
            } => {
                return Err(BattleError::InsufficientEnergy {
                    available,
                    required,
                })
            }
            SpendOutcome::Spent { .. } => {}
        }

        let tier = progression::difficulty_tier(character.level());
        let generated = self.generator.generate(tier).await?;
        let task = IssuedTask {
            id: TaskId::new(),
            character_id,
            region_index,
            prompt: generated.prompt,
            scoring_data: generated.scoring_data,
            reward_points: generated.reward_points,
            issued_at: now,
        };
        self.tasks.save(&task).await?;
        self.characters.save(&character).await?;

        tracing::info!(
            character_id = %character_id,
            region_index = region_index.value(),
            task_id = %task.id,
            tier,
            "issued task"
        );
        Ok(TaskDescription {
            task_id: task.id,
            prompt: task.prompt,
            difficulty_tier: tier,
            energy_remaining: character.current_energy(),
        })
    }

    /// Score a submitted answer and apply its consequences.
    ///
    /// An incorrect answer consumes one-shot buffs and changes nothing
    /// else. A correct answer grants XP and currency, resolves the region
    /// contest under the per-region lock, and records lifetime stats. All
    /// writes land in one unit-of-work commit.
    pub async fn submit_answer(
        &self,
        character_id: CharacterId,
        region_index: RegionIndex,
        task_id: TaskId,
        answer: &str,
    ) -> Result<SubmissionOutcome, BattleError> {
        let task = self
            .tasks
            .get(task_id)
            .await?
            .ok_or(BattleError::TaskNotFound)?;
        if task.character_id != character_id || task.region_index != region_index {
            return Err(BattleError::TaskMismatch);
        }
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(BattleError::CharacterNotFound)?;
        let clan_id = character.clan_id().ok_or(BattleError::MissingClan)?;
        let region = self
            .regions
            .get(region_index)
            .await?
            .ok_or(BattleError::RegionNotFound)?;
        if region.is_locked() {
            return Err(BattleError::RegionLocked);
        }

        // A generator outage aborts here with the task still issued; the
        // player can resubmit the same task once the generator is back.
        let correct = self.generator.verify(&task.scoring_data, answer).await?;

        let consumed_buff_ids = self
            .effects
            .one_shot_buff_ids(character_id, Some(clan_id), Some(region_index))
            .await?;

        // Taking the task is the single-scoring point: of two racing
        // submissions of the same task, exactly one gets it.
        let Some(task) = self.tasks.take(task_id).await? else {
            return Err(BattleError::TaskNotFound);
        };

        if !correct {
            self.store
                .commit_submission(SubmissionWrites {
                    consumed_buff_ids,
                    ..SubmissionWrites::default()
                })
                .await?;
            tracing::info!(character_id = %character_id, task_id = %task_id, "incorrect answer");
            return Ok(SubmissionOutcome::Incorrect);
        }

        let totals = self
            .effects
            .totals(character_id, Some(clan_id), Some(region_index))
            .await?;

        let now = self.clock.now();
        character.refill_energy(now, &self.settings);

        let effective_xp =
            (task.reward_points as f64 * totals.multiplier(EffectKind::XpReward)).round() as i64;
        let xp_outcome = character.grant_experience(effective_xp.max(0));
        let leveled_up = matches!(xp_outcome, ExperienceOutcome::LeveledUp { .. });

        let range = progression::currency_reward_range(character.level());
        let draw = self.random.gen_range(*range.start(), *range.end());
        let currency_awarded =
            ((draw as f64 * totals.multiplier(EffectKind::NumsReward)).round() as i64).max(0);
        character.grant_currency(currency_awarded);

        // Region transition under the per-region lock: re-read so the
        // attempt applies to current strength, not a stale snapshot.
        let (capture, region) = {
            let _guard = self.region_locks.acquire(region_index).await;
            let mut region = self
                .regions
                .get(region_index)
                .await?
                .ok_or(BattleError::RegionNotFound)?;
            let is_own = region.is_held_by(clan_id);
            let (base, pct) = if is_own {
                (character.defense(), totals.pct(EffectKind::Defense))
            } else {
                (character.damage(), totals.pct(EffectKind::Damage))
            };
            let power = adjusted_power(base, pct);
            let capture = region.resolve_attempt(clan_id, power, &self.settings);
            if capture == CaptureOutcome::Locked {
                return Err(BattleError::RegionLocked);
            }
            let mut stats = self
                .stats
                .get(character_id)
                .await?
                .unwrap_or_else(|| CharacterRegionStats::new(character_id));
            stats.record(&capture, power);

            // One commit for the whole grant: a mid-batch failure must not
            // record the capture without the XP/currency that earned it.
            self.store
                .commit_submission(SubmissionWrites {
                    character: Some(character.clone()),
                    region: Some(region.clone()),
                    stats: Some(stats),
                    consumed_buff_ids,
                })
                .await?;
            (capture, region)
        };

        tracing::info!(
            character_id = %character_id,
            region_index = region_index.value(),
            level = character.level(),
            leveled_up,
            currency_awarded,
            "correct answer scored"
        );
        Ok(SubmissionOutcome::Correct(Box::new(BattleReport {
            level: character.level(),
            leveled_up,
            xp_into_level: character.xp_into_level(),
            xp_to_next_level: character.xp_to_next_level(),
            energy: character.current_energy(),
            currency_awarded,
            capture,
            region_owner: region.owner_clan_id(),
            region_strength: region.strength(),
        })))
    }
}
