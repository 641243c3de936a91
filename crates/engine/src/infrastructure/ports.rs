//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is
//! concrete types. Ports exist for:
//! - Storage (could swap in-memory -> Postgres)
//! - Task generation (external problem generator)
//! - Clock/Random (for testing)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classquest_domain::{
    ActiveBuff, BuffId, BuffScope, Character, CharacterId, CharacterRegionStats, Clan, ClanId,
    ItemId, Purchase, PurchaseId, Region, RegionIndex, ShopItem, TaskId,
};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TaskGenError {
    #[error("Task generation failed: {0}")]
    GenerationFailed(String),
}

// =============================================================================
// Infrastructure Types
// =============================================================================

/// A freshly generated task from the external problem generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTask {
    pub prompt: String,
    /// Opaque data the generator needs to score an answer.
    pub scoring_data: String,
    /// Base experience awarded on a correct answer, before buffs.
    pub reward_points: i64,
}

/// A task handed to a player, held until an answer arrives. Storage
/// adapters persist it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedTask {
    pub id: TaskId,
    pub character_id: CharacterId,
    pub region_index: RegionIndex,
    pub prompt: String,
    pub scoring_data: String,
    pub reward_points: i64,
    pub issued_at: DateTime<Utc>,
}

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClanRepo: Send + Sync {
    async fn get(&self, id: ClanId) -> Result<Option<Clan>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionRepo: Send + Sync {
    async fn get(&self, index: RegionIndex) -> Result<Option<Region>, RepoError>;
    async fn save(&self, region: &Region) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionStatsRepo: Send + Sync {
    async fn get(&self, character_id: CharacterId)
        -> Result<Option<CharacterRegionStats>, RepoError>;
    async fn save(&self, stats: &CharacterRegionStats) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuffRepo: Send + Sync {
    /// All buffs bound to exactly this scope. Expiry is not filtered here;
    /// the aggregator discards expired effects at read time.
    async fn list_for_scope(&self, scope: BuffScope) -> Result<Vec<ActiveBuff>, RepoError>;
    async fn create(&self, buff: &ActiveBuff) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopItemRepo: Send + Sync {
    async fn get(&self, id: ItemId) -> Result<Option<ShopItem>, RepoError>;
    async fn list(&self) -> Result<Vec<ShopItem>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseRepo: Send + Sync {
    async fn get(&self, id: PurchaseId) -> Result<Option<Purchase>, RepoError>;
    async fn create(&self, purchase: &Purchase) -> Result<(), RepoError>;
    async fn delete(&self, id: PurchaseId) -> Result<(), RepoError>;
    async fn list_for_character(&self, id: CharacterId) -> Result<Vec<Purchase>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepo: Send + Sync {
    async fn get(&self, id: TaskId) -> Result<Option<IssuedTask>, RepoError>;
    async fn save(&self, task: &IssuedTask) -> Result<(), RepoError>;
    /// Remove and return the task in a single step. Of two racing takes
    /// of the same id, exactly one observes the task; the other gets
    /// `None`.
    async fn take(&self, id: TaskId) -> Result<Option<IssuedTask>, RepoError>;
}

// =============================================================================
// Transaction Port
// =============================================================================

/// Everything a scored submission writes, handed to the store as one
/// batch. Absent fields were untouched by the submission.
#[derive(Debug, Clone, Default)]
pub struct SubmissionWrites {
    pub character: Option<Character>,
    pub region: Option<Region>,
    pub stats: Option<CharacterRegionStats>,
    pub consumed_buff_ids: Vec<BuffId>,
}

/// Transaction demarcation for the submission path.
///
/// An adapter backs `commit_submission` with a database transaction:
/// either every write in the batch lands or none does. A partial commit
/// would record a region capture without the XP/currency that earned it,
/// or vice versa.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn commit_submission(&self, writes: SubmissionWrites) -> Result<(), RepoError>;
}

// =============================================================================
// External Service Ports
// =============================================================================

/// The external problem generator. The engine only ever asks for a task at
/// a difficulty tier and for a verdict on an answer; prompt text and
/// scoring rules are entirely the generator's business.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskGeneratorPort: Send + Sync {
    async fn generate(&self, difficulty_tier: u8) -> Result<GeneratedTask, TaskGenError>;
    async fn verify(&self, scoring_data: &str, answer: &str) -> Result<bool, TaskGenError>;
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait RandomPort: Send + Sync {
    /// Uniform draw from the inclusive range `min..=max`.
    fn gen_range(&self, min: i64, max: i64) -> i64;
}
