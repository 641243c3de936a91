//! Shared fixtures: an in-memory store backing every repo port, and a
//! deterministic task generator stub.

use std::collections::HashMap;

use async_trait::async_trait;
use classquest_domain::{
    ActiveBuff, BuffId, BuffScope, Character, CharacterId, CharacterRegionStats, Clan, ClanId,
    ItemId, Purchase, PurchaseId, Region, RegionIndex, ShopItem, TaskId,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{
    BuffRepo, CharacterRepo, ClanRepo, GeneratedTask, IssuedTask, PurchaseRepo, RegionRepo,
    RegionStatsRepo, RepoError, ShopItemRepo, SubmissionWrites, TaskGenError, TaskGeneratorPort,
    TaskRepo, UnitOfWork,
};

/// One struct implementing every storage port, for end-to-end flows
/// without a database.
#[derive(Default)]
pub struct InMemoryStore {
    characters: RwLock<HashMap<CharacterId, Character>>,
    clans: RwLock<HashMap<ClanId, Clan>>,
    regions: RwLock<HashMap<RegionIndex, Region>>,
    stats: RwLock<HashMap<CharacterId, CharacterRegionStats>>,
    buffs: RwLock<HashMap<BuffId, ActiveBuff>>,
    items: RwLock<HashMap<ItemId, ShopItem>>,
    purchases: RwLock<HashMap<PurchaseId, Purchase>>,
    tasks: RwLock<HashMap<TaskId, IssuedTask>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Seeding and inspection helpers for tests.

    pub async fn put_character(&self, character: Character) {
        self.characters.write().await.insert(character.id(), character);
    }

    pub async fn character(&self, id: CharacterId) -> Option<Character> {
        self.characters.read().await.get(&id).cloned()
    }

    pub async fn put_clan(&self, clan: Clan) {
        self.clans.write().await.insert(clan.id(), clan);
    }

    pub async fn put_region(&self, region: Region) {
        self.regions.write().await.insert(region.index(), region);
    }

    pub async fn region(&self, index: RegionIndex) -> Option<Region> {
        self.regions.read().await.get(&index).cloned()
    }

    pub async fn stats_for(&self, id: CharacterId) -> Option<CharacterRegionStats> {
        self.stats.read().await.get(&id).cloned()
    }

    pub async fn put_item(&self, item: ShopItem) {
        self.items.write().await.insert(item.id(), item);
    }

    pub async fn put_buff(&self, buff: ActiveBuff) {
        self.buffs.write().await.insert(buff.id(), buff);
    }

    pub async fn buff_count(&self) -> usize {
        self.buffs.read().await.len()
    }

    pub async fn task(&self, id: TaskId) -> Option<IssuedTask> {
        self.tasks.read().await.get(&id).cloned()
    }

    pub async fn purchases_for(&self, id: CharacterId) -> Vec<Purchase> {
        self.purchases
            .read()
            .await
            .values()
            .filter(|p| p.character_id() == id)
            .copied()
            .collect()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryStore {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.read().await.get(&id).cloned())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters
            .write()
            .await
            .insert(character.id(), character.clone());
        Ok(())
    }
}

#[async_trait]
impl ClanRepo for InMemoryStore {
    async fn get(&self, id: ClanId) -> Result<Option<Clan>, RepoError> {
        Ok(self.clans.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl RegionRepo for InMemoryStore {
    async fn get(&self, index: RegionIndex) -> Result<Option<Region>, RepoError> {
        Ok(self.regions.read().await.get(&index).cloned())
    }

    async fn save(&self, region: &Region) -> Result<(), RepoError> {
        self.regions
            .write()
            .await
            .insert(region.index(), region.clone());
        Ok(())
    }
}

#[async_trait]
impl RegionStatsRepo for InMemoryStore {
    async fn get(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CharacterRegionStats>, RepoError> {
        Ok(self.stats.read().await.get(&character_id).cloned())
    }

    async fn save(&self, stats: &CharacterRegionStats) -> Result<(), RepoError> {
        self.stats
            .write()
            .await
            .insert(stats.character_id(), stats.clone());
        Ok(())
    }
}

#[async_trait]
impl BuffRepo for InMemoryStore {
    async fn list_for_scope(&self, scope: BuffScope) -> Result<Vec<ActiveBuff>, RepoError> {
        Ok(self
            .buffs
            .read()
            .await
            .values()
            .filter(|b| b.scope() == scope)
            .copied()
            .collect())
    }

    async fn create(&self, buff: &ActiveBuff) -> Result<(), RepoError> {
        self.buffs.write().await.insert(buff.id(), *buff);
        Ok(())
    }
}

#[async_trait]
impl ShopItemRepo for InMemoryStore {
    async fn get(&self, id: ItemId) -> Result<Option<ShopItem>, RepoError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<ShopItem>, RepoError> {
        Ok(self.items.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl PurchaseRepo for InMemoryStore {
    async fn get(&self, id: PurchaseId) -> Result<Option<Purchase>, RepoError> {
        Ok(self.purchases.read().await.get(&id).copied())
    }

    async fn create(&self, purchase: &Purchase) -> Result<(), RepoError> {
        self.purchases.write().await.insert(purchase.id(), *purchase);
        Ok(())
    }

    async fn delete(&self, id: PurchaseId) -> Result<(), RepoError> {
        self.purchases.write().await.remove(&id);
        Ok(())
    }

    async fn list_for_character(&self, id: CharacterId) -> Result<Vec<Purchase>, RepoError> {
        Ok(self.purchases_for(id).await)
    }
}

#[async_trait]
impl TaskRepo for InMemoryStore {
    async fn get(&self, id: TaskId) -> Result<Option<IssuedTask>, RepoError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn save(&self, task: &IssuedTask) -> Result<(), RepoError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn take(&self, id: TaskId) -> Result<Option<IssuedTask>, RepoError> {
        Ok(self.tasks.write().await.remove(&id))
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    async fn commit_submission(&self, writes: SubmissionWrites) -> Result<(), RepoError> {
        if let Some(character) = writes.character {
            self.characters
                .write()
                .await
                .insert(character.id(), character);
        }
        if let Some(region) = writes.region {
            self.regions.write().await.insert(region.index(), region);
        }
        if let Some(stats) = writes.stats {
            self.stats.write().await.insert(stats.character_id(), stats);
        }
        let mut buffs = self.buffs.write().await;
        for id in &writes.consumed_buff_ids {
            buffs.remove(id);
        }
        Ok(())
    }
}

/// Deterministic generator: one fixed prompt, exact-match scoring.
pub struct StubTaskGenerator {
    prompt: String,
    scoring_data: String,
    reward_points: i64,
}

impl StubTaskGenerator {
    pub fn new(
        prompt: impl Into<String>,
        scoring_data: impl Into<String>,
        reward_points: i64,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            scoring_data: scoring_data.into(),
            reward_points,
        }
    }
}

#[async_trait]
impl TaskGeneratorPort for StubTaskGenerator {
    async fn generate(&self, _difficulty_tier: u8) -> Result<GeneratedTask, TaskGenError> {
        Ok(GeneratedTask {
            prompt: self.prompt.clone(),
            scoring_data: self.scoring_data.clone(),
            reward_points: self.reward_points,
        })
    }

    async fn verify(&self, scoring_data: &str, answer: &str) -> Result<bool, TaskGenError> {
        Ok(scoring_data == answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn a_task_can_be_taken_exactly_once() {
        let store = InMemoryStore::new();
        let task = IssuedTask {
            id: TaskId::new(),
            character_id: CharacterId::new(),
            region_index: RegionIndex::new(1),
            prompt: "17 * 3 = ?".to_owned(),
            scoring_data: "51".to_owned(),
            reward_points: 40,
            issued_at: Utc::now(),
        };
        TaskRepo::save(&store, &task).await.expect("saved");

        let first = TaskRepo::take(&store, task.id).await.expect("take");
        assert_eq!(first.map(|t| t.id), Some(task.id));
        let second = TaskRepo::take(&store, task.id).await.expect("take");
        assert!(second.is_none());
        assert!(TaskRepo::get(&store, task.id)
            .await
            .expect("get")
            .is_none());
    }
}
