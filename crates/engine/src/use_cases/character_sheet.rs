//! Read-only derived views for UI rendering.
//!
//! The sheet runs the energy regeneration step before reporting, and
//! persists the character when that step moved state (first observation
//! initializes the refill clock, later reads tick it forward).

use std::sync::Arc;

use classquest_domain::{BattleSettings, CharacterId, ClanId, RegionIndex};

use crate::infrastructure::ports::{
    CharacterRepo, ClanRepo, ClockPort, RegionRepo, RepoError,
};

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Region not found")]
    RegionNotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Everything the client needs to render a character.
#[derive(Debug, Clone)]
pub struct CharacterSheet {
    pub name: String,
    pub level: i32,
    pub xp_into_level: i64,
    pub xp_to_next_level: i64,
    pub damage: i32,
    pub defense: i32,
    pub energy: i32,
    pub max_energy: i32,
    pub skill_point_budget: i32,
    pub skill_points_spent: i32,
    pub skill_points_available: i32,
    pub currency_balance: i64,
    pub clan_name: Option<String>,
}

/// A region as shown on the battle map.
#[derive(Debug, Clone, Copy)]
pub struct RegionView {
    pub index: RegionIndex,
    pub owner_clan_id: Option<ClanId>,
    pub strength: i32,
    pub locked: bool,
}

pub struct CharacterSheetUseCases {
    characters: Arc<dyn CharacterRepo>,
    clans: Arc<dyn ClanRepo>,
    regions: Arc<dyn RegionRepo>,
    clock: Arc<dyn ClockPort>,
    settings: BattleSettings,
}

impl CharacterSheetUseCases {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        clans: Arc<dyn ClanRepo>,
        regions: Arc<dyn RegionRepo>,
        clock: Arc<dyn ClockPort>,
        settings: BattleSettings,
    ) -> Self {
        Self {
            characters,
            clans,
            regions,
            clock,
            settings,
        }
    }

    pub async fn sheet(&self, character_id: CharacterId) -> Result<CharacterSheet, SheetError> {
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(SheetError::CharacterNotFound)?;

        let refill = character.refill_energy(self.clock.now(), &self.settings);
        if refill.is_dirty() {
            self.characters.save(&character).await?;
        }

        let clan_name = match character.clan_id() {
            Some(clan_id) => self
                .clans
                .get(clan_id)
                .await?
                .map(|clan| clan.name().as_str().to_owned()),
            None => None,
        };

        Ok(CharacterSheet {
            name: character.name().as_str().to_owned(),
            level: character.level(),
            xp_into_level: character.xp_into_level(),
            xp_to_next_level: character.xp_to_next_level(),
            damage: character.damage(),
            defense: character.defense(),
            energy: refill.energy(),
            max_energy: character.max_energy(),
            skill_point_budget: character.skill_point_budget(),
            skill_points_spent: character.skill_points_spent(),
            skill_points_available: character.skill_points_available(),
            currency_balance: character.currency_balance(),
            clan_name,
        })
    }

    pub async fn region_view(&self, index: RegionIndex) -> Result<RegionView, SheetError> {
        let region = self
            .regions
            .get(index)
            .await?
            .ok_or(SheetError::RegionNotFound)?;
        Ok(RegionView {
            index: region.index(),
            owner_clan_id: region.owner_clan_id(),
            strength: region.strength(),
            locked: region.is_locked(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use classquest_domain::{Character, CharacterName, Clan, ClanName, Region};

    use crate::infrastructure::clock::FixedClock;
    use crate::test_fixtures::InMemoryStore;

    fn fixed_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid timestamp")
    }

    fn sheets(store: &Arc<InMemoryStore>) -> CharacterSheetUseCases {
        CharacterSheetUseCases::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(FixedClock(fixed_time())),
            BattleSettings::default(),
        )
    }

    #[tokio::test]
    async fn sheet_reports_derived_stats_and_clan_name() {
        let store = Arc::new(InMemoryStore::new());
        let clan_id = ClanId::new();
        let character = Character::new(CharacterName::new("Hero").expect("valid name"))
            .with_level(5, 450)
            .with_skill_points(4, 2, 6)
            .with_currency(80)
            .with_energy(Some(3), Some(fixed_time()))
            .with_clan(clan_id);
        let clan = Clan::new(ClanName::new("9B").expect("valid name"), character.id())
            .with_id(clan_id);
        store.put_character(character.clone()).await;
        store.put_clan(clan).await;

        let sheet = sheets(&store)
            .sheet(character.id())
            .await
            .expect("sheet");

        assert_eq!(sheet.level, 5);
        // Level 5 threshold is 40 * 5 * 4 / 2 = 400.
        assert_eq!(sheet.xp_into_level, 50);
        assert_eq!(sheet.xp_to_next_level, 200);
        assert_eq!(sheet.damage, 9);
        assert_eq!(sheet.defense, 7);
        assert_eq!(sheet.energy, 3);
        assert_eq!(sheet.max_energy, 16);
        assert_eq!(sheet.skill_points_spent, 12);
        assert_eq!(sheet.skill_point_budget, 22);
        assert_eq!(sheet.skill_points_available, 10);
        assert_eq!(sheet.currency_balance, 80);
        assert_eq!(sheet.clan_name.as_deref(), Some("9B"));
    }

    #[tokio::test]
    async fn sheet_persists_the_refill_it_applied() {
        let store = Arc::new(InMemoryStore::new());
        let character = Character::new(CharacterName::new("Hero").expect("valid name"))
            .with_energy(Some(0), Some(fixed_time() - Duration::minutes(90)));
        store.put_character(character.clone()).await;

        let sheet = sheets(&store)
            .sheet(character.id())
            .await
            .expect("sheet");

        assert_eq!(sheet.energy, 6);
        let saved = store.character(character.id()).await.expect("exists");
        assert_eq!(saved.stored_energy(), Some(6));
        assert_eq!(saved.last_energy_refill_at(), Some(fixed_time()));
    }

    #[tokio::test]
    async fn first_observation_initializes_the_refill_clock() {
        let store = Arc::new(InMemoryStore::new());
        let character = Character::new(CharacterName::new("Hero").expect("valid name"));
        store.put_character(character.clone()).await;

        let sheet = sheets(&store)
            .sheet(character.id())
            .await
            .expect("sheet");

        assert_eq!(sheet.energy, 10);
        let saved = store.character(character.id()).await.expect("exists");
        assert_eq!(saved.last_energy_refill_at(), Some(fixed_time()));
    }

    #[tokio::test]
    async fn region_view_mirrors_the_region_row() {
        let store = Arc::new(InMemoryStore::new());
        let clan_id = ClanId::new();
        let index = RegionIndex::new(4);
        store
            .put_region(Region::new(index).with_owner(clan_id, 300).with_locked(true))
            .await;

        let view = sheets(&store).region_view(index).await.expect("view");

        assert_eq!(view.owner_clan_id, Some(clan_id));
        assert_eq!(view.strength, 300);
        assert!(view.locked);
    }
}
