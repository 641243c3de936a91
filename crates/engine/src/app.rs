//! Application state and composition.

use std::sync::Arc;

use classquest_domain::BattleSettings;

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    ports::{
        BuffRepo, CharacterRepo, ClanRepo, ClockPort, PurchaseRepo, RandomPort, RegionRepo,
        RegionStatsRepo, ShopItemRepo, TaskGeneratorPort, TaskRepo, UnitOfWork,
    },
    region_locks::RegionLockRegistry,
};
use crate::use_cases::{
    BattleUseCases, CharacterSheetUseCases, EffectAggregator, ShopUseCases, SkillUseCases,
};

/// Storage ports the engine is wired with.
///
/// A deployment backs these with its database adapters; tests inject an
/// in-memory store.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub clan: Arc<dyn ClanRepo>,
    pub region: Arc<dyn RegionRepo>,
    pub region_stats: Arc<dyn RegionStatsRepo>,
    pub buff: Arc<dyn BuffRepo>,
    pub shop_item: Arc<dyn ShopItemRepo>,
    pub purchase: Arc<dyn PurchaseRepo>,
    pub task: Arc<dyn TaskRepo>,
    /// Transactional write boundary for the submission path. Backed by
    /// the same database as the repos above.
    pub unit_of_work: Arc<dyn UnitOfWork>,
}

/// Container for all use cases.
pub struct UseCases {
    pub battle: BattleUseCases,
    pub skills: SkillUseCases,
    pub shop: ShopUseCases,
    pub character_sheet: CharacterSheetUseCases,
    pub effects: Arc<EffectAggregator>,
}

/// Main application state.
///
/// Holds the repositories and use cases; handed to whatever presentation
/// layer sits on top.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

impl App {
    /// Wire up the engine with the system clock and system randomness.
    pub fn new(
        repositories: Repositories,
        generator: Arc<dyn TaskGeneratorPort>,
        settings: BattleSettings,
    ) -> Self {
        Self::with_clock_and_random(
            repositories,
            generator,
            settings,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
    }

    /// Full wiring with injectable clock and randomness.
    pub fn with_clock_and_random(
        repositories: Repositories,
        generator: Arc<dyn TaskGeneratorPort>,
        settings: BattleSettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let region_locks = Arc::new(RegionLockRegistry::new());
        let effects = Arc::new(EffectAggregator::new(
            repositories.buff.clone(),
            repositories.shop_item.clone(),
            clock.clone(),
        ));

        let battle = BattleUseCases::new(
            repositories.character.clone(),
            repositories.region.clone(),
            repositories.region_stats.clone(),
            repositories.task.clone(),
            repositories.unit_of_work.clone(),
            generator,
            effects.clone(),
            clock.clone(),
            random,
            region_locks,
            settings.clone(),
        );
        let skills = SkillUseCases::new(repositories.character.clone());
        let shop = ShopUseCases::new(
            repositories.character.clone(),
            repositories.shop_item.clone(),
            repositories.purchase.clone(),
            repositories.buff.clone(),
            clock.clone(),
            settings.clone(),
        );
        let character_sheet = CharacterSheetUseCases::new(
            repositories.character.clone(),
            repositories.clan.clone(),
            repositories.region.clone(),
            clock,
            settings,
        );

        Self {
            repositories,
            use_cases: UseCases {
                battle,
                skills,
                shop,
                character_sheet,
                effects,
            },
        }
    }
}
