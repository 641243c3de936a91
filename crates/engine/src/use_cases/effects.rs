//! Effect aggregation: combined percentage modifiers per stat category.
//!
//! Buffs are collected from three scopes - the actor, the actor's clan,
//! and the target region. Region-scoped buffs apply to every actor
//! interacting with that region, not just the owner. Expired effects are
//! discarded lazily at read time; no background cleanup runs.

use std::sync::Arc;

use classquest_domain::{
    normalize_sign, BuffId, BuffScope, CharacterId, ClanId, EffectKind, RegionIndex,
};

use crate::infrastructure::ports::{BuffRepo, ClockPort, RepoError, ShopItemRepo};

/// Summed, sign-normalized percentages per stat category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectTotals {
    damage_pct: f64,
    defense_pct: f64,
    current_energy_pct: f64,
    max_energy_pct: f64,
    xp_reward_pct: f64,
    nums_reward_pct: f64,
}

impl EffectTotals {
    fn add(&mut self, kind: EffectKind, pct: f64) {
        match kind {
            EffectKind::Damage => self.damage_pct += pct,
            EffectKind::Defense => self.defense_pct += pct,
            EffectKind::CurrentEnergy => self.current_energy_pct += pct,
            EffectKind::MaxEnergy => self.max_energy_pct += pct,
            EffectKind::XpReward => self.xp_reward_pct += pct,
            EffectKind::NumsReward => self.nums_reward_pct += pct,
        }
    }

    /// Combined percentage for a stat category.
    pub fn pct(&self, kind: EffectKind) -> f64 {
        match kind {
            EffectKind::Damage => self.damage_pct,
            EffectKind::Defense => self.defense_pct,
            EffectKind::CurrentEnergy => self.current_energy_pct,
            EffectKind::MaxEnergy => self.max_energy_pct,
            EffectKind::XpReward => self.xp_reward_pct,
            EffectKind::NumsReward => self.nums_reward_pct,
        }
    }

    /// Percentage converted to a multiplier: `+15` becomes `1.15`.
    pub fn multiplier(&self, kind: EffectKind) -> f64 {
        1.0 + self.pct(kind) / 100.0
    }
}

/// Buff-adjusted integer power. A multiplier never reduces an action's
/// power below 1.
pub fn adjusted_power(base: i32, pct: f64) -> i32 {
    (f64::from(base) * (1.0 + pct / 100.0)).round().max(1.0) as i32
}

/// Reads active buffs for an actor and folds them into per-category
/// totals; also names the one-shot buffs a scored attempt spends.
pub struct EffectAggregator {
    buffs: Arc<dyn BuffRepo>,
    items: Arc<dyn ShopItemRepo>,
    clock: Arc<dyn ClockPort>,
}

impl EffectAggregator {
    pub fn new(
        buffs: Arc<dyn BuffRepo>,
        items: Arc<dyn ShopItemRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            buffs,
            items,
            clock,
        }
    }

    fn scopes(
        actor: CharacterId,
        clan: Option<ClanId>,
        region: Option<RegionIndex>,
    ) -> Vec<BuffScope> {
        let mut scopes = vec![BuffScope::Character {
            character_id: actor,
        }];
        if let Some(clan_id) = clan {
            scopes.push(BuffScope::Clan { clan_id });
        }
        if let Some(region_index) = region {
            scopes.push(BuffScope::Region { region_index });
        }
        scopes
    }

    /// Combined totals across every live buff in the three scopes.
    ///
    /// Per-effect expiry: a buff whose item mixes finite and unlimited
    /// durations keeps contributing its unexpired effects.
    pub async fn totals(
        &self,
        actor: CharacterId,
        clan: Option<ClanId>,
        region: Option<RegionIndex>,
    ) -> Result<EffectTotals, RepoError> {
        let now = self.clock.now();
        let mut totals = EffectTotals::default();

        for scope in Self::scopes(actor, clan, region) {
            for buff in self.buffs.list_for_scope(scope).await? {
                let Some(item) = self.items.get(buff.item_id()).await? else {
                    tracing::warn!(buff_id = %buff.id(), "active buff references missing item");
                    continue;
                };
                for effect in item.effects() {
                    if effect.is_expired(buff.used_at(), now) {
                        continue;
                    }
                    totals.add(
                        effect.kind(),
                        normalize_sign(item.category(), effect.percent_change()),
                    );
                }
            }
        }
        Ok(totals)
    }

    /// Ids of every one-shot buff in the three scopes.
    ///
    /// One-shot buffs are spent on the scored attempt, correct or not -
    /// the submission's commit deletes them alongside its other writes.
    /// Buffs with durations never appear here.
    pub async fn one_shot_buff_ids(
        &self,
        actor: CharacterId,
        clan: Option<ClanId>,
        region: Option<RegionIndex>,
    ) -> Result<Vec<BuffId>, RepoError> {
        let mut ids = Vec::new();
        for scope in Self::scopes(actor, clan, region) {
            for buff in self.buffs.list_for_scope(scope).await? {
                if buff.is_one_shot() {
                    ids.push(buff.id());
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use classquest_domain::{ActiveBuff, Effect, EffectTarget, ItemCategory, ShopItem};
    use mockall::predicate::eq;

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockBuffRepo, MockShopItemRepo};

    fn fixed_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid timestamp")
    }

    fn item_with(
        category: ItemCategory,
        kind: EffectKind,
        pct: f64,
        duration: Option<i64>,
    ) -> ShopItem {
        ShopItem::new(
            "test item",
            category,
            10,
            vec![Effect::new(kind, pct, EffectTarget::SelfOnly, duration)],
        )
    }

    fn buff_for(item: &ShopItem, actor: CharacterId, used_at: DateTime<Utc>) -> ActiveBuff {
        ActiveBuff::new(
            BuffScope::Character {
                character_id: actor,
            },
            item.id(),
            used_at,
            item.is_one_shot(),
        )
    }

    fn aggregator(
        buffs: MockBuffRepo,
        items: MockShopItemRepo,
        now: DateTime<Utc>,
    ) -> EffectAggregator {
        EffectAggregator::new(Arc::new(buffs), Arc::new(items), Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn enhancements_stack_additively() {
        let now = fixed_time();
        let actor = CharacterId::new();
        let first = item_with(ItemCategory::Enhancement, EffectKind::Damage, 10.0, None);
        let second = item_with(ItemCategory::Enhancement, EffectKind::Damage, 5.0, None);
        let buff_a = buff_for(&first, actor, now);
        let buff_b = buff_for(&second, actor, now);

        let mut buffs = MockBuffRepo::new();
        buffs
            .expect_list_for_scope()
            .returning(move |_| Ok(vec![buff_a, buff_b]));
        let mut items = MockShopItemRepo::new();
        let (first_id, second_id) = (first.id(), second.id());
        items
            .expect_get()
            .with(eq(first_id))
            .returning(move |_| Ok(Some(first.clone())));
        items
            .expect_get()
            .with(eq(second_id))
            .returning(move |_| Ok(Some(second.clone())));

        let totals = aggregator(buffs, items, now)
            .totals(actor, None, None)
            .await
            .expect("totals");

        assert!((totals.pct(EffectKind::Damage) - 15.0).abs() < f64::EPSILON);
        assert!((totals.multiplier(EffectKind::Damage) - 1.15).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn signs_are_normalized_by_category() {
        let now = fixed_time();
        let actor = CharacterId::new();
        // Authored backwards on purpose: a negative enhancement and a
        // positive curse.
        let enhancement = item_with(ItemCategory::Enhancement, EffectKind::Damage, -10.0, None);
        let curse = item_with(ItemCategory::Curse, EffectKind::Defense, 10.0, None);
        let buff_a = buff_for(&enhancement, actor, now);
        let buff_b = buff_for(&curse, actor, now);

        let mut buffs = MockBuffRepo::new();
        buffs
            .expect_list_for_scope()
            .returning(move |_| Ok(vec![buff_a, buff_b]));
        let mut items = MockShopItemRepo::new();
        let (enh_id, curse_id) = (enhancement.id(), curse.id());
        items
            .expect_get()
            .with(eq(enh_id))
            .returning(move |_| Ok(Some(enhancement.clone())));
        items
            .expect_get()
            .with(eq(curse_id))
            .returning(move |_| Ok(Some(curse.clone())));

        let totals = aggregator(buffs, items, now)
            .totals(actor, None, None)
            .await
            .expect("totals");

        assert!((totals.pct(EffectKind::Damage) - 10.0).abs() < f64::EPSILON);
        assert!((totals.pct(EffectKind::Defense) + 10.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn expired_effects_are_discarded_lazily() {
        let now = fixed_time();
        let actor = CharacterId::new();
        let item = item_with(ItemCategory::Enhancement, EffectKind::Damage, 25.0, Some(30));
        // Used 31 minutes ago: strictly past the duration.
        let buff = buff_for(&item, actor, now - Duration::minutes(31));

        let mut buffs = MockBuffRepo::new();
        buffs
            .expect_list_for_scope()
            .returning(move |_| Ok(vec![buff]));
        let mut items = MockShopItemRepo::new();
        items.expect_get().returning(move |_| Ok(Some(item.clone())));

        let totals = aggregator(buffs, items, now)
            .totals(actor, None, None)
            .await
            .expect("totals");

        assert_eq!(totals.pct(EffectKind::Damage), 0.0);
    }

    #[tokio::test]
    async fn clan_and_region_scopes_are_queried_when_present() {
        let now = fixed_time();
        let actor = CharacterId::new();
        let clan = ClanId::new();
        let region = RegionIndex::new(2);

        let mut buffs = MockBuffRepo::new();
        buffs
            .expect_list_for_scope()
            .with(eq(BuffScope::Character {
                character_id: actor,
            }))
            .times(1)
            .returning(|_| Ok(vec![]));
        buffs
            .expect_list_for_scope()
            .with(eq(BuffScope::Clan { clan_id: clan }))
            .times(1)
            .returning(|_| Ok(vec![]));
        buffs
            .expect_list_for_scope()
            .with(eq(BuffScope::Region {
                region_index: region,
            }))
            .times(1)
            .returning(|_| Ok(vec![]));
        let items = MockShopItemRepo::new();

        let totals = aggregator(buffs, items, now)
            .totals(actor, Some(clan), Some(region))
            .await
            .expect("totals");

        assert_eq!(totals, EffectTotals::default());
    }

    #[tokio::test]
    async fn only_one_shot_buffs_are_listed_for_consumption() {
        let now = fixed_time();
        let actor = CharacterId::new();
        let one_shot = item_with(ItemCategory::Enhancement, EffectKind::Damage, 10.0, None);
        let timed = item_with(ItemCategory::Enhancement, EffectKind::Damage, 10.0, Some(60));
        let one_shot_buff = buff_for(&one_shot, actor, now);
        let timed_buff = buff_for(&timed, actor, now);

        let mut buffs = MockBuffRepo::new();
        buffs
            .expect_list_for_scope()
            .returning(move |_| Ok(vec![one_shot_buff, timed_buff]));
        let items = MockShopItemRepo::new();

        let ids = aggregator(buffs, items, now)
            .one_shot_buff_ids(actor, None, None)
            .await
            .expect("listed");

        assert_eq!(ids, vec![one_shot_buff.id()]);
    }

    mod power {
        use super::*;

        #[test]
        fn power_rounds_and_never_drops_below_one() {
            assert_eq!(adjusted_power(10, 15.0), 12);
            assert_eq!(adjusted_power(10, 0.0), 10);
            assert_eq!(adjusted_power(5, -90.0), 1);
            assert_eq!(adjusted_power(1, -100.0), 1);
        }

        #[test]
        fn power_rounds_half_up() {
            // 10 * 1.05 = 10.5 -> 11
            assert_eq!(adjusted_power(10, 5.0), 11);
        }
    }
}
