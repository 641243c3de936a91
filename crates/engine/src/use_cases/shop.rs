//! Shop lifecycle: buy an item, then use it to activate a buff.
//!
//! A purchase is an owned-but-dormant item. Using it deletes the purchase
//! and creates an `ActiveBuff` bound to the scope the item's effects call
//! for. Instant `CurrentEnergy` effects are applied to the character at
//! use time rather than becoming part of the buff.

use std::sync::Arc;

use classquest_domain::{
    normalize_sign, ActiveBuff, BattleSettings, BuffId, BuffScope, CharacterId, EffectKind,
    EffectTarget, ItemId, PaymentOutcome, Purchase, PurchaseId, RegionIndex, ShopItem,
};

use crate::infrastructure::ports::{
    BuffRepo, CharacterRepo, ClockPort, PurchaseRepo, RepoError, ShopItemRepo,
};

#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Item not found")]
    ItemNotFound,
    #[error("Purchase not found")]
    PurchaseNotFound,
    #[error("Purchase belongs to another character")]
    NotOwned,
    #[error("Insufficient funds: balance {balance}, price {price}")]
    InsufficientFunds { balance: i64, price: i64 },
    #[error("Clan-targeted items require clan membership")]
    MissingClan,
    #[error("Region-targeted items require a region to aim at")]
    MissingRegionTarget,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Result of buying an item.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseReceipt {
    pub purchase_id: PurchaseId,
    pub balance: i64,
}

/// Result of using a purchase.
#[derive(Debug, Clone, Copy)]
pub struct UseReceipt {
    pub buff_id: BuffId,
    pub scope: BuffScope,
    pub one_shot: bool,
    pub energy: i32,
}

pub struct ShopUseCases {
    characters: Arc<dyn CharacterRepo>,
    items: Arc<dyn ShopItemRepo>,
    purchases: Arc<dyn PurchaseRepo>,
    buffs: Arc<dyn BuffRepo>,
    clock: Arc<dyn ClockPort>,
    settings: BattleSettings,
}

impl ShopUseCases {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        items: Arc<dyn ShopItemRepo>,
        purchases: Arc<dyn PurchaseRepo>,
        buffs: Arc<dyn BuffRepo>,
        clock: Arc<dyn ClockPort>,
        settings: BattleSettings,
    ) -> Self {
        Self {
            characters,
            items,
            purchases,
            buffs,
            clock,
            settings,
        }
    }

    /// Everything currently for sale.
    pub async fn catalog(&self) -> Result<Vec<ShopItem>, ShopError> {
        Ok(self.items.list().await?)
    }

    /// A character's owned, not yet used purchases.
    pub async fn owned(&self, character_id: CharacterId) -> Result<Vec<Purchase>, ShopError> {
        Ok(self.purchases.list_for_character(character_id).await?)
    }

    /// Buy an item, deducting its price from the balance.
    pub async fn purchase(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<PurchaseReceipt, ShopError> {
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(ShopError::CharacterNotFound)?;
        let item = self
            .items
            .get(item_id)
            .await?
            .ok_or(ShopError::ItemNotFound)?;

        let balance = match character.pay_currency(item.price()) {
            PaymentOutcome::InsufficientFunds { balance, price } => {
                return Err(ShopError::InsufficientFunds { balance, price })
            }
            PaymentOutcome::Paid { balance } => balance,
        };

        let purchase = Purchase::new(character_id, item_id, self.clock.now());
        self.purchases.create(&purchase).await?;
        self.characters.save(&character).await?;

        tracing::info!(
            character_id = %character_id,
            item_id = %item_id,
            price = item.price(),
            "item purchased"
        );
        Ok(PurchaseReceipt {
            purchase_id: purchase.id(),
            balance,
        })
    }

    /// Use a purchase: the purchase is deleted and an active buff takes
    /// its place, scoped by the item's widest effect target.
    pub async fn use_purchase(
        &self,
        character_id: CharacterId,
        purchase_id: PurchaseId,
        region: Option<RegionIndex>,
    ) -> Result<UseReceipt, ShopError> {
        let purchase = self
            .purchases
            .get(purchase_id)
            .await?
            .ok_or(ShopError::PurchaseNotFound)?;
        if purchase.character_id() != character_id {
            return Err(ShopError::NotOwned);
        }
        let item = self
            .items
            .get(purchase.item_id())
            .await?
            .ok_or(ShopError::ItemNotFound)?;
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or(ShopError::CharacterNotFound)?;

        let scope = match item.scope_hint() {
            EffectTarget::SelfOnly => BuffScope::Character { character_id },
            EffectTarget::Clan => BuffScope::Clan {
                clan_id: character.clan_id().ok_or(ShopError::MissingClan)?,
            },
            EffectTarget::Region => BuffScope::Region {
                region_index: region.ok_or(ShopError::MissingRegionTarget)?,
            },
        };

        let now = self.clock.now();

        // Instant energy effects hit the character at use time; the rest
        // of the item lives on as the buff.
        let mut character_dirty = false;
        for effect in item.effects() {
            if effect.kind() != EffectKind::CurrentEnergy {
                continue;
            }
            character.refill_energy(now, &self.settings);
            let pct = normalize_sign(item.category(), effect.percent_change());
            let delta = (f64::from(character.max_energy()) * pct / 100.0).round() as i32;
            character.adjust_energy(delta);
            character_dirty = true;
        }

        let buff = ActiveBuff::new(scope, item.id(), now, item.is_one_shot());
        self.buffs.create(&buff).await?;
        self.purchases.delete(purchase_id).await?;
        if character_dirty {
            self.characters.save(&character).await?;
        }

        tracing::info!(
            character_id = %character_id,
            item_id = %item.id(),
            one_shot = buff.is_one_shot(),
            "purchase used"
        );
        Ok(UseReceipt {
            buff_id: buff.id(),
            scope,
            one_shot: buff.is_one_shot(),
            energy: character.current_energy(),
        })
    }
}
