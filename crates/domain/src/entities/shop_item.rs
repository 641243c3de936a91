//! Shop item entity - a purchasable enhancement or curse.

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::value_objects::{Effect, EffectTarget, ItemCategory};

/// A purchasable item carrying an ordered list of effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    id: ItemId,
    name: String,
    category: ItemCategory,
    price: i64,
    effects: Vec<Effect>,
}

impl ShopItem {
    pub fn new(
        name: impl Into<String>,
        category: ItemCategory,
        price: i64,
        effects: Vec<Effect>,
    ) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            category,
            price: price.max(0),
            effects,
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn category(&self) -> ItemCategory {
        self.category
    }

    #[inline]
    pub fn price(&self) -> i64 {
        self.price
    }

    #[inline]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// A buff from this item is one-shot iff none of its effects specify
    /// a duration.
    pub fn is_one_shot(&self) -> bool {
        self.effects.iter().all(|e| e.duration_minutes().is_none())
    }

    /// The scope a buff from this item should bind to, derived from the
    /// widest authored effect target (Region > Clan > Self).
    pub fn scope_hint(&self) -> EffectTarget {
        if self
            .effects
            .iter()
            .any(|e| e.target() == EffectTarget::Region)
        {
            EffectTarget::Region
        } else if self.effects.iter().any(|e| e.target() == EffectTarget::Clan) {
            EffectTarget::Clan
        } else {
            EffectTarget::SelfOnly
        }
    }
}
