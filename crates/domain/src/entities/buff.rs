//! Active buff entity - a used item applying its effects to a scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BuffId, CharacterId, ClanId, ItemId, RegionIndex};

/// The single scope an active buff binds to.
///
/// Exactly one of character, clan or region - modeled as a closed variant
/// so scope matching is exhaustive and compiler-checked. Region-scoped
/// buffs apply to every actor interacting with that region, not just the
/// owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuffScope {
    Character { character_id: CharacterId },
    Clan { clan_id: ClanId },
    Region { region_index: RegionIndex },
}

/// A used shop item whose effects are live.
///
/// Lifecycle: created when a purchase is used; one-shot buffs are deleted
/// right after the single qualifying action that consumed them; buffs
/// whose effects carry finite durations are simply ignored once expired
/// (expiry is computed at read time, not by deletion); unlimited buffs
/// persist until an administrative reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBuff {
    id: BuffId,
    scope: BuffScope,
    item_id: ItemId,
    used_at: DateTime<Utc>,
    one_shot: bool,
}

impl ActiveBuff {
    pub fn new(scope: BuffScope, item_id: ItemId, used_at: DateTime<Utc>, one_shot: bool) -> Self {
        Self {
            id: BuffId::new(),
            scope,
            item_id,
            used_at,
            one_shot,
        }
    }

    pub fn with_id(mut self, id: BuffId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn id(&self) -> BuffId {
        self.id
    }

    #[inline]
    pub fn scope(&self) -> BuffScope {
        self.scope
    }

    #[inline]
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    #[inline]
    pub fn used_at(&self) -> DateTime<Utc> {
        self.used_at
    }

    #[inline]
    pub fn is_one_shot(&self) -> bool {
        self.one_shot
    }
}
