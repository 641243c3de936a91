//! Purchase entity - an owned but not yet used shop item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, ItemId, PurchaseId};

/// An item a character has paid for but not yet activated.
///
/// Using the purchase deletes it and creates an
/// [`ActiveBuff`](crate::entities::ActiveBuff) in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    id: PurchaseId,
    character_id: CharacterId,
    item_id: ItemId,
    purchased_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new(character_id: CharacterId, item_id: ItemId, purchased_at: DateTime<Utc>) -> Self {
        Self {
            id: PurchaseId::new(),
            character_id,
            item_id,
            purchased_at,
        }
    }

    pub fn with_id(mut self, id: PurchaseId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn id(&self) -> PurchaseId {
        self.id
    }

    #[inline]
    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    #[inline]
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    #[inline]
    pub fn purchased_at(&self) -> DateTime<Utc> {
        self.purchased_at
    }
}
