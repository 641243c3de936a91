//! Clan entity - the unit of region ownership.

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, ClanId};
use crate::value_objects::ClanName;

/// A group of characters contesting regions together.
///
/// A character belongs to at most one clan; the owner is the character
/// who founded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clan {
    id: ClanId,
    name: ClanName,
    owner_character_id: CharacterId,
}

impl Clan {
    pub fn new(name: ClanName, owner_character_id: CharacterId) -> Self {
        Self {
            id: ClanId::new(),
            name,
            owner_character_id,
        }
    }

    pub fn with_id(mut self, id: ClanId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn id(&self) -> ClanId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &ClanName {
        &self.name
    }

    #[inline]
    pub fn owner_character_id(&self) -> CharacterId {
        self.owner_character_id
    }
}
