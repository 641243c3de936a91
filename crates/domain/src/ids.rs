use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Core entity IDs
define_id!(CharacterId);
define_id!(ClanId);

// Shop and buff IDs
define_id!(ItemId);
define_id!(PurchaseId);
define_id!(BuffId);

// Issued task IDs
define_id!(TaskId);

/// Stable identifier of a map region.
///
/// Regions are created once at setup time and addressed by a small fixed
/// index rather than a uuid; the index never changes for the lifetime of
/// the battle map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionIndex(u32);

impl RegionIndex {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RegionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RegionIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(CharacterId::new(), CharacterId::new());
        assert_ne!(BuffId::new(), BuffId::new());
    }

    #[test]
    fn region_index_roundtrips_through_serde() {
        let index = RegionIndex::new(7);
        let json = serde_json::to_string(&index).expect("serialize");
        assert_eq!(json, "7");
        let back: RegionIndex = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, index);
    }
}
