//! Domain entities - Core business objects with identity

mod buff;
mod clan;
mod purchase;
mod shop_item;

pub use buff::{ActiveBuff, BuffScope};
pub use clan::Clan;
pub use purchase::Purchase;
pub use shop_item::ShopItem;
