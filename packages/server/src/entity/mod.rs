pub mod profile;
pub mod recyclable_item;
pub mod recyclable_item_category;
pub mod recycling_bin;
pub mod recycling_session;
pub mod transaction;
pub mod user;
