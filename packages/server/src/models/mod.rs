pub mod auth;
pub mod bin;
pub mod category;
pub mod item;
pub mod profile;
pub mod session;
pub mod shared;
