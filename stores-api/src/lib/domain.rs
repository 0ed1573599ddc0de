pub mod item;
pub mod store;
pub mod tag;
pub mod user;
