pub mod auth;
pub mod bookmarks;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod store;
