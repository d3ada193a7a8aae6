pub mod handlers;
pub mod models;
mod plugin;
pub mod repo;

pub use plugin::UsersPlugin;
pub use repo::{DynUserRepo, InMemoryUserRepo, MongoUserRepo, UserRepo};
