pub mod config;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod reports;
pub mod storage;
pub mod utils;

pub use storage::{MemoryStore, PgStore, Store};
