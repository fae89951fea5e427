pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod plan;
pub mod reconcile;
pub mod service;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use service::LogService;
pub use state::AppState;
pub use storage::{JsonFileStore, LogStore, MemoryStore};
