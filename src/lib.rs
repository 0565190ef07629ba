pub mod app;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod transform;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use fetch::MetricsClient;
pub use state::AppState;
pub use storage::{load_snapshot, persist_snapshot};
