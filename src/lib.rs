pub mod analytics;
pub mod app;
pub mod challenges;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod history;
pub mod milestones;
pub mod models;
pub mod password;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
