pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod context;
pub mod metrics;
pub mod middleware;
pub mod state;

pub use app::build_app;
pub use config::AppConfig;
pub use state::AppState;
