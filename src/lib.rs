pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use routes::create_router;
pub use state::{AppState, Providers};
