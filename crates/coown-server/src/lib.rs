//! Co-ownership agreement server: configuration, shared state and the
//! JSON API over the template store.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
