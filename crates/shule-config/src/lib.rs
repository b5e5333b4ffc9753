//! # Shule Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`server`]: Bind address for the HTTP service
//! - [`backend`]: School backend used to persist committed structures
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//!
//! Every `from_env()` delegates to a `from_source()` that takes a lookup
//! function, so defaults and parsing can be tested without touching the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use shule_config::{BackendConfig, CorsConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let backend = BackendConfig::from_env();
//! let cors = CorsConfig::from_env();
//! ```

pub mod backend;
pub mod cors;
pub mod server;

pub use backend::BackendConfig;
pub use cors::CorsConfig;
pub use server::ServerConfig;

/// Reads a variable from the process environment.
pub(crate) fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
