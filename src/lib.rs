//! # Shule API
//!
//! HTTP service around the school structure configuration engine. A client
//! opens an editing session, sends structural intents one at a time, and
//! commits the finished structure to the school backend. Once committed, the
//! structural fields are locked for the life of the school.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── shule-models/         # Domain vocabulary and wire records
//! ├── shule-structure/      # Catalog, derivation, lock guard, store
//! ├── shule-core/           # AppError and serde helpers
//! ├── shule-config/         # Environment-driven configuration
//! └── shule-observability/  # Logging and metrics
//! src/
//! ├── backend.rs            # REST client for the school backend
//! ├── cli/                  # shule-cli commands
//! ├── modules/structure/    # Session endpoints
//! ├── router.rs             # Main application router
//! └── state.rs              # Shared application state
//! ```
//!
//! Feature modules follow the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business logic
//! - `model.rs`: Request and response types
//! - `router.rs`: Axum router configuration
//!
//! ## Endpoints
//!
//! All under `/api/school-structure`:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/catalog` | Grade catalog, filtered by `curriculum` and `band` |
//! | POST | `/sessions` | Open a draft session |
//! | POST | `/sessions/load` | Open a committed session from a stored record |
//! | GET | `/sessions/{id}` | Snapshot, disabled fields and profile |
//! | POST | `/sessions/{id}/intents` | Apply one structural intent |
//! | PUT | `/sessions/{id}/profile` | Update name, address and contacts |
//! | POST | `/sessions/{id}/commit` | Persist and lock |
//! | DELETE | `/sessions/{id}` | Discard a session |
//!
//! ## Environment Variables
//!
//! ```bash
//! HOST=0.0.0.0
//! PORT=3000
//! SESSION_IDLE_TTL_SECS=3600
//! SHULE_BACKEND_URL=http://localhost:8000   # or memory://
//! SHULE_BACKEND_TOKEN=
//! SHULE_BACKEND_TIMEOUT_SECS=10
//! ALLOWED_ORIGINS=http://localhost:3000,http://localhost:5173
//! LOG_FORMAT=json
//! OBSERVABILITY_ENABLED=true
//! ```

pub mod backend;
pub mod cli;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use shule_config;
pub use shule_core;
pub use shule_models;
pub use shule_structure;
