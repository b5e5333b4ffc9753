//! # Shule Core
//!
//! Foundational types shared by the Shule API crates:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`serde`]: Custom deserialization helpers for query strings
//!
//! # Example
//!
//! ```ignore
//! use shule_core::errors::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Session not found"));
//! ```

pub mod errors;
pub mod serde;

pub use errors::AppError;
