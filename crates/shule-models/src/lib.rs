//! # Shule Models
//!
//! Domain vocabulary and wire records for the Shule school structure engine.
//!
//! # Modules
//!
//! - [`structure`]: School types, curriculum systems, bands, level flags and pathways
//! - [`records`]: The record exchanged with the persistence backend
//! - [`profile`]: Non-structural school details (name, address, contacts)
//! - [`value_types`]: Validated email and phone number newtypes
//! - [`ids`]: Strongly-typed identifiers
//!
//! # Example
//!
//! ```ignore
//! use shule_models::structure::{CurriculumSystem, SchoolType};
//!
//! let school_type: SchoolType = "mixed".parse()?;
//! let curriculum: CurriculumSystem = "8-4-4".parse()?;
//! assert_eq!(curriculum.to_string(), "8-4-4");
//! ```

pub mod ids;
pub mod profile;
pub mod records;
pub mod structure;
pub mod value_types;

pub use ids::SessionId;
pub use profile::{SchoolProfile, UpdateProfileDto};
pub use records::{SchoolRecord, StructureRecord};
pub use structure::{
    Band, Curriculum, CurriculumSystem, LevelFlag, LevelFlags, LifecycleState, ParseVariantError,
    Pathway, SchoolType, Side,
};
pub use value_types::{Email, PhoneNumber, ValueTypeError};
