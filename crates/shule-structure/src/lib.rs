//! # Shule Structure
//!
//! The school structure configuration engine. Given a school type and
//! curriculum choices it derives the valid level flags, the concrete grade
//! codes on offer and the available senior secondary pathways, and it locks
//! the whole structure once the school record is committed.
//!
//! - [`catalog`]: Static grade/class catalog
//! - [`derivation`]: Pure reducer from (snapshot, intent) to the next snapshot
//! - [`lock`]: Draft/Committed gate on structural fields
//! - [`store`]: The mutable holder callers use
//! - [`intent`]: Typed and raw mutation intents
//! - [`persistence`]: Boundary with the storage collaborator
//!
//! The engine is synchronous apart from `commit`, which awaits the
//! persistence acknowledgment.
//!
//! # Example
//!
//! ```ignore
//! use shule_structure::{ConfigurationStore, Intent};
//! use shule_models::{CurriculumSystem, LevelFlag, SchoolType};
//!
//! let mut store = ConfigurationStore::create();
//! store.apply(Intent::SetSchoolType(SchoolType::Secondary));
//! store.apply(Intent::SetSecondaryCurriculum(Some(CurriculumSystem::EightFourFour)));
//! let transition = store.apply(Intent::SetLevel { flag: LevelFlag::Secondary844, enabled: true });
//! assert_eq!(transition.snapshot.grade_levels(), &["Form 1", "Form 2", "Form 3", "Form 4"]);
//! ```

pub mod catalog;
pub mod derivation;
pub mod error;
pub mod field;
pub mod intent;
pub mod lock;
pub mod persistence;
pub mod snapshot;
pub mod store;

pub use catalog::GradeCatalogEntry;
pub use derivation::{Outcome, RejectedMutation, StructureInputs, Transition};
pub use error::StructureError;
pub use field::{DisableReason, DisabledFields, Field};
pub use intent::{Intent, RawIntent};
pub use persistence::{
    InMemoryPersistence, LatestFuture, PersistFuture, PersistenceError, StructurePersistence,
};
pub use snapshot::StructureSnapshot;
pub use store::ConfigurationStore;
