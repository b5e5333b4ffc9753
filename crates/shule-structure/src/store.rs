//! Configuration store: the mutable holder callers talk to.
//!
//! The store keeps the current snapshot and the school profile. Every
//! structural edit goes through [`derivation::apply`]; only accepted
//! transitions replace the current snapshot.

use shule_models::{LifecycleState, SchoolProfile, SchoolRecord, UpdateProfileDto};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::derivation::{self, Outcome, Transition};
use crate::error::StructureError;
use crate::field::DisabledFields;
use crate::intent::{Intent, RawIntent};
use crate::lock;
use crate::persistence::StructurePersistence;
use crate::snapshot::StructureSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationStore {
    snapshot: StructureSnapshot,
    profile: SchoolProfile,
}

impl ConfigurationStore {
    /// A new school registration: Draft, nothing chosen.
    pub fn create() -> Self {
        Self {
            snapshot: StructureSnapshot::draft(),
            profile: SchoolProfile::default(),
        }
    }

    /// Opens an existing school for editing. Always `Committed`.
    pub fn load_committed(record: SchoolRecord) -> Result<Self, StructureError> {
        let snapshot = StructureSnapshot::from_record(&record.structure, LifecycleState::Committed)?;
        Ok(Self {
            snapshot,
            profile: record.profile,
        })
    }

    pub fn snapshot(&self) -> &StructureSnapshot {
        &self.snapshot
    }

    pub fn profile(&self) -> &SchoolProfile {
        &self.profile
    }

    pub fn state(&self) -> LifecycleState {
        self.snapshot.state()
    }

    pub fn disabled_fields(&self) -> DisabledFields {
        derivation::disabled_fields(&self.snapshot)
    }

    /// Applies a typed intent. Business-rule refusals come back as
    /// [`Outcome::Rejected`] with the snapshot unchanged.
    pub fn apply(&mut self, intent: Intent) -> Transition {
        let transition = derivation::apply(&self.snapshot, &intent);
        match &transition.outcome {
            Outcome::Accepted => {
                debug!(intent.field = %intent.field(), "Structural intent accepted");
                self.snapshot = transition.snapshot.clone();
            }
            Outcome::Rejected(rejection) => {
                debug!(
                    intent.field = %rejection.field,
                    rejection.reason = ?rejection.reason,
                    "Structural intent rejected"
                );
            }
        }
        transition
    }

    /// Parses and applies an untyped intent.
    pub fn apply_raw(&mut self, raw: RawIntent) -> Result<Transition, StructureError> {
        let intent = Intent::try_from(raw).inspect_err(|e| {
            warn!(error = %e, "Malformed structural intent");
        })?;
        Ok(self.apply(intent))
    }

    /// Updates non-structural details. Never gated by the lock.
    pub fn update_profile(
        &mut self,
        dto: UpdateProfileDto,
    ) -> Result<&SchoolProfile, StructureError> {
        dto.validate()?;
        dto.apply_to(&mut self.profile);
        Ok(&self.profile)
    }

    /// The record handed to persistence.
    pub fn record(&self) -> SchoolRecord {
        SchoolRecord {
            profile: self.profile.clone(),
            structure: self.snapshot.to_record(),
        }
    }

    /// Checks everything `commit` requires before any backend call.
    pub fn check_ready(&self) -> Result<(), StructureError> {
        let problems = derivation::violations(&self.snapshot);
        if !problems.is_empty() {
            return Err(StructureError::InvariantViolation(problems));
        }
        if self.snapshot.school_type().is_none() {
            return Err(StructureError::Incomplete(
                "school type must be selected".to_string(),
            ));
        }
        self.profile.validate()?;
        Ok(())
    }

    /// Persists the configuration and locks it.
    ///
    /// Only an acknowledgment from `backend` moves Draft to Committed; on any
    /// failure the store stays Draft with its fields unchanged. Calling this on
    /// a committed store returns the same snapshot without touching the backend.
    ///
    /// Before persisting, the backend is asked for the latest record under the
    /// school's name. If one exists the draft is stale: the store adopts that
    /// record and the commit fails with [`StructureError::Superseded`].
    pub async fn commit(
        &mut self,
        backend: &dyn StructurePersistence,
    ) -> Result<StructureSnapshot, StructureError> {
        if self.snapshot.is_committed() {
            debug!("Configuration already committed");
            return Ok(self.snapshot.clone());
        }

        self.check_ready()?;

        let name = self.profile.name.clone();
        if let Some(latest) = backend.latest(&name).await.inspect_err(|e| {
            warn!(error = %e, "Could not check for an existing school record");
        })? {
            warn!(school.name = %name, "Stale draft; school already committed");
            self.sync_remote(latest)?;
            return Err(StructureError::Superseded(name));
        }

        let record = self.record();
        backend.persist(&record).await.inspect_err(|e| {
            warn!(error = %e, "School record was not acknowledged; staying in draft");
        })?;

        self.snapshot.state = lock::on_commit_acknowledged(self.snapshot.state);
        info!(
            school.name = %self.profile.name,
            school.r#type = ?self.snapshot.school_type(),
            grade_levels = self.snapshot.grade_levels().len(),
            "School structure committed"
        );

        Ok(self.snapshot.clone())
    }

    /// Re-validates against the latest record the backend holds.
    ///
    /// A stored record means the school was committed elsewhere, so the store
    /// adopts it and locks.
    pub fn sync_remote(&mut self, latest: SchoolRecord) -> Result<(), StructureError> {
        let adopted = Self::load_committed(latest)?;
        if !self.snapshot.is_committed() {
            info!("Draft superseded by a committed record");
        }
        *self = adopted;
        Ok(())
    }
}

impl Default for ConfigurationStore {
    fn default() -> Self {
        Self::create()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{DisableReason, Field};
    use crate::persistence::{InMemoryPersistence, PersistenceError};
    use serde_json::json;
    use shule_models::{CurriculumSystem, LevelFlag, SchoolType};

    fn named_store() -> ConfigurationStore {
        let mut store = ConfigurationStore::create();
        store
            .update_profile(UpdateProfileDto {
                name: Some("Riverside Academy".to_string()),
                ..UpdateProfileDto::default()
            })
            .unwrap();
        store
    }

    #[test]
    fn test_create_starts_in_empty_draft() {
        let store = ConfigurationStore::create();
        assert_eq!(store.state(), LifecycleState::Draft);
        assert_eq!(store.snapshot(), &StructureSnapshot::draft());
        assert_eq!(
            store.disabled_fields().reason(Field::GradeLevels),
            Some(DisableReason::Derived)
        );
    }

    #[test]
    fn test_rejected_intent_does_not_publish() {
        let mut store = ConfigurationStore::create();
        store.apply(Intent::SetSchoolType(SchoolType::Primary));
        let before = store.snapshot().clone();

        let transition = store.apply(Intent::SetLevel {
            flag: LevelFlag::Secondary844,
            enabled: true,
        });
        assert!(!transition.is_accepted());
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_apply_raw_surfaces_malformed_intents() {
        let mut store = ConfigurationStore::create();
        let err = store
            .apply_raw(RawIntent::new("has_university", json!(true)))
            .unwrap_err();
        assert!(matches!(err, StructureError::MalformedIntent(_)));
        assert_eq!(store.snapshot(), &StructureSnapshot::draft());
    }

    #[test]
    fn test_update_profile_validates() {
        let mut store = ConfigurationStore::create();
        let err = store
            .update_profile(UpdateProfileDto {
                name: Some("  ".to_string()),
                ..UpdateProfileDto::default()
            })
            .unwrap_err();
        assert!(matches!(err, StructureError::InvalidProfile(_)));
    }

    #[test]
    fn test_check_ready_requires_school_type_and_name() {
        let store = ConfigurationStore::create();
        assert!(matches!(
            store.check_ready(),
            Err(StructureError::Incomplete(_))
        ));

        let mut store = ConfigurationStore::create();
        store.apply(Intent::SetSchoolType(SchoolType::Secondary));
        assert!(matches!(
            store.check_ready(),
            Err(StructureError::InvalidProfile(_))
        ));
    }

    #[tokio::test]
    async fn test_commit_persists_once_and_locks() {
        let backend = InMemoryPersistence::new();
        let mut store = named_store();
        store.apply(Intent::SetSchoolType(SchoolType::Secondary));
        store.apply(Intent::SetSecondaryCurriculum(Some(CurriculumSystem::Cbc)));
        store.apply(Intent::SetLevel {
            flag: LevelFlag::SeniorSecondary,
            enabled: true,
        });

        let committed = store.commit(&backend).await.unwrap();
        assert!(committed.is_committed());
        assert_eq!(backend.records().len(), 1);
        assert_eq!(
            backend.records()[0].structure.grade_levels,
            vec!["Grade 10", "Grade 11", "Grade 12"]
        );

        let again = store.commit(&backend).await.unwrap();
        assert_eq!(again, committed);
        assert_eq!(backend.records().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_acknowledgment_stays_draft() {
        let backend = InMemoryPersistence::new();
        backend.fail_next(PersistenceError::Transport("connection refused".to_string()));

        let mut store = named_store();
        store.apply(Intent::SetSchoolType(SchoolType::Primary));
        let before = store.snapshot().clone();

        let err = store.commit(&backend).await.unwrap_err();
        assert!(matches!(err, StructureError::Persistence(_)));
        assert_eq!(store.snapshot(), &before);
        assert_eq!(store.state(), LifecycleState::Draft);

        let committed = store.commit(&backend).await.unwrap();
        assert!(committed.is_committed());
    }

    #[tokio::test]
    async fn test_commit_adopts_record_committed_elsewhere() {
        let backend = InMemoryPersistence::new();
        let mut first = named_store();
        first.apply(Intent::SetSchoolType(SchoolType::Primary));
        first.commit(&backend).await.unwrap();

        let mut stale = named_store();
        stale.apply(Intent::SetSchoolType(SchoolType::Secondary));
        let err = stale.commit(&backend).await.unwrap_err();

        assert!(matches!(err, StructureError::Superseded(ref name) if name == "Riverside Academy"));
        assert_eq!(backend.records().len(), 1);
        assert_eq!(stale.state(), LifecycleState::Committed);
        assert_eq!(stale.snapshot(), first.snapshot());
    }

    #[test]
    fn test_profile_stays_editable_after_load() {
        let record: SchoolRecord = serde_json::from_value(json!({
            "name": "Hilltop",
            "school_type": "primary",
            "primary_curriculum": "CBC",
            "has_primary": true,
            "grade_levels": ["Grade 1", "Grade 2"]
        }))
        .unwrap();
        let mut store = ConfigurationStore::load_committed(record).unwrap();
        assert_eq!(store.state(), LifecycleState::Committed);

        let profile = store
            .update_profile(UpdateProfileDto {
                motto: Some("Strive".to_string()),
                ..UpdateProfileDto::default()
            })
            .unwrap();
        assert_eq!(profile.motto.as_deref(), Some("Strive"));
    }

    #[tokio::test]
    async fn test_sync_remote_blocks_stale_draft() {
        let backend = InMemoryPersistence::new();
        let mut first = named_store();
        first.apply(Intent::SetSchoolType(SchoolType::Primary));
        first.commit(&backend).await.unwrap();

        let mut stale = named_store();
        stale.apply(Intent::SetSchoolType(SchoolType::Secondary));
        stale.sync_remote(backend.records()[0].clone()).unwrap();

        assert_eq!(stale.state(), LifecycleState::Committed);
        assert_eq!(stale.snapshot().school_type(), Some(SchoolType::Primary));
        let transition = stale.apply(Intent::SetSchoolType(SchoolType::Secondary));
        assert_eq!(
            transition.rejection().map(|r| r.reason),
            Some(DisableReason::Locked)
        );
    }
}
