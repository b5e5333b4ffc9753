use shule_core::AppError;
use shule_models::{SchoolRecord, SessionId, UpdateProfileDto};
use shule_structure::{
    ConfigurationStore, GradeCatalogEntry, PersistenceError, RawIntent, StructureError,
    StructurePersistence, catalog,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::state::{Session, SessionHandle, Sessions};
use crate::validator::format_errors;

use super::model::{CatalogQuery, IntentResponse, SessionView};

/// Maps engine errors onto HTTP statuses.
pub fn structure_error(err: StructureError) -> AppError {
    match err {
        StructureError::MalformedIntent(_)
        | StructureError::InvariantViolation(_)
        | StructureError::Incomplete(_) => AppError::unprocessable(err),
        StructureError::InvalidProfile(errors) => {
            AppError::unprocessable(anyhow::anyhow!("{}", format_errors(&errors)))
        }
        StructureError::Persistence(PersistenceError::Rejected { status, message }) => {
            AppError::upstream(status, anyhow::anyhow!("School backend rejected the record: {}", message))
        }
        StructureError::Superseded(_) => AppError::conflict(err),
        StructureError::Persistence(e @ PersistenceError::Transport(_)) => AppError::bad_gateway(e),
    }
}

fn commit_status(err: &StructureError) -> &'static str {
    match err {
        StructureError::Incomplete(_) => "incomplete",
        StructureError::InvalidProfile(_) => "invalid_profile",
        StructureError::InvariantViolation(_) | StructureError::MalformedIntent(_) => "invalid",
        StructureError::Superseded(_) => "superseded",
        StructureError::Persistence(PersistenceError::Rejected { .. }) => "backend_rejected",
        StructureError::Persistence(PersistenceError::Transport(_)) => "backend_unavailable",
    }
}

pub struct StructureService;

impl StructureService {
    pub fn catalog(query: &CatalogQuery) -> Vec<&'static GradeCatalogEntry> {
        catalog::search(query.curriculum, query.band)
    }

    async fn insert(sessions: &Sessions, store: ConfigurationStore) -> SessionView {
        let id = SessionId::new();
        let view = SessionView::from_store(id, &store);
        sessions
            .write()
            .await
            .insert(id, Arc::new(Session::new(store)));
        view
    }

    async fn handle(sessions: &Sessions, id: SessionId) -> Result<SessionHandle, AppError> {
        let handle = sessions.read().await.get(&id).cloned().ok_or_else(|| {
            debug!(session.id = %id, "Session not found");
            AppError::not_found(anyhow::anyhow!("Session not found"))
        })?;
        handle.touch();
        Ok(handle)
    }

    #[instrument(skip(sessions))]
    pub async fn create_session(sessions: &Sessions) -> SessionView {
        let view = Self::insert(sessions, ConfigurationStore::create()).await;
        info!(session.id = %view.id, "Draft session created");
        view
    }

    #[instrument(skip(sessions, record), fields(school.name = %record.profile.name))]
    pub async fn load_session(
        sessions: &Sessions,
        record: SchoolRecord,
    ) -> Result<SessionView, AppError> {
        let store = ConfigurationStore::load_committed(record).map_err(|e| {
            warn!(error = %e, "Refusing inconsistent school record");
            structure_error(e)
        })?;
        let view = Self::insert(sessions, store).await;
        info!(session.id = %view.id, "Committed session opened");
        Ok(view)
    }

    #[instrument(skip(sessions), fields(session.id = %id))]
    pub async fn get_session(sessions: &Sessions, id: SessionId) -> Result<SessionView, AppError> {
        let handle = Self::handle(sessions, id).await?;
        let store = handle.lock().await;
        Ok(SessionView::from_store(id, &store))
    }

    #[instrument(skip(sessions, raw), fields(session.id = %id, intent.field = %raw.field))]
    pub async fn apply_intent(
        sessions: &Sessions,
        id: SessionId,
        raw: RawIntent,
    ) -> Result<IntentResponse, AppError> {
        let handle = Self::handle(sessions, id).await?;
        let mut store = handle.lock().await;

        let transition = store.apply_raw(raw).map_err(|e| {
            shule_observability::track_intent("malformed");
            structure_error(e)
        })?;

        match transition.rejection() {
            None => shule_observability::track_intent("accepted"),
            Some(rejection) => {
                shule_observability::track_intent("rejected");
                debug!(rejection.field = %rejection.field, rejection.reason = %rejection.reason, "Intent rejected");
            }
        }

        Ok(IntentResponse {
            session_id: id,
            transition,
        })
    }

    #[instrument(skip(sessions, dto), fields(session.id = %id))]
    pub async fn update_profile(
        sessions: &Sessions,
        id: SessionId,
        dto: UpdateProfileDto,
    ) -> Result<SessionView, AppError> {
        let handle = Self::handle(sessions, id).await?;
        let mut store = handle.lock().await;
        store.update_profile(dto).map_err(structure_error)?;
        debug!(school.name = %store.profile().name, "Profile updated");
        Ok(SessionView::from_store(id, &store))
    }

    /// Persists the session's record. The session lock is held across the
    /// backend call so no intent can land between validation and lock.
    #[instrument(skip(sessions, backend), fields(session.id = %id))]
    pub async fn commit(
        sessions: &Sessions,
        backend: &dyn StructurePersistence,
        id: SessionId,
    ) -> Result<SessionView, AppError> {
        let handle = Self::handle(sessions, id).await?;
        let mut store = handle.lock().await;

        let started = Instant::now();
        if store.snapshot().is_committed() {
            shule_observability::track_commit("already_committed", started.elapsed());
            return Ok(SessionView::from_store(id, &store));
        }

        match store.commit(backend).await {
            Ok(_) => {
                shule_observability::track_commit("committed", started.elapsed());
                info!(school.name = %store.profile().name, "Session committed");
                Ok(SessionView::from_store(id, &store))
            }
            Err(e) => {
                shule_observability::track_commit(commit_status(&e), started.elapsed());
                Err(structure_error(e))
            }
        }
    }

    #[instrument(skip(sessions), fields(session.id = %id))]
    pub async fn delete_session(sessions: &Sessions, id: SessionId) -> Result<(), AppError> {
        sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Session discarded"))
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Session not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use shule_models::{Band, CurriculumSystem};
    use validator::Validate;

    #[test]
    fn test_structure_error_statuses() {
        assert_eq!(
            structure_error(StructureError::MalformedIntent("x".into())).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            structure_error(StructureError::Incomplete("x".into())).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            structure_error(StructureError::Persistence(PersistenceError::Rejected {
                status: 409,
                message: "duplicate".into(),
            }))
            .status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            structure_error(StructureError::Superseded("Kilima".into())).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            structure_error(StructureError::Persistence(PersistenceError::Transport(
                "refused".into()
            )))
            .status,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_invalid_profile_message_is_readable() {
        let dto = UpdateProfileDto {
            name: Some(" ".into()),
            ..UpdateProfileDto::default()
        };
        let errors = dto.validate().unwrap_err();
        let err = structure_error(StructureError::InvalidProfile(errors));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error.to_string(), "name cannot be blank");
    }

    #[test]
    fn test_catalog_filters() {
        assert_eq!(StructureService::catalog(&CatalogQuery::default()).len(), 26);

        let primary = StructureService::catalog(&CatalogQuery {
            curriculum: None,
            band: Some(Band::Primary),
        });
        assert_eq!(primary.len(), 14);

        let forms = StructureService::catalog(&CatalogQuery {
            curriculum: Some(CurriculumSystem::EightFourFour),
            band: Some(Band::Secondary),
        });
        let codes: Vec<_> = forms.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec!["Form 1", "Form 2", "Form 3", "Form 4"]);
    }
}
