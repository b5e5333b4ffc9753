use serde::{Deserialize, Serialize};
use shule_core::serde::deserialize_optional_from_str;
use shule_models::{Band, CurriculumSystem, LifecycleState, SchoolProfile, SessionId};
use shule_structure::{ConfigurationStore, DisabledFields, StructureSnapshot, Transition};

/// Everything a client needs to render a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub state: LifecycleState,
    pub snapshot: StructureSnapshot,
    pub disabled: DisabledFields,
    pub profile: SchoolProfile,
}

impl SessionView {
    pub fn from_store(id: SessionId, store: &ConfigurationStore) -> Self {
        Self {
            id,
            state: store.state(),
            snapshot: store.snapshot().clone(),
            disabled: store.disabled_fields(),
            profile: store.profile().clone(),
        }
    }
}

/// Result of one structural intent.
///
/// `outcome.status` is `accepted` or `rejected`; a rejection carries the
/// field and the reason to show.
#[derive(Debug, Clone, Serialize)]
pub struct IntentResponse {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub transition: Transition,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub curriculum: Option<CurriculumSystem>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub band: Option<Band>,
}
