//! Offline commands behind `shule-cli`.
//!
//! Both commands run the engine in process; nothing is persisted.

use serde::Serialize;
use shule_models::{CurriculumSystem, LevelFlag, Pathway, SchoolType};
use shule_structure::{
    ConfigurationStore, DisabledFields, Intent, RejectedMutation, StructureError,
    StructureSnapshot,
};

/// Choices for a dry-run derivation, applied in the order a form fills them.
#[derive(Debug, Clone, Default)]
pub struct DraftChoices {
    pub school_type: Option<SchoolType>,
    pub primary_curriculum: Option<CurriculumSystem>,
    pub secondary_curriculum: Option<CurriculumSystem>,
    pub streams: bool,
    pub levels: Vec<LevelFlag>,
    pub excluded_grades: Vec<String>,
    pub pathways: Vec<Pathway>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftReport {
    pub snapshot: StructureSnapshot,
    pub disabled: DisabledFields,
    /// Choices the engine refused, in the order they were tried.
    pub rejected: Vec<RejectedMutation>,
}

impl DraftChoices {
    fn intents(&self) -> Result<Vec<Intent>, StructureError> {
        let mut intents = Vec::new();
        if let Some(school_type) = self.school_type {
            intents.push(Intent::SetSchoolType(school_type));
        }
        if self.primary_curriculum.is_some() {
            intents.push(Intent::SetPrimaryCurriculum(self.primary_curriculum));
        }
        if self.secondary_curriculum.is_some() {
            intents.push(Intent::SetSecondaryCurriculum(self.secondary_curriculum));
        }
        // Streams freeze once a level is on.
        if self.streams {
            intents.push(Intent::SetStreams(true));
        }
        intents.extend(self.levels.iter().map(|flag| Intent::SetLevel {
            flag: *flag,
            enabled: true,
        }));
        for code in &self.excluded_grades {
            intents.push(Intent::grade_level(code, false)?);
        }
        intents.extend(self.pathways.iter().map(|pathway| Intent::SetPathway {
            pathway: *pathway,
            selected: true,
        }));
        Ok(intents)
    }
}

/// Applies the choices to a fresh draft and reports what the engine made of them.
pub fn derive_draft(choices: &DraftChoices) -> Result<DraftReport, StructureError> {
    let mut store = ConfigurationStore::create();
    let rejected = choices
        .intents()?
        .into_iter()
        .filter_map(|intent| store.apply(intent).rejection())
        .collect();

    Ok(DraftReport {
        snapshot: store.snapshot().clone(),
        disabled: store.disabled_fields(),
        rejected,
    })
}
