//! Immutable configuration snapshots.

use serde::Serialize;
use shule_models::{
    CurriculumSystem, LevelFlags, LifecycleState, Pathway, SchoolType, StructureRecord,
};
use std::collections::BTreeSet;

use crate::catalog;
use crate::derivation::{self, StructureInputs};
use crate::error::StructureError;

/// One resolved state of a school structure.
///
/// Snapshots are only produced by the engine, so every observable snapshot
/// satisfies the structure invariants. `grade_levels` is in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureSnapshot {
    pub(crate) state: LifecycleState,
    pub(crate) school_type: Option<SchoolType>,
    pub(crate) primary_curriculum: Option<CurriculumSystem>,
    pub(crate) secondary_curriculum: Option<CurriculumSystem>,
    #[serde(flatten)]
    pub(crate) levels: LevelFlags,
    #[serde(rename = "has_streams")]
    pub(crate) streams_enabled: bool,
    pub(crate) grade_levels: Vec<&'static str>,
    /// Codes manually unticked inside enabled bands.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub(crate) excluded_grades: BTreeSet<&'static str>,
    #[serde(rename = "senior_secondary_pathways")]
    pub(crate) pathways: BTreeSet<Pathway>,
}

impl StructureSnapshot {
    /// A fresh draft: nothing chosen, every flag off.
    pub fn draft() -> Self {
        Self {
            state: LifecycleState::Draft,
            school_type: None,
            primary_curriculum: None,
            secondary_curriculum: None,
            levels: LevelFlags::default(),
            streams_enabled: false,
            grade_levels: Vec::new(),
            excluded_grades: BTreeSet::new(),
            pathways: BTreeSet::new(),
        }
    }

    /// Rebuilds a snapshot from a stored record.
    ///
    /// Codes are put back into catalog order. Unknown codes, codes outside the
    /// enabled bands, and any other invariant breach refuse the record.
    pub fn from_record(
        record: &StructureRecord,
        state: LifecycleState,
    ) -> Result<Self, StructureError> {
        let mut problems = Vec::new();
        let mut selected = BTreeSet::new();
        for code in &record.grade_levels {
            match catalog::lookup(code) {
                Some(entry) => {
                    selected.insert(entry.code);
                }
                None => problems.push(format!("unknown grade level code '{code}'")),
            }
        }

        let inputs = StructureInputs {
            school_type: record.school_type,
            primary_curriculum: record.primary_curriculum,
            secondary_curriculum: record.secondary_curriculum,
            levels: record.levels,
        };
        let derived = inputs.grade_levels();

        for code in &selected {
            if !derived.contains(code) {
                problems.push(format!(
                    "grade level '{code}' is outside the selected levels"
                ));
            }
        }

        let snapshot = Self {
            state,
            school_type: record.school_type,
            primary_curriculum: record.primary_curriculum,
            secondary_curriculum: record.secondary_curriculum,
            levels: record.levels,
            streams_enabled: record.has_streams,
            grade_levels: derived
                .iter()
                .copied()
                .filter(|code| selected.contains(code))
                .collect(),
            excluded_grades: derived
                .iter()
                .copied()
                .filter(|code| !selected.contains(code))
                .collect(),
            pathways: record.senior_secondary_pathways.iter().copied().collect(),
        };

        problems.extend(derivation::violations(&snapshot));
        if problems.is_empty() {
            Ok(snapshot)
        } else {
            Err(StructureError::InvariantViolation(problems))
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_committed(&self) -> bool {
        self.state == LifecycleState::Committed
    }

    pub fn school_type(&self) -> Option<SchoolType> {
        self.school_type
    }

    pub fn primary_curriculum(&self) -> Option<CurriculumSystem> {
        self.primary_curriculum
    }

    pub fn secondary_curriculum(&self) -> Option<CurriculumSystem> {
        self.secondary_curriculum
    }

    pub fn levels(&self) -> LevelFlags {
        self.levels
    }

    pub fn streams_enabled(&self) -> bool {
        self.streams_enabled
    }

    pub fn grade_levels(&self) -> &[&'static str] {
        &self.grade_levels
    }

    pub fn excluded_grades(&self) -> &BTreeSet<&'static str> {
        &self.excluded_grades
    }

    pub fn pathways(&self) -> &BTreeSet<Pathway> {
        &self.pathways
    }

    /// The inputs the grade set is derived from.
    pub fn inputs(&self) -> StructureInputs {
        StructureInputs {
            school_type: self.school_type,
            primary_curriculum: self.primary_curriculum,
            secondary_curriculum: self.secondary_curriculum,
            levels: self.levels,
        }
    }

    pub fn to_record(&self) -> StructureRecord {
        StructureRecord {
            school_type: self.school_type,
            primary_curriculum: self.primary_curriculum,
            secondary_curriculum: self.secondary_curriculum,
            levels: self.levels,
            has_streams: self.streams_enabled,
            grade_levels: self.grade_levels.iter().map(|code| code.to_string()).collect(),
            senior_secondary_pathways: self.pathways.iter().copied().collect(),
        }
    }
}

impl Default for StructureSnapshot {
    fn default() -> Self {
        Self::draft()
    }
}
