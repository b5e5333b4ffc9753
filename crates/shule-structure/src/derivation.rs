//! Derivation engine.
//!
//! [`apply`] is a pure reducer: it takes the current snapshot and one intent
//! and returns the next snapshot with the disabled-field set. A change is
//! resolved in a fixed order so one pass always converges:
//!
//! 1. lock check (committed configurations refuse structural edits)
//! 2. school type forcing (curriculum slots, side flags)
//! 3. curriculum forcing (flags the governing curriculum cannot offer)
//! 4. pathways cleared without senior secondary
//! 5. grade levels re-derived from scratch, minus manual exclusions
//! 6. disabled fields recomputed
//!
//! Invalid requests are not errors. They come back as
//! [`Outcome::Rejected`] with the snapshot untouched.

use serde::Serialize;
use shule_models::{
    CurriculumSystem, LevelFlag, LevelFlags, LifecycleState, SchoolType, Side,
};

use crate::catalog::{self, GradeCatalogEntry};
use crate::field::{DisableReason, DisabledFields, Field};
use crate::intent::Intent;
use crate::lock;
use crate::snapshot::StructureSnapshot;

/// The values the grade set is a function of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StructureInputs {
    pub school_type: Option<SchoolType>,
    pub primary_curriculum: Option<CurriculumSystem>,
    pub secondary_curriculum: Option<CurriculumSystem>,
    pub levels: LevelFlags,
}

/// The primary curriculum a school type imposes.
///
/// `None` means the slot is free; `Some(None)` means it is forced to not applicable.
pub const fn forced_primary_curriculum(
    school_type: Option<SchoolType>,
) -> Option<Option<CurriculumSystem>> {
    match school_type {
        Some(SchoolType::Primary) | Some(SchoolType::Mixed) => Some(Some(CurriculumSystem::Cbc)),
        Some(SchoolType::Secondary) => Some(None),
        None => None,
    }
}

/// Whether the school type has a separate secondary curriculum.
pub const fn secondary_curriculum_applies(school_type: Option<SchoolType>) -> bool {
    matches!(
        school_type,
        Some(SchoolType::Secondary) | Some(SchoolType::Mixed)
    )
}

/// Whether the school type rules out a flag entirely.
pub const fn school_type_excludes(school_type: Option<SchoolType>, flag: LevelFlag) -> bool {
    match school_type {
        Some(SchoolType::Primary) => matches!(flag.side(), Side::Secondary),
        Some(SchoolType::Secondary) => matches!(flag.side(), Side::Primary),
        Some(SchoolType::Mixed) | None => false,
    }
}

impl StructureInputs {
    /// The curriculum that decides which codes a side offers.
    ///
    /// Secondary and Mixed schools govern their secondary side by
    /// `secondary_curriculum`, so a Mixed school keeps CBC on the primary side
    /// and may still offer 8-4-4 forms.
    pub fn governing_curriculum(&self, side: Side) -> Option<CurriculumSystem> {
        match side {
            Side::Primary => self.primary_curriculum,
            Side::Secondary if secondary_curriculum_applies(self.school_type) => {
                self.secondary_curriculum
            }
            Side::Secondary => self.primary_curriculum,
        }
    }

    /// Whether the governing curriculum has no codes in the flag's band.
    ///
    /// An unset curriculum excludes nothing.
    pub fn curriculum_excludes(&self, flag: LevelFlag) -> bool {
        match self.governing_curriculum(flag.side()) {
            Some(system) => !flag
                .band()
                .curricula()
                .iter()
                .any(|curriculum| system.includes(*curriculum)),
            None => false,
        }
    }

    /// Why a flag cannot be switched on, if it cannot.
    pub fn level_block(&self, flag: LevelFlag) -> Option<DisableReason> {
        if school_type_excludes(self.school_type, flag) {
            Some(DisableReason::ForcedBySchoolType)
        } else if self.curriculum_excludes(flag) {
            Some(DisableReason::ExcludedByCurriculum)
        } else {
            None
        }
    }

    /// Whether a catalog entry belongs to a band that is switched on under an
    /// active curriculum.
    pub fn offers(&self, entry: &GradeCatalogEntry) -> bool {
        let flag = entry.band.flag();
        self.levels.get(flag)
            && self
                .governing_curriculum(flag.side())
                .is_some_and(|system| system.includes(entry.curriculum))
    }

    /// Every code the current flags and curricula enable, in catalog order.
    ///
    /// Walking the catalog once means codes shared by overlapping selections
    /// appear exactly once.
    pub fn grade_levels(&self) -> Vec<&'static str> {
        catalog::all()
            .iter()
            .filter(|entry| self.offers(entry))
            .map(|entry| entry.code)
            .collect()
    }
}

/// Whether an intent was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    Rejected(RejectedMutation),
}

/// A refused mutation, with the reason to show the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RejectedMutation {
    pub field: Field,
    pub reason: DisableReason,
}

/// Result of applying one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub snapshot: StructureSnapshot,
    pub disabled: DisabledFields,
    pub outcome: Outcome,
}

impl Transition {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted)
    }

    pub fn rejection(&self) -> Option<RejectedMutation> {
        match self.outcome {
            Outcome::Accepted => None,
            Outcome::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Applies one intent to a snapshot.
pub fn apply(current: &StructureSnapshot, intent: &Intent) -> Transition {
    let field = intent.field();
    let disabled = disabled_fields(current);

    if !lock::can_mutate(field, current.state) {
        return rejected(current, disabled, field, DisableReason::Locked);
    }
    if let Some(reason) = disabled.reason(field) {
        return rejected(current, disabled, field, reason);
    }

    let mut next = current.clone();
    mutate(&mut next, intent);
    normalize(&mut next);

    Transition {
        disabled: disabled_fields(&next),
        snapshot: next,
        outcome: Outcome::Accepted,
    }
}

fn rejected(
    current: &StructureSnapshot,
    disabled: DisabledFields,
    field: Field,
    reason: DisableReason,
) -> Transition {
    Transition {
        snapshot: current.clone(),
        disabled,
        outcome: Outcome::Rejected(RejectedMutation { field, reason }),
    }
}

fn mutate(snapshot: &mut StructureSnapshot, intent: &Intent) {
    match intent {
        Intent::SetSchoolType(school_type) => snapshot.school_type = Some(*school_type),
        Intent::SetPrimaryCurriculum(system) => snapshot.primary_curriculum = *system,
        Intent::SetSecondaryCurriculum(system) => snapshot.secondary_curriculum = *system,
        Intent::SetLevel { flag, enabled } => snapshot.levels.set(*flag, *enabled),
        Intent::SetGradeLevel { code, selected } => {
            if *selected {
                snapshot.excluded_grades.remove(code);
            } else {
                snapshot.excluded_grades.insert(*code);
            }
        }
        Intent::SetPathway { pathway, selected } => {
            if *selected {
                snapshot.pathways.insert(*pathway);
            } else {
                snapshot.pathways.remove(pathway);
            }
        }
        Intent::SetStreams(enabled) => snapshot.streams_enabled = *enabled,
        // Always disabled as derived; never reaches here.
        Intent::ReplaceGradeLevels(_) => {}
    }
}

/// Brings a mutated snapshot back in line with every invariant.
pub(crate) fn normalize(snapshot: &mut StructureSnapshot) {
    // School type forcing.
    if let Some(forced) = forced_primary_curriculum(snapshot.school_type) {
        snapshot.primary_curriculum = forced;
    }
    if !secondary_curriculum_applies(snapshot.school_type) {
        snapshot.secondary_curriculum = None;
    }
    for flag in LevelFlag::ALL {
        if school_type_excludes(snapshot.school_type, *flag) {
            snapshot.levels.set(*flag, false);
        }
    }

    // Curriculum forcing.
    let inputs = snapshot.inputs();
    for flag in LevelFlag::ALL {
        if inputs.curriculum_excludes(*flag) {
            snapshot.levels.set(*flag, false);
        }
    }

    if !snapshot.levels.has_senior_secondary {
        snapshot.pathways.clear();
    }

    // Exclusions only survive inside enabled bands, so switching a band off
    // forgets every manual pick in it.
    let derived = snapshot.inputs().grade_levels();
    snapshot
        .excluded_grades
        .retain(|code| derived.contains(code));
    snapshot.grade_levels = derived
        .into_iter()
        .filter(|code| !snapshot.excluded_grades.contains(code))
        .collect();
}

/// Fields the caller must render as non-editable.
pub fn disabled_fields(snapshot: &StructureSnapshot) -> DisabledFields {
    let mut disabled = DisabledFields::new();

    if snapshot.state == LifecycleState::Committed {
        disabled.insert(Field::SchoolType, DisableReason::Locked);
        disabled.insert(Field::PrimaryCurriculum, DisableReason::Locked);
        disabled.insert(Field::SecondaryCurriculum, DisableReason::Locked);
        for flag in LevelFlag::ALL {
            disabled.insert(Field::Level(*flag), DisableReason::Locked);
        }
        disabled.insert(Field::GradeLevels, DisableReason::Locked);
        for entry in catalog::all() {
            disabled.insert(Field::GradeLevel(entry.code), DisableReason::Locked);
        }
        disabled.insert(Field::Pathways, DisableReason::Locked);
        disabled.insert(Field::Streams, DisableReason::Locked);
        return disabled;
    }

    if forced_primary_curriculum(snapshot.school_type).is_some() {
        disabled.insert(Field::PrimaryCurriculum, DisableReason::ForcedBySchoolType);
    }
    if !secondary_curriculum_applies(snapshot.school_type) {
        disabled.insert(Field::SecondaryCurriculum, DisableReason::ForcedBySchoolType);
    }

    let inputs = snapshot.inputs();
    for flag in LevelFlag::ALL {
        if let Some(reason) = inputs.level_block(*flag) {
            disabled.insert(Field::Level(*flag), reason);
        }
    }

    disabled.insert(Field::GradeLevels, DisableReason::Derived);
    for entry in catalog::all() {
        if !inputs.offers(entry) {
            disabled.insert(Field::GradeLevel(entry.code), DisableReason::BandNotEnabled);
        }
    }

    if !snapshot.levels.has_senior_secondary {
        disabled.insert(Field::Pathways, DisableReason::RequiresSeniorSecondary);
    }
    if snapshot.levels.any() {
        disabled.insert(Field::Streams, DisableReason::LevelsSelected);
    }

    disabled
}

fn describe(system: Option<CurriculumSystem>) -> &'static str {
    system.map_or("N/A", CurriculumSystem::as_str)
}

/// Every invariant the snapshot breaks, as readable messages.
///
/// Streams are not checked: a streams flag set before levels were chosen stays
/// frozen at its value rather than being cleared.
pub fn violations(snapshot: &StructureSnapshot) -> Vec<String> {
    let mut problems = Vec::new();
    let school_type = snapshot.school_type;
    let type_name = school_type.map_or("unset", SchoolType::as_str);

    if let Some(forced) = forced_primary_curriculum(school_type)
        && snapshot.primary_curriculum != forced
    {
        problems.push(format!(
            "primary_curriculum must be {} for {} schools, found {}",
            describe(forced),
            type_name,
            describe(snapshot.primary_curriculum)
        ));
    }
    if !secondary_curriculum_applies(school_type) && snapshot.secondary_curriculum.is_some() {
        problems.push(format!(
            "secondary_curriculum does not apply when school type is {}",
            type_name
        ));
    }

    let inputs = snapshot.inputs();
    for flag in snapshot.levels.enabled() {
        if let Some(reason) = inputs.level_block(flag) {
            problems.push(format!("{} cannot be set: {}", flag, reason));
        }
    }

    let derived = inputs.grade_levels();
    let expected: Vec<&'static str> = derived
        .iter()
        .copied()
        .filter(|code| !snapshot.excluded_grades.contains(code))
        .collect();
    if snapshot.grade_levels != expected {
        problems.push("grade_levels does not match the selected levels".to_string());
    }
    if snapshot
        .excluded_grades
        .iter()
        .any(|code| !derived.contains(code))
    {
        problems.push("grade exclusions reference a band that is not selected".to_string());
    }

    if !snapshot.pathways.is_empty() && !snapshot.levels.has_senior_secondary {
        problems.push("senior_secondary_pathways require has_senior_secondary".to_string());
    }

    problems
}
