//! Property tests over random intent sequences.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use shule_models::{
    Band, Curriculum, CurriculumSystem, LevelFlag, LifecycleState, Pathway, SchoolType,
};
use shule_structure::{
    DisableReason, Intent, StructureSnapshot, catalog,
    derivation::{self, apply},
};

fn school_type() -> impl Strategy<Value = SchoolType> {
    prop::sample::select(SchoolType::ALL.to_vec())
}

fn curriculum() -> impl Strategy<Value = Option<CurriculumSystem>> {
    prop::option::of(prop::sample::select(CurriculumSystem::ALL.to_vec()))
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        1 => school_type().prop_map(Intent::SetSchoolType),
        1 => curriculum().prop_map(Intent::SetPrimaryCurriculum),
        1 => curriculum().prop_map(Intent::SetSecondaryCurriculum),
        3 => (prop::sample::select(LevelFlag::ALL.to_vec()), any::<bool>())
            .prop_map(|(flag, enabled)| Intent::SetLevel { flag, enabled }),
        2 => (prop::sample::select(catalog::all().to_vec()), any::<bool>()).prop_map(
            |(entry, selected)| Intent::SetGradeLevel {
                code: entry.code,
                selected,
            }
        ),
        1 => (prop::sample::select(Pathway::ALL.to_vec()), any::<bool>())
            .prop_map(|(pathway, selected)| Intent::SetPathway { pathway, selected }),
        1 => any::<bool>().prop_map(Intent::SetStreams),
        1 => prop::sample::subsequence(
            catalog::all().iter().map(|e| e.code).collect::<Vec<_>>(),
            0..4
        )
        .prop_map(Intent::ReplaceGradeLevels),
    ]
}

/// The school-type and curriculum rules, written out field by field.
fn check_structure_rules(snapshot: &StructureSnapshot) -> Result<(), TestCaseError> {
    let levels = snapshot.levels();
    let primary = snapshot.primary_curriculum();
    let secondary = snapshot.secondary_curriculum();

    match snapshot.school_type() {
        Some(SchoolType::Primary) => {
            prop_assert_eq!(primary, Some(CurriculumSystem::Cbc));
            prop_assert_eq!(secondary, None);
            prop_assert!(!levels.has_senior_secondary);
            prop_assert!(!levels.has_secondary_844);
        }
        Some(SchoolType::Secondary) => {
            prop_assert_eq!(primary, None);
            prop_assert!(!levels.has_pre_primary);
            prop_assert!(!levels.has_primary);
            prop_assert!(!levels.has_junior_secondary);
        }
        Some(SchoolType::Mixed) => {
            prop_assert_eq!(primary, Some(CurriculumSystem::Cbc));
        }
        None => {
            prop_assert_eq!(secondary, None);
        }
    }

    if primary == Some(CurriculumSystem::EightFourFour) {
        prop_assert!(!levels.has_pre_primary);
        prop_assert!(!levels.has_junior_secondary);
        prop_assert!(!levels.has_senior_secondary);
    }
    if primary == Some(CurriculumSystem::Cbc)
        && !matches!(snapshot.school_type(), Some(SchoolType::Mixed))
    {
        prop_assert!(!levels.has_secondary_844);
    }

    if !levels.has_senior_secondary {
        prop_assert!(snapshot.pathways().is_empty());
    }

    for code in snapshot.grade_levels() {
        let entry = catalog::lookup(code).ok_or_else(|| TestCaseError::fail(*code))?;
        let (band_on, governing) = match entry.band {
            Band::PrePrimary => (levels.has_pre_primary, primary),
            Band::Primary => (levels.has_primary, primary),
            Band::JuniorSecondary => (levels.has_junior_secondary, primary),
            Band::SeniorSecondary | Band::Secondary => {
                let side = match snapshot.school_type() {
                    Some(SchoolType::Secondary | SchoolType::Mixed) => secondary,
                    _ => primary,
                };
                let flag = if entry.band == Band::SeniorSecondary {
                    levels.has_senior_secondary
                } else {
                    levels.has_secondary_844
                };
                (flag, side)
            }
        };
        prop_assert!(band_on, "{} offered with its band off", code);
        prop_assert!(
            matches!(
                (governing, entry.curriculum),
                (Some(CurriculumSystem::Both), _)
                    | (Some(CurriculumSystem::Cbc), Curriculum::Cbc)
                    | (Some(CurriculumSystem::EightFourFour), Curriculum::EightFourFour)
            ),
            "{} offered under {:?}",
            code,
            governing
        );
    }
    Ok(())
}

fn replay(intents: &[Intent]) -> StructureSnapshot {
    intents
        .iter()
        .fold(StructureSnapshot::draft(), |snapshot, intent| {
            apply(&snapshot, intent).snapshot
        })
}

proptest! {
    #[test]
    fn every_reachable_snapshot_holds_the_invariants(intents in prop::collection::vec(intent(), 0..40)) {
        let mut snapshot = StructureSnapshot::draft();
        for intent in &intents {
            let transition = apply(&snapshot, intent);
            let problems = derivation::violations(&transition.snapshot);
            prop_assert!(problems.is_empty(), "{:?} after {:?}", problems, intent);
            check_structure_rules(&transition.snapshot)?;

            if !transition.is_accepted() {
                prop_assert_eq!(&transition.snapshot, &snapshot);
            }
            snapshot = transition.snapshot;
        }
    }

    #[test]
    fn replay_is_deterministic(intents in prop::collection::vec(intent(), 0..40)) {
        prop_assert_eq!(replay(&intents), replay(&intents));
    }

    #[test]
    fn grade_levels_follow_catalog_order_without_duplicates(intents in prop::collection::vec(intent(), 0..40)) {
        let snapshot = replay(&intents);
        let positions: Vec<usize> = snapshot
            .grade_levels()
            .iter()
            .map(|code| {
                catalog::all()
                    .iter()
                    .position(|entry| entry.code == *code)
                    .unwrap()
            })
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn committed_snapshots_never_change(
        setup in prop::collection::vec(intent(), 0..20),
        attempts in prop::collection::vec(intent(), 1..20),
    ) {
        let draft = replay(&setup);
        let committed =
            StructureSnapshot::from_record(&draft.to_record(), LifecycleState::Committed).unwrap();

        for intent in &attempts {
            let transition = apply(&committed, intent);
            prop_assert_eq!(&transition.snapshot, &committed);
            prop_assert_eq!(
                transition.rejection().map(|r| r.reason),
                Some(DisableReason::Locked)
            );
        }
    }
}
