//! Static grade/class catalog.
//!
//! The catalog is a compile-time constant. Every lookup returns entries in
//! definition order so rendering and derived grade lists stay stable.

use serde::Serialize;
use shule_models::{Band, Curriculum, CurriculumSystem};

/// One concrete grade or class a school can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GradeCatalogEntry {
    pub code: &'static str,
    pub curriculum: Curriculum,
    pub band: Band,
}

const fn cbc(code: &'static str, band: Band) -> GradeCatalogEntry {
    GradeCatalogEntry {
        code,
        curriculum: Curriculum::Cbc,
        band,
    }
}

const fn eight_four_four(code: &'static str, band: Band) -> GradeCatalogEntry {
    GradeCatalogEntry {
        code,
        curriculum: Curriculum::EightFourFour,
        band,
    }
}

static CATALOG: [GradeCatalogEntry; 26] = [
    cbc("PP1", Band::PrePrimary),
    cbc("PP2", Band::PrePrimary),
    cbc("Grade 1", Band::Primary),
    cbc("Grade 2", Band::Primary),
    cbc("Grade 3", Band::Primary),
    cbc("Grade 4", Band::Primary),
    cbc("Grade 5", Band::Primary),
    cbc("Grade 6", Band::Primary),
    cbc("Grade 7", Band::JuniorSecondary),
    cbc("Grade 8", Band::JuniorSecondary),
    cbc("Grade 9", Band::JuniorSecondary),
    cbc("Grade 10", Band::SeniorSecondary),
    cbc("Grade 11", Band::SeniorSecondary),
    cbc("Grade 12", Band::SeniorSecondary),
    eight_four_four("Standard 1", Band::Primary),
    eight_four_four("Standard 2", Band::Primary),
    eight_four_four("Standard 3", Band::Primary),
    eight_four_four("Standard 4", Band::Primary),
    eight_four_four("Standard 5", Band::Primary),
    eight_four_four("Standard 6", Band::Primary),
    eight_four_four("Standard 7", Band::Primary),
    eight_four_four("Standard 8", Band::Primary),
    eight_four_four("Form 1", Band::Secondary),
    eight_four_four("Form 2", Band::Secondary),
    eight_four_four("Form 3", Band::Secondary),
    eight_four_four("Form 4", Band::Secondary),
];

/// The full catalog in definition order.
pub fn all() -> &'static [GradeCatalogEntry] {
    &CATALOG
}

/// Entries of one curriculum, optionally narrowed to a band.
pub fn entries_for(curriculum: Curriculum, band: Option<Band>) -> Vec<&'static GradeCatalogEntry> {
    CATALOG
        .iter()
        .filter(|entry| entry.curriculum == curriculum)
        .filter(|entry| band.is_none_or(|band| entry.band == band))
        .collect()
}

/// Entries of every curriculum a system activates, optionally narrowed to a band.
///
/// Every CBC entry precedes every 8-4-4 entry, so chaining per-curriculum
/// results keeps definition order.
pub fn entries_for_system(
    system: CurriculumSystem,
    band: Option<Band>,
) -> Vec<&'static GradeCatalogEntry> {
    system
        .curricula()
        .iter()
        .flat_map(|curriculum| entries_for(*curriculum, band))
        .collect()
}

/// Entries matching an optional curriculum system and an optional band.
pub fn search(
    system: Option<CurriculumSystem>,
    band: Option<Band>,
) -> Vec<&'static GradeCatalogEntry> {
    match system {
        Some(system) => entries_for_system(system, band),
        None => CATALOG
            .iter()
            .filter(|entry| band.is_none_or(|band| entry.band == band))
            .collect(),
    }
}

/// Finds the entry for an exact catalog code.
pub fn lookup(code: &str) -> Option<&'static GradeCatalogEntry> {
    let code = code.trim();
    CATALOG.iter().find(|entry| entry.code == code)
}

/// Bands that have at least one code in the given curriculum, in catalog order.
pub fn bands_for(curriculum: Curriculum) -> Vec<Band> {
    let mut bands = Vec::new();
    for entry in CATALOG.iter().filter(|entry| entry.curriculum == curriculum) {
        if !bands.contains(&entry.band) {
            bands.push(entry.band);
        }
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn codes(entries: &[&GradeCatalogEntry]) -> Vec<&'static str> {
        entries.iter().map(|entry| entry.code).collect()
    }

    #[test]
    fn test_search_without_filters_is_whole_catalog() {
        assert_eq!(search(None, None).len(), all().len());
        assert_eq!(search(None, Some(Band::Primary)).len(), 14);
        assert_eq!(
            codes(&search(Some(CurriculumSystem::Cbc), Some(Band::PrePrimary))),
            vec!["PP1", "PP2"]
        );
    }

    #[test]
    fn test_catalog_codes_are_unique() {
        let unique: HashSet<_> = all().iter().map(|entry| entry.code).collect();
        assert_eq!(unique.len(), all().len());
    }

    #[test]
    fn test_entries_for_cbc_primary() {
        let entries = entries_for(Curriculum::Cbc, Some(Band::Primary));
        assert_eq!(
            codes(&entries),
            vec!["Grade 1", "Grade 2", "Grade 3", "Grade 4", "Grade 5", "Grade 6"]
        );
    }

    #[test]
    fn test_entries_for_eight_four_four_secondary() {
        let entries = entries_for(Curriculum::EightFourFour, Some(Band::Secondary));
        assert_eq!(codes(&entries), vec!["Form 1", "Form 2", "Form 3", "Form 4"]);
    }

    #[test]
    fn test_entries_for_without_band_keeps_definition_order() {
        let entries = entries_for(Curriculum::Cbc, None);
        assert_eq!(entries.len(), 14);
        assert_eq!(entries.first().map(|e| e.code), Some("PP1"));
        assert_eq!(entries.last().map(|e| e.code), Some("Grade 12"));
    }

    #[test]
    fn test_entries_for_band_not_in_curriculum_is_empty() {
        assert!(entries_for(Curriculum::Cbc, Some(Band::Secondary)).is_empty());
        assert!(entries_for(Curriculum::EightFourFour, Some(Band::PrePrimary)).is_empty());
    }

    #[test]
    fn test_entries_for_system_both_primary() {
        let entries = entries_for_system(CurriculumSystem::Both, Some(Band::Primary));
        assert_eq!(entries.len(), 14);
    }

    #[test]
    fn test_entries_for_system_both_is_whole_catalog_in_order() {
        let entries: Vec<GradeCatalogEntry> = entries_for_system(CurriculumSystem::Both, None)
            .into_iter()
            .copied()
            .collect();
        assert_eq!(entries, all());
        assert_eq!(
            entries_for_system(CurriculumSystem::EightFourFour, None),
            entries_for(Curriculum::EightFourFour, None)
        );
    }

    #[test]
    fn test_lookup() {
        let entry = lookup("Form 2").unwrap();
        assert_eq!(entry.curriculum, Curriculum::EightFourFour);
        assert_eq!(entry.band, Band::Secondary);

        assert_eq!(lookup(" Grade 7 ").map(|e| e.band), Some(Band::JuniorSecondary));
        assert!(lookup("Grade 13").is_none());
        assert!(lookup("form 2").is_none());
    }

    #[test]
    fn test_bands_for() {
        assert_eq!(
            bands_for(Curriculum::Cbc),
            vec![
                Band::PrePrimary,
                Band::Primary,
                Band::JuniorSecondary,
                Band::SeniorSecondary
            ]
        );
        assert_eq!(
            bands_for(Curriculum::EightFourFour),
            vec![Band::Primary, Band::Secondary]
        );
    }

    #[test]
    fn test_every_entry_band_accepts_its_curriculum() {
        for entry in all() {
            assert!(entry.band.curricula().contains(&entry.curriculum));
        }
    }
}
