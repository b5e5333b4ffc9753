//! Records exchanged with the persistence backend.
//!
//! Field names follow the backend's school resource. Grade levels travel as
//! plain strings because a stored record may predate the current catalog; the
//! engine checks every code when it loads a record.

use serde::{Deserialize, Serialize};

use crate::profile::SchoolProfile;
use crate::structure::{CurriculumSystem, LevelFlags, Pathway, SchoolType};

/// The structural half of a school record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRecord {
    pub school_type: Option<SchoolType>,
    pub primary_curriculum: Option<CurriculumSystem>,
    pub secondary_curriculum: Option<CurriculumSystem>,
    #[serde(flatten)]
    pub levels: LevelFlags,
    #[serde(default)]
    pub has_streams: bool,
    #[serde(default)]
    pub grade_levels: Vec<String>,
    #[serde(default)]
    pub senior_secondary_pathways: Vec<Pathway>,
}

/// A full school record: profile plus structure, flattened into one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRecord {
    #[serde(flatten)]
    pub profile: SchoolProfile,
    #[serde(flatten)]
    pub structure: StructureRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_school_record_wire_shape() {
        let record = SchoolRecord {
            profile: SchoolProfile {
                name: "Lakeside School".to_string(),
                ..SchoolProfile::default()
            },
            structure: StructureRecord {
                school_type: Some(SchoolType::Secondary),
                secondary_curriculum: Some(CurriculumSystem::EightFourFour),
                levels: LevelFlags {
                    has_secondary_844: true,
                    ..LevelFlags::default()
                },
                grade_levels: vec!["Form 1".to_string(), "Form 2".to_string()],
                ..StructureRecord::default()
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Lakeside School");
        assert_eq!(value["school_type"], "secondary");
        assert_eq!(value["primary_curriculum"], serde_json::Value::Null);
        assert_eq!(value["secondary_curriculum"], "8-4-4");
        assert_eq!(value["has_secondary"], true);
        assert_eq!(value["has_streams"], false);
        assert_eq!(value["grade_levels"], json!(["Form 1", "Form 2"]));
        assert_eq!(value["senior_secondary_pathways"], json!([]));
    }

    #[test]
    fn test_school_record_deserializes_backend_payload() {
        let payload = json!({
            "name": "Hillcrest",
            "address": null,
            "school_type": "mixed",
            "primary_curriculum": "CBC",
            "secondary_curriculum": "Both",
            "has_primary": true,
            "has_senior_secondary": true,
            "grade_levels": ["Grade 1", "Grade 10"],
            "senior_secondary_pathways": ["STEM"]
        });

        let record: SchoolRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.profile.name, "Hillcrest");
        assert_eq!(record.structure.school_type, Some(SchoolType::Mixed));
        assert_eq!(
            record.structure.secondary_curriculum,
            Some(CurriculumSystem::Both)
        );
        assert!(record.structure.levels.has_primary);
        assert!(!record.structure.levels.has_pre_primary);
        assert_eq!(record.structure.senior_secondary_pathways, vec![Pathway::Stem]);
    }
}
