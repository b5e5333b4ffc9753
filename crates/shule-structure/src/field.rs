//! Field identifiers and the disabled-field set handed to renderers.

use serde::{Serialize, Serializer};
use shule_models::LevelFlag;
use std::collections::BTreeMap;
use std::fmt;

/// Every field a caller can address.
///
/// Structural fields shape the school permanently and are locked on commit.
/// Profile fields are listed so the lock guard can answer for them too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    SchoolType,
    PrimaryCurriculum,
    SecondaryCurriculum,
    Level(LevelFlag),
    /// The selected grade set as a whole.
    GradeLevels,
    /// A single per-code checkbox.
    GradeLevel(&'static str),
    Pathways,
    Streams,
    Name,
    Address,
    Email,
    Phone,
    Motto,
}

impl Field {
    pub const fn is_structural(self) -> bool {
        match self {
            Field::SchoolType
            | Field::PrimaryCurriculum
            | Field::SecondaryCurriculum
            | Field::Level(_)
            | Field::GradeLevels
            | Field::GradeLevel(_)
            | Field::Pathways
            | Field::Streams => true,
            Field::Name | Field::Address | Field::Email | Field::Phone | Field::Motto => false,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::SchoolType => f.write_str("school_type"),
            Field::PrimaryCurriculum => f.write_str("primary_curriculum"),
            Field::SecondaryCurriculum => f.write_str("secondary_curriculum"),
            Field::Level(flag) => f.write_str(flag.as_str()),
            Field::GradeLevels => f.write_str("grade_levels"),
            Field::GradeLevel(code) => write!(f, "grade_levels[{code}]"),
            Field::Pathways => f.write_str("senior_secondary_pathways"),
            Field::Streams => f.write_str("has_streams"),
            Field::Name => f.write_str("name"),
            Field::Address => f.write_str("address"),
            Field::Email => f.write_str("email"),
            Field::Phone => f.write_str("phone"),
            Field::Motto => f.write_str("motto"),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Why a field cannot currently be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisableReason {
    /// The configuration is committed.
    Locked,
    /// The value is computed from other fields.
    Derived,
    /// The school type fixes this value.
    ForcedBySchoolType,
    /// The governing curriculum has no codes for this band.
    ExcludedByCurriculum,
    /// Pathways only exist for senior secondary.
    RequiresSeniorSecondary,
    /// Streams are frozen once a level is selected.
    LevelsSelected,
    /// The code's band is not switched on.
    BandNotEnabled,
}

impl DisableReason {
    pub const fn message(self) -> &'static str {
        match self {
            DisableReason::Locked => "the school structure is committed and cannot be changed",
            DisableReason::Derived => "this value is derived from the selected levels",
            DisableReason::ForcedBySchoolType => "this value is fixed by the school type",
            DisableReason::ExcludedByCurriculum => "the selected curriculum does not offer this level",
            DisableReason::RequiresSeniorSecondary => "pathways require senior secondary",
            DisableReason::LevelsSelected => "streams must be decided before selecting levels",
            DisableReason::BandNotEnabled => "the level for this grade is not selected",
        }
    }
}

impl fmt::Display for DisableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Fields the caller must render as non-editable, each with its reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledFields(BTreeMap<Field, DisableReason>);

impl DisabledFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: Field, reason: DisableReason) {
        self.0.insert(field, reason);
    }

    pub fn reason(&self, field: Field) -> Option<DisableReason> {
        self.0.get(&field).copied()
    }

    pub fn is_disabled(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, DisableReason)> + '_ {
        self.0.iter().map(|(field, reason)| (*field, *reason))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for DisabledFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(field, reason)| (field.to_string(), reason)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_fields_are_not_structural() {
        for field in [Field::Name, Field::Address, Field::Email, Field::Phone, Field::Motto] {
            assert!(!field.is_structural());
        }
        assert!(Field::Level(LevelFlag::Primary).is_structural());
        assert!(Field::GradeLevel("Grade 1").is_structural());
    }

    #[test]
    fn test_field_display_uses_record_names() {
        assert_eq!(Field::Level(LevelFlag::Secondary844).to_string(), "has_secondary");
        assert_eq!(Field::Pathways.to_string(), "senior_secondary_pathways");
        assert_eq!(Field::GradeLevel("Form 1").to_string(), "grade_levels[Form 1]");
    }

    #[test]
    fn test_disabled_fields_serialize_as_map() {
        let mut disabled = DisabledFields::new();
        disabled.insert(Field::GradeLevels, DisableReason::Derived);
        disabled.insert(Field::Streams, DisableReason::LevelsSelected);

        let value = serde_json::to_value(&disabled).unwrap();
        assert_eq!(value["grade_levels"], "derived");
        assert_eq!(value["has_streams"], "levels_selected");
        assert_eq!(disabled.len(), 2);
    }
}
