//! Mutation intents.
//!
//! [`Intent`] is the closed set of structural edits. Rendering layers that only
//! know field names send a [`RawIntent`], which is parsed here; anything that
//! does not parse is a [`StructureError::MalformedIntent`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shule_models::{CurriculumSystem, LevelFlag, ParseVariantError, Pathway, SchoolType};
use std::str::FromStr;

use crate::catalog;
use crate::error::StructureError;
use crate::field::Field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetSchoolType(SchoolType),
    /// `None` clears the slot (not applicable).
    SetPrimaryCurriculum(Option<CurriculumSystem>),
    SetSecondaryCurriculum(Option<CurriculumSystem>),
    SetLevel { flag: LevelFlag, enabled: bool },
    /// Manual pick of one code inside an enabled band.
    SetGradeLevel { code: &'static str, selected: bool },
    /// Wholesale replacement of the grade set. Always refused: the set is derived.
    ReplaceGradeLevels(Vec<&'static str>),
    SetPathway { pathway: Pathway, selected: bool },
    SetStreams(bool),
}

impl Intent {
    /// The field this intent targets.
    pub fn field(&self) -> Field {
        match self {
            Intent::SetSchoolType(_) => Field::SchoolType,
            Intent::SetPrimaryCurriculum(_) => Field::PrimaryCurriculum,
            Intent::SetSecondaryCurriculum(_) => Field::SecondaryCurriculum,
            Intent::SetLevel { flag, .. } => Field::Level(*flag),
            Intent::SetGradeLevel { code, .. } => Field::GradeLevel(*code),
            Intent::ReplaceGradeLevels(_) => Field::GradeLevels,
            Intent::SetPathway { .. } => Field::Pathways,
            Intent::SetStreams(_) => Field::Streams,
        }
    }

    /// Builds a per-code pick, resolving `code` against the catalog.
    pub fn grade_level(code: &str, selected: bool) -> Result<Self, StructureError> {
        let entry = catalog::lookup(code)
            .ok_or_else(|| StructureError::malformed(format!("unknown grade level code '{code}'")))?;
        Ok(Intent::SetGradeLevel {
            code: entry.code,
            selected,
        })
    }
}

/// An intent as a field name and a JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIntent {
    pub field: String,
    #[serde(default)]
    pub value: Value,
}

impl RawIntent {
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

impl TryFrom<RawIntent> for Intent {
    type Error = StructureError;

    fn try_from(raw: RawIntent) -> Result<Self, Self::Error> {
        let field = raw.field.trim();
        let value = &raw.value;

        match field {
            "school_type" => Ok(Intent::SetSchoolType(variant(field, value)?)),
            "primary_curriculum" => Ok(Intent::SetPrimaryCurriculum(optional_variant(
                field, value,
            )?)),
            "secondary_curriculum" => Ok(Intent::SetSecondaryCurriculum(optional_variant(
                field, value,
            )?)),
            "has_streams" => Ok(Intent::SetStreams(boolean(field, value)?)),
            "grade_levels" => match value {
                Value::Array(items) => {
                    let codes = items
                        .iter()
                        .map(|item| code(field, item))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Intent::ReplaceGradeLevels(codes))
                }
                Value::Object(_) => Ok(Intent::SetGradeLevel {
                    code: code(field, member(field, value, "code")?)?,
                    selected: boolean(field, member(field, value, "selected")?)?,
                }),
                other => Err(StructureError::malformed(format!(
                    "'{field}' expects {{\"code\", \"selected\"}} or an array of codes, got {other}"
                ))),
            },
            "senior_secondary_pathways" => Ok(Intent::SetPathway {
                pathway: variant(field, member(field, value, "pathway")?)?,
                selected: boolean(field, member(field, value, "selected")?)?,
            }),
            other => match other.parse::<LevelFlag>() {
                Ok(flag) => Ok(Intent::SetLevel {
                    flag,
                    enabled: boolean(field, value)?,
                }),
                Err(_) => Err(StructureError::malformed(format!(
                    "unknown structural field '{other}'"
                ))),
            },
        }
    }
}

fn boolean(field: &str, value: &Value) -> Result<bool, StructureError> {
    value.as_bool().ok_or_else(|| {
        StructureError::malformed(format!("'{field}' expects a boolean, got {value}"))
    })
}

fn text<'v>(field: &str, value: &'v Value) -> Result<&'v str, StructureError> {
    value.as_str().ok_or_else(|| {
        StructureError::malformed(format!("'{field}' expects a string, got {value}"))
    })
}

fn variant<T>(field: &str, value: &Value) -> Result<T, StructureError>
where
    T: FromStr<Err = ParseVariantError>,
{
    text(field, value)?
        .parse()
        .map_err(|e: ParseVariantError| StructureError::malformed(format!("'{field}': {e}")))
}

/// Null or an empty string clear the slot.
fn optional_variant<T>(field: &str, value: &Value) -> Result<Option<T>, StructureError>
where
    T: FromStr<Err = ParseVariantError>,
{
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        _ => variant(field, value).map(Some),
    }
}

fn member<'v>(field: &str, value: &'v Value, key: &str) -> Result<&'v Value, StructureError> {
    value
        .get(key)
        .ok_or_else(|| StructureError::malformed(format!("'{field}' is missing \"{key}\"")))
}

fn code(field: &str, value: &Value) -> Result<&'static str, StructureError> {
    let raw = text(field, value)?;
    catalog::lookup(raw)
        .map(|entry| entry.code)
        .ok_or_else(|| StructureError::malformed(format!("unknown grade level code '{raw}'")))
}
