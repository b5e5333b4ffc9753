//! Non-structural school details.
//!
//! These fields describe the school but not its educational shape, so they stay
//! editable after the structure is committed.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::value_types::{Email, PhoneNumber};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("name cannot be blank".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SchoolProfile {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    #[serde(default)]
    pub name: String,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    #[validate(length(max = 255))]
    pub motto: Option<String>,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    #[validate(length(max = 255))]
    pub motto: Option<String>,
}

impl UpdateProfileDto {
    pub fn apply_to(self, profile: &mut SchoolProfile) {
        if let Some(name) = self.name {
            profile.name = name.trim().to_string();
        }
        if let Some(address) = self.address {
            profile.address = Some(address);
        }
        if let Some(email) = self.email {
            profile.email = Some(email);
        }
        if let Some(phone) = self.phone {
            profile.phone = Some(phone);
        }
        if let Some(motto) = self.motto {
            profile.motto = Some(motto);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_fails_validation() {
        assert!(SchoolProfile::default().validate().is_err());
    }

    #[test]
    fn test_profile_validation() {
        let valid = SchoolProfile {
            name: "Green Hill Academy".to_string(),
            address: Some("P.O. Box 12, Nakuru".to_string()),
            ..SchoolProfile::default()
        };
        assert!(valid.validate().is_ok());

        let blank = SchoolProfile {
            name: "   ".to_string(),
            ..SchoolProfile::default()
        };
        assert!(blank.validate().is_err());

        let long_name = SchoolProfile {
            name: "x".repeat(256),
            ..SchoolProfile::default()
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_update_dto_validation() {
        let empty = UpdateProfileDto::default();
        assert!(empty.validate().is_ok());

        let blank_name = UpdateProfileDto {
            name: Some(" ".to_string()),
            ..UpdateProfileDto::default()
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_update_dto_applies_only_present_fields() {
        let mut profile = SchoolProfile {
            name: "Old Name".to_string(),
            motto: Some("Excel".to_string()),
            ..SchoolProfile::default()
        };

        let dto: UpdateProfileDto = serde_json::from_str(
            r#"{"name": " New Name ", "email": "info@newname.sc.ke"}"#,
        )
        .unwrap();
        dto.apply_to(&mut profile);

        assert_eq!(profile.name, "New Name");
        assert_eq!(profile.email.as_ref().map(Email::as_str), Some("info@newname.sc.ke"));
        assert_eq!(profile.motto.as_deref(), Some("Excel"));
    }

    #[test]
    fn test_update_dto_rejects_invalid_email_at_parse_time() {
        let result: Result<UpdateProfileDto, _> = serde_json::from_str(r#"{"email": "bad"}"#);
        assert!(result.is_err());
    }
}
