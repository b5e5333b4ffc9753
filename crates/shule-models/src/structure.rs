//! School structure vocabulary.
//!
//! Every enum here has a fixed wire name (what the backend stores and what the
//! rendering layer sends) and parses case-insensitively from that name or one
//! of its aliases.
//!
//! # Example
//!
//! ```ignore
//! use shule_models::structure::{Band, CurriculumSystem, LevelFlag};
//!
//! assert_eq!(LevelFlag::Secondary844.band(), Band::Secondary);
//! assert!(CurriculumSystem::Both.includes(shule_models::Curriculum::Cbc));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when text does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
}

impl ParseVariantError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// The vocabulary the text was parsed against, e.g. "school type".
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl std::error::Error for ParseVariantError {}

impl fmt::Display for ParseVariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

/// Defines a closed vocabulary enum with its wire names.
///
/// Generates `ALL`, `as_str`, `Display`, and a case-insensitive `FromStr`
/// that also accepts the listed aliases.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire name of this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseVariantError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                $(
                    if needle.eq_ignore_ascii_case($wire)
                        $(|| needle.eq_ignore_ascii_case($alias))*
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseVariantError::new($kind, s))
            }
        }
    };
}

wire_enum! {
    /// The kind of school being registered.
    SchoolType ("school type") {
        Primary => "primary",
        Secondary => "secondary",
        Mixed => "mixed",
    }
}

wire_enum! {
    /// A curriculum choice for one side of the school.
    CurriculumSystem ("curriculum system") {
        Cbc => "CBC",
        EightFourFour => "8-4-4" | "844",
        Both => "Both",
    }
}

wire_enum! {
    /// The curriculum a single catalog entry belongs to.
    Curriculum ("curriculum") {
        Cbc => "CBC",
        EightFourFour => "8-4-4" | "844",
    }
}

wire_enum! {
    /// An educational stage within a curriculum.
    Band ("band") {
        PrePrimary => "pre_primary",
        Primary => "primary",
        JuniorSecondary => "junior_secondary",
        SeniorSecondary => "senior_secondary",
        Secondary => "secondary",
    }
}

wire_enum! {
    /// A named level flag. The wire name is the record field it maps to.
    LevelFlag ("level flag") {
        PrePrimary => "has_pre_primary",
        Primary => "has_primary",
        JuniorSecondary => "has_junior_secondary",
        SeniorSecondary => "has_senior_secondary",
        Secondary844 => "has_secondary",
    }
}

wire_enum! {
    /// Senior secondary specialization pathway.
    Pathway ("pathway") {
        Stem => "STEM",
        Arts => "Arts",
        SocialSciences => "Social Sciences" | "social_sciences",
    }
}

wire_enum! {
    /// Lifecycle of a school configuration. `Committed` is terminal.
    LifecycleState ("lifecycle state") {
        Draft => "draft",
        Committed => "committed",
    }
}

/// Which half of the school a band belongs to.
///
/// The primary side follows `primary_curriculum`; the secondary side follows
/// `secondary_curriculum` where the school type has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Primary,
    Secondary,
}

impl CurriculumSystem {
    /// The catalog curricula this choice activates.
    pub const fn curricula(self) -> &'static [Curriculum] {
        match self {
            CurriculumSystem::Cbc => &[Curriculum::Cbc],
            CurriculumSystem::EightFourFour => &[Curriculum::EightFourFour],
            CurriculumSystem::Both => &[Curriculum::Cbc, Curriculum::EightFourFour],
        }
    }

    pub fn includes(self, curriculum: Curriculum) -> bool {
        self.curricula().contains(&curriculum)
    }
}

impl From<Curriculum> for CurriculumSystem {
    fn from(curriculum: Curriculum) -> Self {
        match curriculum {
            Curriculum::Cbc => CurriculumSystem::Cbc,
            Curriculum::EightFourFour => CurriculumSystem::EightFourFour,
        }
    }
}

impl Band {
    /// Curricula that define codes for this band.
    pub const fn curricula(self) -> &'static [Curriculum] {
        match self {
            Band::Primary => &[Curriculum::Cbc, Curriculum::EightFourFour],
            Band::Secondary => &[Curriculum::EightFourFour],
            Band::PrePrimary | Band::JuniorSecondary | Band::SeniorSecondary => &[Curriculum::Cbc],
        }
    }

    /// The level flag that switches this band on or off.
    pub const fn flag(self) -> LevelFlag {
        match self {
            Band::PrePrimary => LevelFlag::PrePrimary,
            Band::Primary => LevelFlag::Primary,
            Band::JuniorSecondary => LevelFlag::JuniorSecondary,
            Band::SeniorSecondary => LevelFlag::SeniorSecondary,
            Band::Secondary => LevelFlag::Secondary844,
        }
    }
}

impl LevelFlag {
    pub const fn band(self) -> Band {
        match self {
            LevelFlag::PrePrimary => Band::PrePrimary,
            LevelFlag::Primary => Band::Primary,
            LevelFlag::JuniorSecondary => Band::JuniorSecondary,
            LevelFlag::SeniorSecondary => Band::SeniorSecondary,
            LevelFlag::Secondary844 => Band::Secondary,
        }
    }

    pub const fn side(self) -> Side {
        match self {
            LevelFlag::PrePrimary | LevelFlag::Primary | LevelFlag::JuniorSecondary => Side::Primary,
            LevelFlag::SeniorSecondary | LevelFlag::Secondary844 => Side::Secondary,
        }
    }
}

/// Which educational bands the school offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelFlags {
    pub has_pre_primary: bool,
    pub has_primary: bool,
    pub has_junior_secondary: bool,
    pub has_senior_secondary: bool,
    /// The 8-4-4 secondary flag.
    #[serde(rename = "has_secondary")]
    pub has_secondary_844: bool,
}

impl LevelFlags {
    pub fn get(&self, flag: LevelFlag) -> bool {
        match flag {
            LevelFlag::PrePrimary => self.has_pre_primary,
            LevelFlag::Primary => self.has_primary,
            LevelFlag::JuniorSecondary => self.has_junior_secondary,
            LevelFlag::SeniorSecondary => self.has_senior_secondary,
            LevelFlag::Secondary844 => self.has_secondary_844,
        }
    }

    pub fn set(&mut self, flag: LevelFlag, enabled: bool) {
        let slot = match flag {
            LevelFlag::PrePrimary => &mut self.has_pre_primary,
            LevelFlag::Primary => &mut self.has_primary,
            LevelFlag::JuniorSecondary => &mut self.has_junior_secondary,
            LevelFlag::SeniorSecondary => &mut self.has_senior_secondary,
            LevelFlag::Secondary844 => &mut self.has_secondary_844,
        };
        *slot = enabled;
    }

    /// True if any band is offered.
    pub fn any(&self) -> bool {
        LevelFlag::ALL.iter().any(|flag| self.get(*flag))
    }

    /// The flags currently set, in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = LevelFlag> + '_ {
        LevelFlag::ALL.iter().copied().filter(|flag| self.get(*flag))
    }
}
