//! BrickSet attribute domains and bounds.
//!
//! A BrickSet is identified globally by the 6-tuple (number, production
//! status, completeness, has_instructions, has_box, is_factory_sealed); the
//! uniqueness itself is enforced by the `uq_bricksets_global_identity`
//! constraint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highest accepted catalog set number.
pub const MAX_SET_NUMBER: i32 = 9_999_999;

/// Upper bound for the owner's optional initial estimate (PLN).
pub const MAX_INITIAL_ESTIMATE: i32 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStatus {
    Active,
    Retired,
}

impl ProductionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Retired => "RETIRED",
        }
    }
}

impl FromStr for ProductionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "RETIRED" => Ok(Self::Retired),
            other => Err(format!(
                "Invalid production_status '{other}'. Must be one of: ACTIVE, RETIRED"
            )),
        }
    }
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Completeness {
    Complete,
    Incomplete,
}

impl Completeness {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "COMPLETE",
            Self::Incomplete => "INCOMPLETE",
        }
    }
}

impl FromStr for Completeness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLETE" => Ok(Self::Complete),
            "INCOMPLETE" => Ok(Self::Incomplete),
            other => Err(format!(
                "Invalid completeness '{other}'. Must be one of: COMPLETE, INCOMPLETE"
            )),
        }
    }
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a catalog set number (0..=9,999,999).
pub fn validate_set_number(number: i32) -> Result<(), String> {
    if (0..=MAX_SET_NUMBER).contains(&number) {
        Ok(())
    } else {
        Err(format!("number must be between 0 and {MAX_SET_NUMBER}"))
    }
}

/// Validate the optional owner estimate (1..=999,999 when present).
pub fn validate_initial_estimate(estimate: Option<i32>) -> Result<(), String> {
    match estimate {
        Some(value) if !(1..=MAX_INITIAL_ESTIMATE).contains(&value) => Err(format!(
            "owner_initial_estimate must be between 1 and {MAX_INITIAL_ESTIMATE}"
        )),
        _ => Ok(()),
    }
}
