// Core data structures describing an athlete and their registration

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ReboundError;

use super::validation::{
    validate_age, validate_email, validate_full_name, validate_height_cm, validate_password,
    validate_weight_kg,
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Lower-case spelling expected by the recovery model.
    pub fn as_lowercase(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

impl FromStr for Gender {
    type Err = ReboundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ReboundError::InvalidUserInput {
                field: "gender".to_string(),
                reason: format!("'{}' is not one of Male, Female", s),
            }),
        }
    }
}

/// Playing position on a basketball roster
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Center,
    Forward,
    Guard,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Center => write!(f, "Center"),
            Position::Forward => write!(f, "Forward"),
            Position::Guard => write!(f, "Guard"),
        }
    }
}

impl FromStr for Position {
    type Err = ReboundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "center" => Ok(Position::Center),
            "forward" => Ok(Position::Forward),
            "guard" => Ok(Position::Guard),
            _ => Err(ReboundError::InvalidUserInput {
                field: "position".to_string(),
                reason: format!("'{}' is not one of Center, Forward, Guard", s),
            }),
        }
    }
}

/// Profile snapshot of an athlete as returned by the backend
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AthleteProfile {
    pub full_name: String,
    pub email: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub position: Position,
}

impl AthleteProfile {
    /// First letter of each part of the athlete's name, e.g. "JL" for "Jordan Lee"
    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Merge the fields present in `patch` into this profile, keeping the rest.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(full_name) = &patch.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(height_cm) = patch.height_cm {
            self.height_cm = height_cm;
        }
        if let Some(weight_kg) = patch.weight_kg {
            self.weight_kg = weight_kg;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}

/// Partial athlete profile. Sent on profile edits and returned by the backend
/// with whatever fields it changed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self == &ProfilePatch::default()
    }

    /// Validate only the fields being changed
    pub fn validate(&self) -> Result<(), ReboundError> {
        if let Some(full_name) = &self.full_name {
            validate_full_name(full_name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(height_cm) = self.height_cm {
            validate_height_cm(height_cm)?;
        }
        if let Some(weight_kg) = self.weight_kg {
            validate_weight_kg(weight_kg)?;
        }
        Ok(())
    }
}

/// Complete sign-up payload sent to the registration endpoint
#[derive(Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub position: Position,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ReboundError> {
        validate_full_name(&self.full_name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_age(self.age)?;
        validate_height_cm(self.height_cm)?;
        validate_weight_kg(self.weight_kg)
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .field("height_cm", &self.height_cm)
            .field("weight_kg", &self.weight_kg)
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> AthleteProfile {
    AthleteProfile {
        full_name: "Jordan Lee".to_string(),
        email: "jordan@club.com".to_string(),
        age: 24,
        gender: Gender::Male,
        height_cm: 198.0,
        weight_kg: 95.5,
        position: Position::Forward,
    }
}
