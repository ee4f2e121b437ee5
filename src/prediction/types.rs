// Inputs of the recovery model: athlete vitals and the training load

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::athlete::validation::{validate_non_negative, validate_range};
use crate::athlete::{AthleteProfile, Gender};
use crate::errors::ReboundError;

/// Physical attributes of the athlete, keyed the way the recovery model expects them
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AthleteVitals {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Height_cm")]
    pub height_cm: f64,
    #[serde(rename = "Weight_kg")]
    pub weight_kg: f64,
    /// Sent lower-cased ("male" / "female")
    #[serde(rename = "Gender", with = "lowercase_gender")]
    pub gender: Gender,
}

impl From<&AthleteProfile> for AthleteVitals {
    fn from(profile: &AthleteProfile) -> Self {
        Self {
            age: profile.age,
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            gender: profile.gender,
        }
    }
}

mod lowercase_gender {
    use super::*;

    pub fn serialize<S: Serializer>(gender: &Gender, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(gender.as_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Gender, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Training load for the week being predicted.
///
/// The first five fields are what every model version takes. The optional
/// ones belong to the extended model and are left out of the request body
/// entirely when not set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainingMetrics {
    /// Perceived intensity, 1 (easy) to 10 (maximal)
    #[serde(rename = "Training_Intensity")]
    pub training_intensity: u32,
    #[serde(rename = "Training_Hours_Per_Week")]
    pub training_hours_per_week: f64,
    #[serde(rename = "Match_Count_Per_Week")]
    pub match_count_per_week: u32,
    /// 1 (fresh) to 10 (exhausted)
    #[serde(rename = "Fatigue_Score")]
    pub fatigue_score: u32,
    /// Anterior cruciate ligament injury risk, 1 to 10
    #[serde(rename = "ACL_Risk_Score")]
    pub acl_risk_score: u32,

    #[serde(
        rename = "Rest_Days_Per_Week",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rest_days_per_week: Option<u32>,
    #[serde(
        rename = "Performance_Score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub performance_score: Option<f64>,
    #[serde(
        rename = "Team_Contribution_Score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub team_contribution_score: Option<f64>,
    #[serde(
        rename = "Load_Balance_Score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub load_balance_score: Option<f64>,
    /// Whether the athlete is currently injured, sent as 0 or 1
    #[serde(
        rename = "Injury_Indicator",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_flag",
        deserialize_with = "deserialize_flag"
    )]
    pub injury_indicator: Option<bool>,
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self {
            training_intensity: 5,
            training_hours_per_week: 10.,
            match_count_per_week: 2,
            fatigue_score: 5,
            acl_risk_score: 3,
            rest_days_per_week: None,
            performance_score: None,
            team_contribution_score: None,
            load_balance_score: None,
            injury_indicator: None,
        }
    }
}

impl TrainingMetrics {
    pub fn validate(&self) -> Result<(), ReboundError> {
        validate_range("Training_Intensity", self.training_intensity, 1..=10)?;
        validate_range(
            "Training_Hours_Per_Week",
            self.training_hours_per_week,
            0.0..=40.0,
        )?;
        validate_range("Match_Count_Per_Week", self.match_count_per_week, 0..=7)?;
        validate_range("Fatigue_Score", self.fatigue_score, 1..=10)?;
        validate_range("ACL_Risk_Score", self.acl_risk_score, 1..=10)?;

        if let Some(rest_days) = self.rest_days_per_week {
            validate_range("Rest_Days_Per_Week", rest_days, 0..=7)?;
        }
        if let Some(score) = self.performance_score {
            validate_non_negative("Performance_Score", score)?;
        }
        if let Some(score) = self.team_contribution_score {
            validate_non_negative("Team_Contribution_Score", score)?;
        }
        if let Some(score) = self.load_balance_score {
            validate_non_negative("Load_Balance_Score", score)?;
        }
        Ok(())
    }
}

fn serialize_flag<S: Serializer>(flag: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
    match flag {
        Some(value) => serializer.serialize_u8(u8::from(*value)),
        None => serializer.serialize_none(),
    }
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<u8>::deserialize(deserializer)?.map(|value| value != 0))
}
