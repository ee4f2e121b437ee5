// Multi-step registration wizard: collects the sign-up form one step at a time

use std::fmt;

use log::debug;

use crate::errors::ReboundError;

use super::types::{Gender, Position, RegistrationForm};
use super::validation::{
    validate_age, validate_email, validate_full_name, validate_height_cm, validate_password,
    validate_weight_kg,
};

/// Steps of the sign-up flow, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStep {
    /// Name, email and password
    Account,
    /// Age, gender, height and weight
    Physical,
    /// Playing position
    Position,
    /// Review of everything entered before submitting, nothing to fill in
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Account,
        WizardStep::Physical,
        WizardStep::Position,
        WizardStep::Summary,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Account => "Account",
            WizardStep::Physical => "Physical Details",
            WizardStep::Position => "Position",
            WizardStep::Summary => "Summary & Confirmation",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Account => 0,
            WizardStep::Physical => 1,
            WizardStep::Position => 2,
            WizardStep::Summary => 3,
        }
    }

    fn next(&self) -> Option<WizardStep> {
        WizardStep::ALL.get(self.index() + 1).copied()
    }

    fn prev(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| WizardStep::ALL[i])
    }
}

/// The values entered on a single step.
#[derive(Clone, Debug, PartialEq)]
pub enum StepFields {
    Account {
        full_name: String,
        email: String,
        password: String,
    },
    Physical {
        age: u32,
        gender: Gender,
        height_cm: f64,
        weight_kg: f64,
    },
    Position {
        position: Position,
    },
}

impl StepFields {
    fn step(&self) -> WizardStep {
        match self {
            StepFields::Account { .. } => WizardStep::Account,
            StepFields::Physical { .. } => WizardStep::Physical,
            StepFields::Position { .. } => WizardStep::Position,
        }
    }

    fn validate(&self) -> Result<(), ReboundError> {
        match self {
            StepFields::Account {
                full_name,
                email,
                password,
            } => {
                validate_full_name(full_name)?;
                validate_email(email)?;
                validate_password(password)
            }
            StepFields::Physical {
                age,
                height_cm,
                weight_kg,
                ..
            } => {
                validate_age(*age)?;
                validate_height_cm(*height_cm)?;
                validate_weight_kg(*weight_kg)
            }
            StepFields::Position { .. } => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
struct Draft {
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    age: Option<u32>,
    gender: Option<Gender>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    position: Option<Position>,
}

impl fmt::Debug for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draft")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("age", &self.age)
            .field("gender", &self.gender)
            .field("height_cm", &self.height_cm)
            .field("weight_kg", &self.weight_kg)
            .field("position", &self.position)
            .finish()
    }
}

impl Draft {
    /// Entered values as label and display text, in step order. The password is masked.
    fn summary(&self) -> Vec<(&'static str, String)> {
        let rows = [
            ("Full Name", self.full_name.clone()),
            ("Email", self.email.clone()),
            ("Password", self.password.as_ref().map(|_| "********".to_string())),
            ("Age", self.age.map(|age| age.to_string())),
            ("Gender", self.gender.map(|gender| gender.to_string())),
            ("Height", self.height_cm.map(|height| format!("{} cm", height))),
            ("Weight", self.weight_kg.map(|weight| format!("{} kg", weight))),
            ("Position", self.position.map(|position| position.to_string())),
        ];
        rows.into_iter()
            .filter_map(|(label, value)| value.map(|value| (label, value)))
            .collect()
    }

    fn merge(&mut self, fields: StepFields) {
        match fields {
            StepFields::Account {
                full_name,
                email,
                password,
            } => {
                self.full_name = Some(full_name.trim().to_string());
                self.email = Some(email.trim().to_string());
                self.password = Some(password);
            }
            StepFields::Physical {
                age,
                gender,
                height_cm,
                weight_kg,
            } => {
                self.age = Some(age);
                self.gender = Some(gender);
                self.height_cm = Some(height_cm);
                self.weight_kg = Some(weight_kg);
            }
            StepFields::Position { position } => self.position = Some(position),
        }
    }

    fn build(&self) -> Result<RegistrationForm, ReboundError> {
        fn required<T: Clone>(value: &Option<T>, field: &str) -> Result<T, ReboundError> {
            value.clone().ok_or_else(|| ReboundError::InvalidUserInput {
                field: field.to_string(),
                reason: "is required".to_string(),
            })
        }

        let form = RegistrationForm {
            full_name: required(&self.full_name, "fullName")?,
            email: required(&self.email, "email")?,
            password: required(&self.password, "password")?,
            age: required(&self.age, "age")?,
            gender: required(&self.gender, "gender")?,
            height_cm: required(&self.height_cm, "heightCm")?,
            weight_kg: required(&self.weight_kg, "weightKg")?,
            position: required(&self.position, "position")?,
        };
        form.validate()?;
        Ok(form)
    }
}

/// Aggregates the registration fields step by step.
///
/// Only the current step is validated when moving forward; a step that fails
/// validation leaves both the current step and the collected values untouched.
/// Going back keeps what was already entered. The last step only shows the
/// summary, `finish` submits it.
#[derive(Clone, Debug)]
pub struct RegistrationWizard {
    current: WizardStep,
    draft: Draft,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            current: WizardStep::Account,
            draft: Draft::default(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn is_last_step(&self) -> bool {
        self.current.next().is_none()
    }

    fn accept(&mut self, fields: StepFields) -> Result<(), ReboundError> {
        if fields.step() != self.current {
            return Err(ReboundError::InvalidUserInput {
                field: "step".to_string(),
                reason: format!(
                    "expected {} fields, got {} fields",
                    self.current.title(),
                    fields.step().title()
                ),
            });
        }
        fields.validate()?;
        self.draft.merge(fields);
        Ok(())
    }

    /// Validate and store the current step, then move to the following one.
    pub fn next(&mut self, fields: StepFields) -> Result<WizardStep, ReboundError> {
        let Some(following) = self.current.next() else {
            return Err(ReboundError::InvalidUserInput {
                field: "step".to_string(),
                reason: "already on the last step, finish the registration instead".to_string(),
            });
        };
        self.accept(fields)?;
        debug!(
            "Registration step '{}' complete, moving to '{}'",
            self.current.title(),
            following.title()
        );
        self.current = following;
        Ok(following)
    }

    /// Step back without discarding anything entered so far.
    pub fn prev(&mut self) -> WizardStep {
        if let Some(previous) = self.current.prev() {
            self.current = previous;
        }
        self.current
    }

    /// What has been entered so far, for the confirmation step
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        self.draft.summary()
    }

    /// Confirm the summary and assemble the complete registration form.
    pub fn finish(&self) -> Result<RegistrationForm, ReboundError> {
        if !self.is_last_step() {
            return Err(ReboundError::InvalidUserInput {
                field: "step".to_string(),
                reason: format!("cannot finish from the {} step", self.current.title()),
            });
        }
        self.draft.build()
    }
}
