// Athlete profile types, field validation and the sign-up wizard

pub mod types;
pub mod validation;
pub mod wizard;

pub use types::{AthleteProfile, Gender, Position, ProfilePatch, RegistrationForm};
pub use wizard::{RegistrationWizard, StepFields, WizardStep};
