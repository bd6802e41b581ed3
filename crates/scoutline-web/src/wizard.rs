//! Multi-step profile registration
//!
//! [`RegistrationStep`] lists the stages in order; each owns a subset of the
//! [`RegistrationForm`] fields and reports at most one message per field.
//! [`Wizard`] is a reversible cursor over the stages that refuses to move
//! forward while the current stage has errors.

use chrono::NaiveDate;
use scoutline_core::{
    NewProfile, ProfileKind, validate_birth_date, validate_country_code, validate_first_name,
    validate_key_segment, validate_last_name,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// Field name to first error message
pub type FieldErrors = BTreeMap<String, String>;

/// Snapshot of the registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RegistrationForm {
    /// Player or coach
    #[validate(required(message = "Choose player or coach"))]
    pub kind: Option<ProfileKind>,

    /// Given name
    #[validate(
        required(message = "First name is required"),
        custom(function = "validate_first_name")
    )]
    pub first_name: Option<String>,

    /// Family name
    #[validate(
        required(message = "Last name is required"),
        custom(function = "validate_last_name")
    )]
    pub last_name: Option<String>,

    /// Contact email
    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required"),
        email(message = "Enter a valid email address")
    )]
    pub email: Option<String>,

    /// Contact phone
    #[validate(length(min = 6, max = 20, message = "Enter a valid phone number"))]
    pub phone: Option<String>,

    /// Date of birth
    #[validate(
        required(message = "Date of birth is required"),
        custom(function = "validate_birth_date")
    )]
    pub date_of_birth: Option<NaiveDate>,

    /// Sport key
    #[validate(
        required(message = "Select a sport"),
        custom(function = "validate_key_segment")
    )]
    pub sport: Option<String>,

    /// Position or coaching role key
    #[validate(
        required(message = "Select a position"),
        custom(function = "validate_key_segment")
    )]
    pub position: Option<String>,

    /// Nationality code
    #[validate(
        required(message = "Select a nationality"),
        custom(function = "validate_country_code")
    )]
    pub nationality: Option<String>,

    /// Height in centimetres
    #[validate(range(min = 100, max = 250, message = "Height must be between 100 and 250 cm"))]
    pub height_cm: Option<u16>,

    /// Weight in kilograms
    #[validate(range(min = 30, max = 200, message = "Weight must be between 30 and 200 kg"))]
    pub weight_kg: Option<u16>,

    /// Free-text presentation
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,

    /// Names of the files selected for upload
    #[validate(length(min = 1, message = "Add at least one photo or video"))]
    pub media: Vec<String>,

    /// Terms of service acknowledgement
    #[validate(custom(function = "validate_accepted"))]
    pub accept_terms: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn validate_accepted(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("terms").with_message("You must accept the terms".into()))
    }
}

impl RegistrationForm {
    /// First error message per field, across every field
    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        let Err(errors) = self.validate() else {
            return FieldErrors::new();
        };

        errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, list)| {
                list.first().map(|error| {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string);
                    (field.to_string(), message)
                })
            })
            .collect()
    }

    /// Build the creation payload from a fully valid form
    ///
    /// # Errors
    ///
    /// Returns every step's errors if any field is invalid.
    pub fn to_new_profile(&self) -> Result<NewProfile, FieldErrors> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let required = |value: &Option<String>| value.clone().unwrap_or_default();
        Ok(NewProfile {
            kind: self.kind.unwrap_or_default(),
            first_name: required(&self.first_name).trim().to_string(),
            last_name: required(&self.last_name).trim().to_string(),
            email: required(&self.email).trim().to_string(),
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth,
            sport: required(&self.sport),
            position: required(&self.position),
            nationality: required(&self.nationality).to_ascii_lowercase(),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            bio: self.bio.clone(),
        })
    }
}

/// Stages of the registration wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStep {
    /// Name, contact and birth date
    Personal,
    /// Kind, sport, position and nationality
    Sport,
    /// Height and weight
    Physical,
    /// Photos, videos and bio
    Media,
    /// Terms and final check
    Review,
}

impl RegistrationStep {
    /// Every step, in wizard order
    pub const ALL: [Self; 5] = [
        Self::Personal,
        Self::Sport,
        Self::Physical,
        Self::Media,
        Self::Review,
    ];

    /// Position in [`Self::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Step at `index`
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Translation key of the step title
    #[must_use]
    pub const fn title_key(self) -> &'static str {
        match self {
            Self::Personal => "wizard.steps.personal",
            Self::Sport => "wizard.steps.sport",
            Self::Physical => "wizard.steps.physical",
            Self::Media => "wizard.steps.media",
            Self::Review => "wizard.steps.review",
        }
    }

    /// Form fields this step validates
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Personal => &["first_name", "last_name", "email", "phone", "date_of_birth"],
            Self::Sport => &["kind", "sport", "position", "nationality"],
            Self::Physical => &["height_cm", "weight_kg"],
            Self::Media => &["media", "bio"],
            Self::Review => &["accept_terms"],
        }
    }

    /// Errors for the fields this step owns; empty means the step is valid
    #[must_use]
    pub fn validate(self, form: &RegistrationForm) -> FieldErrors {
        let owned = self.fields();
        form.field_errors()
            .into_iter()
            .filter(|(field, _)| owned.contains(&field.as_str()))
            .collect()
    }
}

/// `round(100 * (index + 1) / total)`, 0 when there are no steps
#[must_use]
pub fn progress_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = (index + 1).min(total);
    let pct = (200 * done + total) / (2 * total);
    u8::try_from(pct).unwrap_or(100)
}

/// Cursor over [`RegistrationStep::ALL`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wizard {
    index: usize,
    completed: [bool; RegistrationStep::ALL.len()],
}

impl Wizard {
    /// Wizard at the first step
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Step being shown
    #[must_use]
    pub fn current(&self) -> RegistrationStep {
        RegistrationStep::from_index(self.index).unwrap_or(RegistrationStep::Personal)
    }

    /// Index of the step being shown
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Validate the current step and advance
    ///
    /// On the last step a valid form marks it complete and stays there.
    ///
    /// # Errors
    ///
    /// Returns the current step's errors and does not move.
    pub fn next(&mut self, form: &RegistrationForm) -> Result<RegistrationStep, FieldErrors> {
        let errors = self.current().validate(form);
        if !errors.is_empty() {
            return Err(errors);
        }

        if let Some(done) = self.completed.get_mut(self.index) {
            *done = true;
        }
        if !self.is_last() {
            self.index += 1;
        }
        Ok(self.current())
    }

    /// Go back one step; stays on the first step
    pub fn back(&mut self) -> RegistrationStep {
        self.index = self.index.saturating_sub(1);
        self.current()
    }

    /// Whether `step` has been passed and its fields are still valid in `form`
    #[must_use]
    pub fn is_complete(&self, step: RegistrationStep, form: &RegistrationForm) -> bool {
        self.completed.get(step.index()).copied().unwrap_or(false) && step.validate(form).is_empty()
    }

    /// Whether every step is complete for `form`
    #[must_use]
    pub fn is_finished(&self, form: &RegistrationForm) -> bool {
        RegistrationStep::ALL
            .iter()
            .all(|step| self.is_complete(*step, form))
    }

    /// Whether the current step is the last one
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.index + 1 == RegistrationStep::ALL.len()
    }

    /// Progress indicator for the current step
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.index, RegistrationStep::ALL.len())
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn complete_form() -> RegistrationForm {
        RegistrationForm {
            kind: Some(ProfileKind::Player),
            first_name: Some("Lucas".to_string()),
            last_name: Some("Moura".to_string()),
            email: Some("lucas@example.com".to_string()),
            phone: None,
            date_of_birth: NaiveDate::from_ymd_opt(2004, 5, 17),
            sport: Some("football".to_string()),
            position: Some("leftWing".to_string()),
            nationality: Some("BR".to_string()),
            height_cm: Some(176),
            weight_kg: Some(70),
            bio: None,
            media: vec!["highlights.mp4".to_string()],
            accept_terms: true,
        }
    }

    #[test]
    fn test_step_indices_are_contiguous() {
        for (i, step) in RegistrationStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(RegistrationStep::from_index(i), Some(*step));
        }
        assert_eq!(RegistrationStep::from_index(RegistrationStep::ALL.len()), None);
    }

    #[test]
    fn test_every_field_has_one_owner() {
        let mut owned: Vec<&str> = RegistrationStep::ALL
            .iter()
            .flat_map(|step| step.fields().iter().copied())
            .collect();
        let total = owned.len();
        owned.sort_unstable();
        owned.dedup();
        assert_eq!(owned.len(), total);
    }

    #[test]
    fn test_only_first_error_per_field() {
        let form = RegistrationForm {
            email: Some(String::new()),
            ..complete_form()
        };
        let raw = form.validate().unwrap_err();
        assert_eq!(raw.field_errors()["email"].len(), 2);

        let errors = RegistrationStep::Personal.validate(&form);
        assert_eq!(errors.len(), 1);
        assert!(["Email is required", "Enter a valid email address"].contains(&errors["email"].as_str()));
    }

    #[test]
    fn test_blank_name_reported() {
        let form = RegistrationForm {
            first_name: Some(String::new()),
            ..complete_form()
        };
        let errors = RegistrationStep::Personal.validate(&form);
        assert_eq!(errors["first_name"], "First name is required");
    }

    #[rstest]
    #[case(" ", "First name is required")]
    #[case("\t\n", "First name is required")]
    #[case(&"x".repeat(101), "First name must be at most 100 characters")]
    fn test_first_name_messages(#[case] name: &str, #[case] expected: &str) {
        let form = RegistrationForm {
            first_name: Some(name.to_string()),
            ..complete_form()
        };
        let errors = RegistrationStep::Personal.validate(&form);
        assert_eq!(errors["first_name"], expected);
    }

    #[test]
    fn test_long_last_name_message() {
        let form = RegistrationForm {
            last_name: Some("y".repeat(101)),
            ..complete_form()
        };
        let errors = RegistrationStep::Personal.validate(&form);
        assert_eq!(errors["last_name"], "Last name must be at most 100 characters");
    }

    #[test]
    fn test_rejects_blank_names_and_malformed_keys() {
        let form = RegistrationForm {
            first_name: Some("   ".to_string()),
            sport: Some("Foot ball".to_string()),
            position: Some("left.wing".to_string()),
            nationality: Some("1a".to_string()),
            ..complete_form()
        };

        let errors = form.field_errors();
        for field in ["first_name", "sport", "position", "nationality"] {
            assert!(errors.contains_key(field), "{field} accepted");
        }
        assert_eq!(errors["sport"], "Select a value from the list");
        assert_eq!(errors["nationality"], "Select a nationality");
        assert_eq!(RegistrationStep::Sport.validate(&form).len(), 3);
        assert!(form.to_new_profile().is_err());
    }

    #[test]
    fn test_step_ignores_fields_it_does_not_own() {
        let form = RegistrationForm {
            media: Vec::new(),
            accept_terms: false,
            ..complete_form()
        };
        assert!(RegistrationStep::Personal.validate(&form).is_empty());
        assert!(RegistrationStep::Media.validate(&form).contains_key("media"));
    }

    #[test]
    fn test_next_blocked_by_errors() {
        let mut wizard = Wizard::new();
        let form = RegistrationForm {
            email: Some("nope".to_string()),
            ..complete_form()
        };

        let errors = wizard.next(&form).unwrap_err();
        assert_eq!(errors["email"], "Enter a valid email address");
        assert_eq!(wizard.current(), RegistrationStep::Personal);
        assert!(!wizard.is_complete(RegistrationStep::Personal, &form));
    }

    #[test]
    fn test_walk_forward_and_back() {
        let form = complete_form();
        let mut wizard = Wizard::new();
        assert_eq!(wizard.back(), RegistrationStep::Personal);

        assert_eq!(wizard.next(&form).unwrap(), RegistrationStep::Sport);
        assert!(wizard.is_complete(RegistrationStep::Personal, &form));
        assert_eq!(wizard.back(), RegistrationStep::Personal);
        assert!(wizard.is_complete(RegistrationStep::Personal, &form));

        for _ in 0..RegistrationStep::ALL.len() {
            wizard.next(&form).unwrap();
        }
        assert!(wizard.is_last());
        assert!(wizard.is_finished(&form));
        assert_eq!(wizard.progress_percent(), 100);
    }

    #[test]
    fn test_edit_after_back_reopens_step() {
        let mut form = complete_form();
        let mut wizard = Wizard::new();
        for _ in 0..RegistrationStep::ALL.len() {
            wizard.next(&form).unwrap();
        }
        assert!(wizard.is_finished(&form));

        while wizard.current() != RegistrationStep::Personal {
            wizard.back();
        }
        form.email = Some("not-an-email".to_string());

        assert!(!wizard.is_complete(RegistrationStep::Personal, &form));
        assert!(wizard.is_complete(RegistrationStep::Sport, &form));
        assert!(!wizard.is_finished(&form));
        assert!(form.to_new_profile().is_err());
    }

    #[test]
    fn test_progress_percent_values() {
        assert_eq!(progress_percent(0, 5), 20);
        assert_eq!(progress_percent(4, 5), 100);
        assert_eq!(progress_percent(0, 3), 33);
        assert_eq!(progress_percent(1, 3), 67);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn test_to_new_profile() {
        let profile = complete_form().to_new_profile().unwrap();
        assert_eq!(profile.nationality, "br");
        assert_eq!(profile.kind, ProfileKind::Player);
        assert!(profile.validate().is_ok());

        let padded = RegistrationForm {
            first_name: Some("  Lucas ".to_string()),
            ..complete_form()
        };
        let profile = padded.to_new_profile().unwrap();
        assert_eq!(profile.first_name, "Lucas");
        assert!(profile.validate().is_ok());

        let errors = RegistrationForm::default().to_new_profile().unwrap_err();
        assert!(errors.contains_key("first_name"));
        assert!(errors.contains_key("accept_terms"));
    }

    proptest! {
        #[test]
        fn prop_progress_matches_rounding(total in 1usize..50, offset in 0usize..50) {
            let index = offset % total;
            let expected = (100.0 * (index + 1) as f64 / total as f64).round() as u8;
            prop_assert_eq!(progress_percent(index, total), expected);
            prop_assert_eq!(progress_percent(total - 1, total), 100);
        }
    }
}
