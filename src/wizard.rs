//! The profile wizard controller: step sequence, per-step validation, and
//! transition rules. Owns the draft; knows nothing about rendering.

use crate::media::MIN_PROFILE_PHOTOS;
use crate::models::ProfileDraft;
use crate::validate;

pub const STEP_COUNT: usize = 6;

/// The six wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Identity,
    Contact,
    About,
    Preferences,
    Media,
    Verify,
}

impl Step {
    pub const ALL: [Step; STEP_COUNT] = [
        Step::Identity,
        Step::Contact,
        Step::About,
        Step::Preferences,
        Step::Media,
        Step::Verify,
    ];

    /// 1-based position, as shown in the progress indicator.
    pub fn index(self) -> usize {
        match self {
            Step::Identity => 1,
            Step::Contact => 2,
            Step::About => 3,
            Step::Preferences => 4,
            Step::Media => 5,
            Step::Verify => 6,
        }
    }

    pub fn from_index(n: usize) -> Option<Step> {
        Step::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn next(self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Step> {
        Step::from_index(self.index().checked_sub(1)?)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Identity => "Photos & Identity",
            Step::Contact => "Contact",
            Step::About => "About You",
            Step::Preferences => "Preferences",
            Step::Media => "Gallery & Video",
            Step::Verify => "Review & Verify",
        }
    }
}

/// How a step renders in the indicator row, derived from the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone)]
pub struct WizardState {
    current: Step,
    completed: [bool; STEP_COUNT],
    pub draft: ProfileDraft,
}

impl WizardState {
    pub fn new(draft: ProfileDraft) -> Self {
        Self {
            current: Step::Identity,
            completed: [false; STEP_COUNT],
            draft,
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    /// Jump to a step. Exactly one step is current at any time; the draft is
    /// untouched.
    pub fn go_to(&mut self, step: Step) {
        self.current = step;
    }

    /// Indicator state relative to the current position: earlier steps show
    /// completed, the current one active, later ones pending.
    pub fn status_of(&self, step: Step) -> StepStatus {
        if step.index() < self.current.index() {
            StepStatus::Completed
        } else if step == self.current {
            StepStatus::Active
        } else {
            StepStatus::Pending
        }
    }

    /// Progress toward submission: `n/6` for step n.
    pub fn progress(&self) -> f64 {
        self.current.index() as f64 / STEP_COUNT as f64
    }

    /// Whether a step's validation has ever passed. Monotonic: backward
    /// navigation never revokes it.
    pub fn is_completed(&self, step: Step) -> bool {
        self.completed[step.index() - 1]
    }

    pub fn validate(&self, step: Step) -> Result<(), String> {
        match step {
            Step::Identity => self.validate_identity(),
            Step::Contact => self.validate_contact(),
            Step::About => self.validate_about(),
            Step::Preferences => self.validate_preferences(),
            Step::Media | Step::Verify => Ok(()),
        }
    }

    pub fn can_advance(&self) -> bool {
        self.validate(self.current).is_ok()
    }

    /// Forward transition: only legal when the current step's validator
    /// passes. Marks the step completed and moves on; at the final step the
    /// position is unchanged (submission is the caller's concern).
    pub fn advance(&mut self) -> Result<(), String> {
        self.validate(self.current)?;
        self.completed[self.current.index() - 1] = true;
        if let Some(next) = self.current.next() {
            self.current = next;
        }
        Ok(())
    }

    /// Backward navigation is always legal and revokes nothing.
    pub fn retreat(&mut self) {
        if let Some(prev) = self.current.prev() {
            self.current = prev;
        }
    }

    fn validate_identity(&self) -> Result<(), String> {
        let draft = &self.draft;
        if !draft.media.has_primary() {
            return Err("Add a primary photo (first slot) to continue".to_string());
        }
        if draft.media.photo_count() < MIN_PROFILE_PHOTOS {
            return Err(format!("Add at least {MIN_PROFILE_PHOTOS} profile photos"));
        }
        let identity = [
            &draft.display_name,
            &draft.first_name,
            &draft.last_name,
            &draft.date_of_birth,
            &draft.gender,
        ];
        if identity.iter().any(|f| f.trim().is_empty()) {
            return Err("Please fill in all required fields".to_string());
        }
        let dob = validate::parse_birth_date(&draft.date_of_birth)
            .ok_or_else(|| "Enter your date of birth as YYYY-MM-DD".to_string())?;
        if validate::age_today(dob) < validate::MIN_AGE {
            return Err("You must be at least 18 years old".to_string());
        }
        Ok(())
    }

    fn validate_contact(&self) -> Result<(), String> {
        if self.draft.email.trim().is_empty() {
            return Err("Please enter your email address".to_string());
        }
        if !validate::is_valid_email(self.draft.email.trim()) {
            return Err("Please enter a valid email address".to_string());
        }
        Ok(())
    }

    fn validate_about(&self) -> Result<(), String> {
        let draft = &self.draft;
        if draft.bio.trim().chars().count() < 20 {
            return Err("Please write a bio with at least 20 characters".to_string());
        }
        if let Some(label) = draft.interests.remaining_label() {
            return Err(label);
        }
        if draft.country.trim().is_empty() || draft.city.trim().is_empty() {
            return Err("Please enter your country and city".to_string());
        }
        Ok(())
    }

    fn validate_preferences(&self) -> Result<(), String> {
        let (min, max) = match (self.draft.age_min, self.draft.age_max) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err("Please choose an age range".to_string()),
        };
        if min > max {
            return Err("Minimum age cannot be greater than maximum age".to_string());
        }
        Ok(())
    }
}
