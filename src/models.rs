use serde::{Deserialize, Serialize};

use crate::interests::InterestPicker;
use crate::media::MediaSlots;

/// The record identifying a logged-in user, held by `session::SessionStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub has_profile: bool,
    pub token: String,
}

/// Accumulated, not-yet-submitted profile data. Mutated incrementally as the
/// user advances through the wizard; never partially persisted. Discarded once
/// `api::save_profile` succeeds (the session record is updated instead).
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    // Step 1 — photos & identity
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub gender: String,

    // Step 2 — contact
    pub email: String,
    pub phone: String,

    // Step 3 — about
    pub bio: String,
    pub country: String,
    pub city: String,
    pub job_title: String,
    pub company: String,
    pub education: String,
    pub interests: InterestPicker,

    // Step 4 — preferences & lifestyle
    pub interested_in: String,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub max_distance_km: Option<u32>,
    pub height_cm: Option<u32>,
    pub exercise: String,
    pub drinking: String,
    pub smoking: String,
    pub kids: String,
    pub languages: String,

    // Steps 1 & 5 — media
    pub media: MediaSlots,

    // Step 6 — verification
    pub verification: VerificationFlags,
}

/// Opt-in verification requests collected on the final step. Neither blocks
/// submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerificationFlags {
    pub email_requested: bool,
    pub photo_requested: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_roundtrips_through_json() {
        let session = Session {
            id: "abc123".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            has_profile: true,
            token: "demo-deadbeef".to_string(),
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn session_has_profile_defaults_to_false() {
        let json = r#"{"id":"1","email":"a@b.com","name":"A","token":"t"}"#;
        let s: Session = serde_json::from_str(json).unwrap();
        assert!(!s.has_profile);
    }

    #[test]
    fn draft_starts_empty() {
        let draft = ProfileDraft::default();
        assert!(draft.display_name.is_empty());
        assert!(draft.age_min.is_none());
        assert_eq!(draft.interests.count(), 0);
        assert_eq!(draft.media.photo_count(), 0);
        assert!(!draft.verification.email_requested);
    }
}
