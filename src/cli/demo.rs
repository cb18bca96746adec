//! Seed a sample session and draft so the wizard can be explored end to end
//! without typing everything in.

use crate::cli::wizard;
use crate::error::Result;
use crate::media::{MediaFile, MediaKind, SlotId};
use crate::models::{ProfileDraft, Session};
use crate::session::SessionStore;
use crate::wizard::WizardState;

const DEMO_INTERESTS: &[&str] = &["Travel", "Music", "Hiking", "Coffee", "Photography", "Cooking"];

/// (path, size in bytes) of the pretend uploads.
const DEMO_PHOTOS: &[(&str, u64)] = &[
    ("demo/profile-1.jpg", 1_200_000),
    ("demo/profile-2.jpg", 870_000),
    ("demo/profile-3.jpg", 2_400_000),
];

fn demo_session() -> Session {
    Session {
        id: "demo0001".to_string(),
        email: "demo@matchly.com".to_string(),
        name: "Demo User".to_string(),
        has_profile: false,
        token: "demo-sample".to_string(),
    }
}

fn demo_draft() -> ProfileDraft {
    let mut draft = ProfileDraft {
        display_name: "Sam".to_string(),
        first_name: "Sam".to_string(),
        last_name: "Rivera".to_string(),
        date_of_birth: "1992-04-08".to_string(),
        gender: "Non-binary".to_string(),
        email: "demo@matchly.com".to_string(),
        phone: "555-0134".to_string(),
        bio: "Weekend hiker, weekday barista-in-training. Looking for someone \
              to split playlists and trail snacks with."
            .to_string(),
        country: "USA".to_string(),
        city: "Portland".to_string(),
        job_title: "Product Designer".to_string(),
        company: "Northwind".to_string(),
        education: "BFA, Design".to_string(),
        interested_in: "Everyone".to_string(),
        age_min: Some(25),
        age_max: Some(38),
        max_distance_km: Some(50),
        height_cm: Some(172),
        exercise: "Often".to_string(),
        drinking: "Socially".to_string(),
        smoking: "Never".to_string(),
        kids: "Want kids someday".to_string(),
        languages: "English, Spanish".to_string(),
        ..ProfileDraft::default()
    };
    for (i, (path, size)) in DEMO_PHOTOS.iter().enumerate() {
        let file = MediaFile::from_parts(path, MediaKind::Image, *size);
        // Sample data is sized within the ceilings.
        draft
            .media
            .attach(SlotId::Photo(i), file)
            .expect("demo photo fits its slot");
    }
    for tag in DEMO_INTERESTS {
        draft.interests.toggle(tag);
    }
    draft
}

pub fn run() -> Result<()> {
    let mut store = SessionStore::open();
    let session = demo_session();
    store.save(&session, false)?;

    let state = WizardState::new(demo_draft());
    match wizard::run_with_state(&mut store, session, state)? {
        wizard::Outcome::Completed(session) => {
            println!("Demo profile completed for {}.", session.name);
        }
        wizard::Outcome::Quit => {}
    }
    Ok(())
}
