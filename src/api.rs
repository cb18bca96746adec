//! Simulated backend. Every call returns a `Delayed` response carrying
//! hard-coded mock data, standing in for a real HTTP/JSON contract.

use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{ProfileDraft, Session};

pub const LOGIN_DELAY: Duration = Duration::from_millis(2000);
pub const SIGNUP_DELAY: Duration = Duration::from_millis(2000);
pub const SOCIAL_DELAY: Duration = Duration::from_millis(2000);
pub const FORGOT_DELAY: Duration = Duration::from_millis(1500);
pub const SAVE_PROFILE_DELAY: Duration = Duration::from_millis(2000);
pub const LOCATION_DELAY: Duration = Duration::from_millis(800);

/// Pause between a success banner and leaving the screen.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// A simulated in-flight call: the response is fixed up front and becomes
/// available once the deadline passes. Polled from the UI tick loop. There is
/// no cancellation — a pending call runs to its deadline.
#[derive(Debug)]
pub struct Delayed<T> {
    ready_at: Instant,
    value: Option<Result<T>>,
}

impl<T> Delayed<T> {
    pub fn new(value: Result<T>, delay: Duration) -> Self {
        Self {
            ready_at: Instant::now() + delay,
            value: Some(value),
        }
    }

    /// A response available on the next poll.
    pub fn ready(value: Result<T>) -> Self {
        Self::new(value, Duration::ZERO)
    }

    /// `Some` once the deadline has passed; takes the value, so later polls
    /// return `None`.
    pub fn poll(&mut self) -> Option<Result<T>> {
        if Instant::now() >= self.ready_at {
            self.value.take()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Facebook,
    Apple,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
            Provider::Apple => "apple",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::Facebook => "Facebook",
            Provider::Apple => "Apple",
        }
    }
}

fn digest_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Deterministic stand-in for a server-issued token.
fn mock_token(email: &str) -> String {
    format!("demo-{}", &digest_hex(email)[..12])
}

fn mock_id(email: &str) -> String {
    digest_hex(email)[..8].to_string()
}

fn mock_session(email: &str, name: &str) -> Session {
    Session {
        id: mock_id(email),
        email: email.to_string(),
        name: name.to_string(),
        has_profile: false,
        token: mock_token(email),
    }
}

/// The mock accepts any credentials that pass client-side validation.
pub fn login(email: &str, _password: &str) -> Delayed<Session> {
    Delayed::new(Ok(mock_session(email, "John Doe")), LOGIN_DELAY)
}

pub fn signup(name: &str, email: &str, _password: &str) -> Delayed<Session> {
    Delayed::new(Ok(mock_session(email, name)), SIGNUP_DELAY)
}

pub fn social_login(provider: Provider) -> Delayed<Session> {
    let email = format!("user@{}.com", provider.name());
    let name = format!("{} User", provider.label());
    Delayed::new(Ok(mock_session(&email, &name)), SOCIAL_DELAY)
}

pub fn forgot_password(_email: &str) -> Delayed<()> {
    Delayed::new(Ok(()), FORGOT_DELAY)
}

pub fn save_profile(_draft: &ProfileDraft) -> Delayed<()> {
    Delayed::new(Ok(()), SAVE_PROFILE_DELAY)
}

/// Geolocation stand-in; a real client would reverse-geocode here.
pub fn detect_location() -> Delayed<(String, String)> {
    Delayed::new(
        Ok(("New York".to_string(), "USA".to_string())),
        LOCATION_DELAY,
    )
}
