use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

/// Minimum password length accepted by login and signup.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum age to create a profile.
pub const MIN_AGE: i32 = 18;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Local part + @ + domain containing a dot, no whitespace anywhere.
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_re().is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Parse a YYYY-MM-DD date of birth.
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Whole years between `dob` and `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

pub fn age_today(dob: NaiveDate) -> i32 {
    age_on(dob, Local::now().date_naive())
}
