//! Page routing and the top-level screen flow.

use colored::Colorize;

use crate::cli::{login, signup, welcome, wizard};
use crate::error::Result;
use crate::models::Session;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Welcome,
    Login,
    Signup,
    Wizard,
    Matches,
}

/// Where a requested page actually lands, given the current session. Pages
/// that need a logged-in user redirect to the login surface.
pub fn resolve(requested: Page, session: Option<&Session>) -> Page {
    match requested {
        Page::Wizard | Page::Matches if session.is_none() => Page::Login,
        other => other,
    }
}

/// Post-auth routing: users without a profile go to the wizard.
pub fn after_auth(session: &Session) -> Page {
    if session.has_profile {
        Page::Matches
    } else {
        Page::Wizard
    }
}

pub fn run(start: Page) -> Result<()> {
    let mut store = SessionStore::open();
    let mut page = resolve(start, store.current().as_ref());
    loop {
        page = match page {
            Page::Welcome => match welcome::run(&mut store)? {
                welcome::Outcome::Login => Page::Login,
                welcome::Outcome::Signup => Page::Signup,
                welcome::Outcome::Authenticated(session) => after_auth(&session),
                welcome::Outcome::Quit => return Ok(()),
            },
            Page::Login => match login::run(&mut store)? {
                login::Outcome::Authenticated(session) => after_auth(&session),
                login::Outcome::SwitchToSignup => Page::Signup,
                login::Outcome::Back => Page::Welcome,
                login::Outcome::Quit => return Ok(()),
            },
            Page::Signup => match signup::run(&mut store)? {
                // A fresh account never has a profile yet.
                signup::Outcome::Authenticated(_) => Page::Wizard,
                signup::Outcome::SwitchToLogin => Page::Login,
                signup::Outcome::Back => Page::Welcome,
                signup::Outcome::Quit => return Ok(()),
            },
            Page::Wizard => match store.current() {
                None => Page::Login,
                Some(session) => match wizard::run(&mut store, session)? {
                    wizard::Outcome::Completed(_) => Page::Matches,
                    wizard::Outcome::Quit => return Ok(()),
                },
            },
            Page::Matches => {
                print_matches_placeholder(store.current().as_ref());
                return Ok(());
            }
        };
    }
}

fn print_matches_placeholder(session: Option<&Session>) {
    let name = session.map(|s| s.name.as_str()).unwrap_or("there");
    println!();
    println!(
        "{} You're all set, {}!",
        "\u{2665}".truecolor(255, 94, 125),
        name.bold()
    );
    println!("Matches and chat are coming soon.");
}
