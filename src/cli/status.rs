use colored::Colorize;

use crate::error::Result;
use crate::session::{Scope, SessionStore};

pub fn run() -> Result<()> {
    let store = SessionStore::open();

    match store.current() {
        None => {
            println!("Not logged in. Run {} to get started.", "matchly".bold());
        }
        Some(session) => {
            let scope = match store.scope_of_current() {
                Some(Scope::Durable) => "remembered (survives restarts)",
                _ => "this run only",
            };
            println!("Logged in:  {} <{}>", session.name.bold(), session.email);
            println!("Session:    {scope}");
            println!(
                "Profile:    {}",
                if session.has_profile {
                    "complete".green().to_string()
                } else {
                    "incomplete \u{2014} run `matchly profile` to finish".yellow().to_string()
                }
            );
            println!("Stored at:  {}", store.session_path().display());
        }
    }

    Ok(())
}
