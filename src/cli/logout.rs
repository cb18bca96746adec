use colored::Colorize;

use crate::error::Result;
use crate::session::SessionStore;

pub fn run() -> Result<()> {
    let mut store = SessionStore::open();
    if store.current().is_none() {
        println!("No session to clear.");
        return Ok(());
    }
    store.clear()?;
    println!("{} Logged out.", "\u{2714}".green());
    Ok(())
}
