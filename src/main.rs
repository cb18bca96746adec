mod api;
mod cli;
mod effects;
mod error;
mod fmt;
mod interests;
mod media;
mod models;
mod session;
mod tui;
mod validate;
mod wizard;

use clap::{CommandFactory, Parser};

use cli::app::Page;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::app::run(Page::Welcome),
        Some(Commands::Login) => cli::app::run(Page::Login),
        Some(Commands::Signup) => cli::app::run(Page::Signup),
        Some(Commands::Profile) => cli::app::run(Page::Wizard),
        Some(Commands::Status) => cli::status::run(),
        Some(Commands::Logout) => cli::logout::run(),
        Some(Commands::Demo) => cli::demo::run(),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "matchly", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
