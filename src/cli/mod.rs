pub mod app;
pub mod demo;
pub mod form;
pub mod login;
pub mod logout;
pub mod signup;
pub mod status;
pub mod welcome;
pub mod wizard;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "matchly",
    about = "Terminal client for the Matchly dating-app prototype."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email and password.
    Login,
    /// Create a new account.
    Signup,
    /// Create or resume your profile (requires a logged-in session).
    Profile,
    /// Show the current session.
    Status,
    /// Log out and clear any saved session.
    Logout,
    /// Explore the profile wizard with pre-filled sample data.
    Demo,
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
