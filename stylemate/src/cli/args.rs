//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::models::StylePreference;

/// Stylemate - AI outfit recommendations from your terminal
#[derive(Parser, Debug)]
#[command(name = "stylemate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat with the style assistant
    Chat {
        /// Style preference to start with
        #[arg(short, long, value_enum)]
        gender: Option<StylePreference>,

        /// Chat without being logged in
        #[arg(long)]
        guest: bool,
    },

    /// Ask a single question and print the answer
    Ask {
        /// Style preference for the suggestions
        #[arg(short, long, value_enum)]
        gender: Option<StylePreference>,

        /// Ask without being logged in
        #[arg(long)]
        guest: bool,

        /// Message to send
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// Log in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Password confirmation (read from stdin when omitted)
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Send a password reset email
    ResetPassword {
        /// Account email
        #[arg(short, long, default_value = "")]
        email: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Start the recommendation server
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Listen on all interfaces instead of localhost
        #[arg(long)]
        public: bool,

        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
}
