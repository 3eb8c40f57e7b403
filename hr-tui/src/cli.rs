use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "hr-tui")]
#[command(about = "Terminal UI for leave requests and salary slips")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the HR API server
    Run,
    /// Run in dev mode with local in-memory data
    Dev {
        /// Sign in as the seeded HR manager instead of the employee
        #[arg(long)]
        hr: bool,
    },
    /// Sign in with email and password and store the token
    Login,
    /// Remove the stored session token
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}
