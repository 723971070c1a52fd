use super::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "careermatch", about = "Career-matching client session tool")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recover the stored session and print it
    Status,
    /// Sign in with username and password
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in with a Google ID token
    GoogleLogin {
        #[arg(long)]
        token: String,
    },
    /// Create an account (signs out first)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    Logout,
    /// Force an access token refresh
    Refresh,
    /// Send an authenticated API request
    Request {
        method: String,
        path: String,
        #[arg(long)]
        body: Option<String>,
    },
    /// Show what the route guard decides for a path
    Route { path: String },
}
