//! Flock CLI - Command-line front end for the membership/attendance backend.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (tries the backend's known login encodings automatically)
//! flock login -e pastor@example.com -p <password>
//!
//! # Who am I?
//! flock whoami
//!
//! # Directory
//! flock members list
//! flock members list -q smith
//! flock members show 42
//! flock members set-role 42 staff
//!
//! # Attendance
//! flock attendance check-in
//! flock attendance check-out --member 42
//!
//! # Sign out
//! flock logout
//! ```
//!
//! # Environment Variables
//!
//! - `FLOCK_API_BASE_URL` - Backend base address (default: `http://localhost:8000`)
//! - `FLOCK_TOKEN_PATH` - Credential file path (default: `$HOME/.flock/tokens.json`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "flock")]
#[command(author, version, about = "Flock membership and attendance CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store session credentials
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Sign out and delete stored credentials
    Logout,
    /// Show the currently signed-in user
    Whoami,
    /// Member directory
    Members {
        #[command(subcommand)]
        action: MembersAction,
    },
    /// Attendance tracking
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },
}

#[derive(Subcommand)]
enum MembersAction {
    /// List the member directory
    List {
        /// Filter by name or email substring
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show one member
    Show {
        /// Member id
        id: String,
    },
    /// Change a member's role (staff/pastor only)
    SetRole {
        /// Member id
        id: String,

        /// New role (`pastor`, `staff`, `member`, `guest`)
        role: String,
    },
}

#[derive(Subcommand)]
enum AttendanceAction {
    /// Record a check-in
    CheckIn {
        /// Check in another member instead of yourself (staff/pastor only)
        #[arg(short, long)]
        member: Option<String>,
    },
    /// Record a check-out
    CheckOut {
        /// Check out another member instead of yourself (staff/pastor only)
        #[arg(short, long)]
        member: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; quiet by default so command output stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&ctx, &email, password).await?,
        Commands::Register {
            email,
            password,
            name,
        } => commands::auth::register(&ctx, name, email, password).await?,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx).await?,
        Commands::Members { action } => match action {
            MembersAction::List { query } => {
                commands::members::list(&ctx, query.as_deref()).await?;
            }
            MembersAction::Show { id } => commands::members::show(&ctx, &id).await?,
            MembersAction::SetRole { id, role } => {
                commands::members::set_role(&ctx, &id, &role).await?;
            }
        },
        Commands::Attendance { action } => match action {
            AttendanceAction::CheckIn { member } => {
                commands::attendance::check_in(&ctx, member.as_deref()).await?;
            }
            AttendanceAction::CheckOut { member } => {
                commands::attendance::check_out(&ctx, member.as_deref()).await?;
            }
        },
    }
    Ok(())
}
