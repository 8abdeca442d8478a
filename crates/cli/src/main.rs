//! Venuedesk CLI - Database migrations and developer tools.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! vd-cli migrate
//!
//! # Inspect the role table
//! vd-cli roles list
//! vd-cli roles check manager bookings.delete
//! vd-cli roles route staff /reports
//!
//! # Inspect the plan catalog
//! vd-cli plans show growth
//! vd-cli plans can-create basic venues 1
//!
//! # Mint a development access token
//! vd-cli token mint --role admin --plan pro
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use venuedesk_core::{OrganizationId, UserId};

mod commands;

#[derive(Parser)]
#[command(name = "vd-cli")]
#[command(author, version, about = "Venuedesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run admin database migrations
    Migrate,
    /// Inspect roles and permissions
    Roles {
        #[command(subcommand)]
        action: RolesAction,
    },
    /// Inspect subscription plans
    Plans {
        #[command(subcommand)]
        action: PlansAction,
    },
    /// Development access tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum RolesAction {
    /// List every role with its permissions
    List,
    /// Check whether a role holds a permission
    Check {
        /// Role identifier (e.g. `manager`)
        role: String,
        /// Permission tag (e.g. `bookings.delete`)
        permission: String,
    },
    /// Check whether a role may open a console route
    Route {
        role: String,
        /// Route path (e.g. `/settings/billing`)
        path: String,
    },
}

#[derive(Subcommand)]
enum PlansAction {
    /// Print a plan definition, or the whole catalog
    Show {
        /// Plan identifier (`basic`, `growth`, `pro`)
        plan: Option<String>,
    },
    /// Check a creation limit
    CanCreate {
        plan: String,
        /// `venues`, `staff`, `bookings_per_month` or `widgets`
        resource: String,
        /// How many already exist
        usage: u32,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Mint an access token signed with `VENUEDESK_JWT_SECRET`
    Mint {
        /// User ID (random if omitted)
        #[arg(short, long)]
        user: Option<UserId>,

        #[arg(short, long)]
        email: Option<String>,

        /// Role identifier
        #[arg(short, long, default_value = "staff")]
        role: String,

        /// Plan identifier
        #[arg(short, long)]
        plan: Option<String>,

        /// Organization ID
        #[arg(short, long)]
        org: Option<OrganizationId>,

        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Roles { action } => match action {
            RolesAction::List => commands::roles::list(),
            RolesAction::Check { role, permission } => {
                commands::roles::check(&role, &permission)?;
            }
            RolesAction::Route { role, path } => {
                commands::roles::route(&role, &path)?;
            }
        },
        Commands::Plans { action } => match action {
            PlansAction::Show { plan } => commands::plans::show(plan.as_deref())?,
            PlansAction::CanCreate {
                plan,
                resource,
                usage,
            } => {
                commands::plans::can_create(&plan, &resource, usage)?;
            }
        },
        Commands::Token { action } => match action {
            TokenAction::Mint {
                user,
                email,
                role,
                plan,
                org,
                ttl_hours,
            } => commands::token::mint(commands::token::MintRequest {
                user_id: user,
                email,
                role,
                plan,
                organization_id: org,
                ttl_hours,
            })?,
        },
    }
    Ok(())
}
