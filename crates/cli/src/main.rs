//! Prosper CLI - migrations, seeding and image sync.
//!
//! # Usage
//!
//! ```bash
//! # Run site and admin migrations
//! prosper migrate all
//!
//! # Create an admin account
//! prosper admin create -u jmanning -f John -l Manning -p 'Str0ng!pass'
//!
//! # Load the default page text and catalog
//! prosper seed content --images crates/site/static/images
//!
//! # Fill a development database with random inquiries and visitors
//! prosper seed mock --seed 7
//!
//! # Mirror the image directory to S3, or restore it
//! prosper images upload
//! prosper images download
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin users
//! - `seed content` / `seed mock` - Load default or random data
//! - `images upload` / `images download` - Sync the image directory with S3

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "prosper")]
#[command(author, version, about = "Prosper Wood Designs CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Load data into the database
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },
    /// Sync the image directory with the S3 bucket
    Images {
        #[command(subcommand)]
        action: ImagesAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run site schema migrations
    Site,
    /// Run admin schema migrations
    Admin,
    /// Run all database migrations
    All,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Login name (5-20 characters)
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        first_name: String,

        #[arg(short, long)]
        last_name: String,

        /// At least 8 characters with lower, upper, digit and one of !@#$%^&*
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedAction {
    /// Load default layouts and products
    Content {
        /// Seed file with layouts and products
        #[arg(long, default_value = commands::seed::DEFAULT_SEED_FILE)]
        file: PathBuf,

        /// Directory of product photos to import
        #[arg(long)]
        images: Option<PathBuf>,

        /// Load even when the catalog already has data
        #[arg(long)]
        force: bool,
    },
    /// Insert random admins, inquiries and visitors
    Mock {
        #[arg(long, default_value_t = 3)]
        admins: u32,

        #[arg(long, default_value_t = 8)]
        requests: u32,

        #[arg(long, default_value_t = 8)]
        questions: u32,

        #[arg(long, default_value_t = 8)]
        contacts: u32,

        #[arg(long, default_value_t = 40)]
        visitors: u32,

        /// Random seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum ImagesAction {
    /// Push every local image to the bucket
    Upload,
    /// Pull every image in the bucket into the local directory
    Download,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Site => commands::migrate::site().await?,
            MigrateTarget::Admin => commands::migrate::admin().await?,
            MigrateTarget::All => {
                commands::migrate::site().await?;
                commands::migrate::admin().await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                first_name,
                last_name,
                password,
            } => {
                commands::admin::create_user(&username, &first_name, &last_name, &password)
                    .await?;
            }
        },
        Commands::Seed { action } => match action {
            SeedAction::Content {
                file,
                images,
                force,
            } => {
                commands::seed::content(&file, images.as_deref(), force).await?;
            }
            SeedAction::Mock {
                admins,
                requests,
                questions,
                contacts,
                visitors,
                seed,
            } => {
                let counts = commands::mock::MockCounts {
                    admins,
                    requests,
                    questions,
                    contacts,
                    visitors,
                };
                commands::mock::load(counts, seed).await?;
            }
        },
        Commands::Images { action } => match action {
            ImagesAction::Upload => commands::images::upload().await?,
            ImagesAction::Download => commands::images::download().await?,
        },
    }
    Ok(())
}
