use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cmd::{
    self, Context,
    dashboard::{RequestsArgs, SetStatusArgs},
    fill::FillArgs,
    login::{BrandsArgs, LoginArgs},
};
use crate::config::{FileConfig, Settings};
use crate::logging;

#[derive(Parser, Debug)]
#[command(
    name = "campaign-intake",
    about = "Campaign request intake and tracking",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Base URL of the action API.
    #[arg(long, env = "CAMPAIGN_API_URL", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up a user by email
    Login(LoginArgs),
    /// List the brands a user can request campaigns for
    Brands(BrandsArgs),
    /// Fill and submit a brand's campaign request form
    Fill(FillArgs),
    /// Show active requests with filters and counters
    Requests(RequestsArgs),
    /// List request statuses
    Statuses,
    /// Move a request to another status
    SetStatus(SetStatusArgs),
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}

pub async fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose);
    let file = FileConfig::load(cli.config.as_deref())?;
    let ctx = Context {
        settings: Settings::resolve(cli.api_url, None, file)?,
        json: cli.json,
    };

    match cli.command {
        Commands::Login(args) => cmd::login::run_login(&ctx, args).await,
        Commands::Brands(args) => cmd::login::run_brands(&ctx, args).await,
        Commands::Fill(args) => cmd::fill::run(&ctx, args).await,
        Commands::Requests(args) => cmd::dashboard::run_requests(&ctx, args).await,
        Commands::Statuses => cmd::dashboard::run_statuses(&ctx).await,
        Commands::SetStatus(args) => cmd::dashboard::run_set_status(&ctx, args).await,
    }
}
