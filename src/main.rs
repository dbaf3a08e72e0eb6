use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use pricewatch::config::{AppConfig, ConfigOverrides};
use pricewatch::errors::AppError;
use pricewatch::logging::{init_logging, LoggingConfig};
use pricewatch::models::{ProductEditForm, ProductForm, ProductId, RegisterForm, TimeRange};
use pricewatch::routes::{auth, dashboard, health, notifications, settings};
use pricewatch::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "pricewatch", about = "Track product prices against your targets", long_about = None)]
struct Cli {
    /// Base URL of the price tracker API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Show demo data and keep local records when the API is unreachable
    #[arg(long, global = true)]
    offline_fallback: Option<bool>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login(LoginArgs),
    /// Create an account
    Register(RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Request a password reset email
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Show who is signed in
    Whoami,
    /// Stats and tracked products
    Dashboard {
        /// Also chart this product
        #[arg(long)]
        select: Option<ProductId>,
        #[arg(long, default_value_t = TimeRange::Week)]
        range: TimeRange,
    },
    /// Track a new product
    Add(AddArgs),
    /// Change a tracked product
    Edit(EditArgs),
    /// Stop tracking a product
    Remove { id: ProductId },
    /// Price history chart of one product
    History {
        id: ProductId,
        /// 7d, 30d or 90d
        #[arg(long, default_value_t = TimeRange::Week)]
        range: TimeRange,
    },
    Notifications(NotificationsCommand),
    Settings(SettingsCommand),
    /// Check that the API answers
    Health,
}

#[derive(Debug, Args)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "PRICEWATCH_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "PRICEWATCH_PASSWORD", hide_env_values = true)]
    password: String,
    /// Defaults to --password
    #[arg(long)]
    confirm_password: Option<String>,
    /// Accept the terms of service
    #[arg(long)]
    accept_terms: bool,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product page URL
    #[arg(long)]
    url: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    current_price: Option<f64>,
    #[arg(long)]
    target_price: f64,
    #[arg(long)]
    image: Option<String>,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: ProductId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    current_price: Option<f64>,
    #[arg(long)]
    target_price: Option<f64>,
    #[arg(long)]
    image: Option<String>,
}

#[derive(Debug, Args)]
struct NotificationsCommand {
    #[command(subcommand)]
    command: Option<NotificationsSubcommand>,
}

#[derive(Debug, Subcommand)]
enum NotificationsSubcommand {
    List,
    /// Mark one notification as read
    Read { id: i64 },
}

#[derive(Debug, Args)]
struct SettingsCommand {
    #[command(subcommand)]
    command: Option<SettingsSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    Show,
    /// key=value pairs, e.g. currency=USD check_interval_hours=6
    Set {
        #[arg(required = true)]
        changes: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    match LoggingConfig::from_env(cli.verbose) {
        Ok(logging) => {
            if let Err(e) = init_logging(logging) {
                eprintln!("Failed to initialize logging: {}", e);
            }
        }
        Err(e) => eprintln!("Logging disabled: {}", e),
    }

    if let Err(error) = run(cli).await {
        match error.downcast_ref::<AppError>() {
            Some(AppError::LoginRequired) => {
                eprintln!("Not signed in, please run `pricewatch login`");
            }
            Some(e) if e.requires_login() => {
                eprintln!("Session expired, please run `pricewatch login`");
            }
            _ => eprintln!("Error: {:#}", error),
        }
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let overrides = ConfigOverrides {
        api_url: cli.api_url.clone(),
        offline_fallback_enabled: cli.offline_fallback,
    };
    AppConfig::from_env_with(overrides).context("failed to read configuration")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    info!(
        "Using API {} (offline fallback {})",
        config.api_base_url,
        if config.offline_fallback_enabled { "on" } else { "off" }
    );
    let state = AppState::from_config(config)?;

    let output = match cli.command {
        Commands::Login(args) => auth::login(&state, &args.email, &args.password).await?,
        Commands::Register(args) => {
            let confirm_password = args
                .confirm_password
                .unwrap_or_else(|| args.password.clone());
            auth::register(
                &state,
                RegisterForm {
                    full_name: args.full_name,
                    email: args.email,
                    password: args.password,
                    confirm_password,
                    accept_terms: args.accept_terms,
                },
            )
            .await?
        }
        Commands::Logout => auth::logout(&state),
        Commands::ResetPassword { email } => auth::reset_password(&state, &email).await?,
        Commands::Whoami => auth::whoami(&state),
        Commands::Dashboard { select, range } => dashboard::show(&state, select, range).await?,
        Commands::Add(args) => {
            dashboard::add(
                &state,
                ProductForm {
                    url: args.url,
                    name: args.name,
                    current_price: args.current_price,
                    target_price: args.target_price,
                    image: args.image,
                },
            )
            .await?
        }
        Commands::Edit(args) => {
            dashboard::edit(
                &state,
                args.id,
                ProductEditForm {
                    name: args.name,
                    current_price: args.current_price,
                    target_price: args.target_price,
                    image: args.image,
                },
            )
            .await?
        }
        Commands::Remove { id } => dashboard::remove(&state, id).await?,
        Commands::History { id, range } => dashboard::history(&state, id, range).await?,
        Commands::Notifications(NotificationsCommand { command }) => match command {
            None | Some(NotificationsSubcommand::List) => notifications::list(&state).await?,
            Some(NotificationsSubcommand::Read { id }) => {
                notifications::mark_read(&state, id).await?
            }
        },
        Commands::Settings(SettingsCommand { command }) => match command {
            None | Some(SettingsSubcommand::Show) => settings::show(&state).await?,
            Some(SettingsSubcommand::Set { changes }) => settings::set(&state, &changes).await?,
        },
        Commands::Health => health::health(&state).await,
    };

    println!("{}", output);
    Ok(())
}
