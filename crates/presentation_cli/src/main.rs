//! PlaceFinder CLI
//!
//! Search places, resolve addresses and plan driving routes from the
//! terminal, and manage the signed-in account.

#![allow(clippy::print_stdout)]

mod bootstrap;
mod render;

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use application::{ApplicationError, GeocodingPort, OAuthProvider, SearchOutcome};
use clap::{Parser, Subcommand};
use domain::Coordinate;
use infrastructure::{AppConfig, init_telemetry};
use secrecy::SecretString;
use tracing::{debug, info};

/// PlaceFinder CLI
#[derive(Parser)]
#[command(name = "placefinder-cli")]
#[command(author, version, about = "Place search and driving directions", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search places by keyword
    Search {
        /// Search keyword
        query: String,
    },

    /// Resolve a street address to coordinates
    Geocode {
        /// Address to resolve
        address: String,
    },

    /// Search blog posts about a place
    Blogs {
        /// Search keyword
        query: String,
    },

    /// Search a place and plan a driving route to it
    ///
    /// Example: placefinder-cli route "서울역" --from 37.4979,127.0276
    Route {
        /// Search keyword for the destination
        query: String,

        /// Index of the search result to drive to
        #[arg(short, long, default_value = "0")]
        pick: usize,

        /// Start position as LAT,LNG (default: geolocation.fixed_position)
        #[arg(long, value_parser = parse_coordinate)]
        from: Option<Coordinate>,
    },

    /// Account management
    #[command(subcommand)]
    Auth(AuthCommand),
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Show the current session
    Status,

    /// Create an account
    SignUp {
        /// Email address
        email: String,

        /// Password (at least 8 characters)
        #[arg(long, env = "PLACEFINDER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password again
        #[arg(long)]
        confirm: String,
    },

    /// Sign in with email and password
    SignIn {
        /// Email address
        email: String,

        /// Password
        #[arg(long, env = "PLACEFINDER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Print the URL that starts a third-party sign-in
    Oauth {
        /// google, kakao or github
        provider: OAuthProvider,
    },

    /// Send a password reset email
    ResetRequest {
        /// Email address
        email: String,
    },

    /// Set a new password using the token from the reset link
    ResetConfirm {
        /// Access token from the reset link
        #[arg(long, env = "PLACEFINDER_RECOVERY_TOKEN", hide_env_values = true)]
        token: String,

        /// New password
        #[arg(long, env = "PLACEFINDER_PASSWORD", hide_env_values = true)]
        password: String,

        /// New password again
        #[arg(long)]
        confirm: String,
    },

    /// Sign out
    SignOut,
}

/// Determine log filter level from verbosity count
///
/// `None` leaves the choice to `RUST_LOG` or the config file.
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Parse `LAT,LNG`
fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{lng}': {e}"))?;
    Coordinate::new(lat, lng).map_err(|e| e.to_string())
}

/// Turn an auth store outcome into a CLI error
fn auth_result<T>(outcome: Result<T, String>) -> anyhow::Result<T> {
    outcome.map_err(|message| anyhow!(message))
}

async fn run_route(
    config: &AppConfig,
    query: &str,
    pick: usize,
    from: Option<Coordinate>,
) -> anyhow::Result<()> {
    let app = bootstrap::place_finder(config, from)?;
    let finder = &app.finder;

    let position = finder
        .locate_me()
        .await
        .context("could not determine the start position (pass --from LAT,LNG)")?;
    debug!(position = %position.coordinate, "Located");

    match finder.search(query).await? {
        SearchOutcome::EmptyQuery => return Err(anyhow!("search query must not be empty")),
        SearchOutcome::NoResults => return Err(anyhow!("no places found for '{query}'")),
        SearchOutcome::Found(n) => info!(results = n, "Search finished"),
    }
    print!("{}", render::places(&finder.state().places));

    finder.select_place(pick).await?;
    match finder.request_route().await {
        Ok(_) => {},
        Err(ApplicationError::NoRoute { code }) => {
            return Err(anyhow!("no drivable route to this place (code {code})"));
        },
        Err(e) => return Err(e.into()),
    }

    println!();
    print!("{}", render::page(&finder.state()));
    if let Some(map) = app.sdk.last_map() {
        debug!(
            markers = map.markers().len(),
            overlays = map.polylines().len(),
            "Map state"
        );
    }

    app.map.shutdown();
    Ok(())
}

async fn run_auth(config: &AppConfig, command: AuthCommand) -> anyhow::Result<()> {
    let store = bootstrap::auth_store(config)?;
    let listener = store.spawn_event_listener();
    store.restore().await;

    match command {
        AuthCommand::Status => {},
        AuthCommand::SignUp {
            email,
            password,
            confirm,
        } => {
            auth_result(store.begin_sign_up(&email))?;
            auth_result(store.complete_sign_up(&password, &confirm).await)?;
            if !store.is_authenticated() {
                println!("Check {email} for a confirmation link.");
            }
        },
        AuthCommand::SignIn { email, password } => {
            auth_result(store.sign_in(&email, &password).await)?;
        },
        AuthCommand::Oauth { provider } => {
            let url = auth_result(store.sign_in_with_oauth(provider))?;
            println!("Open this URL to continue with {provider}:\n{url}");
        },
        AuthCommand::ResetRequest { email } => {
            auth_result(store.reset_password_request(&email).await)?;
            println!("Password reset email sent to {email}.");
        },
        AuthCommand::ResetConfirm {
            token,
            password,
            confirm,
        } => {
            let token = SecretString::from(token);
            auth_result(store.reset_password_confirm(&token, &password, &confirm).await)?;
            println!("Password updated. Sign in with the new password.");
        },
        AuthCommand::SignOut => auth_result(store.sign_out().await)?,
    }

    print!("{}", render::session(&store.session()));
    listener.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    init_telemetry(&config.telemetry, log_filter_from_verbosity(cli.verbose))?;

    if let Err(problems) = config.validate() {
        return Err(anyhow!("invalid configuration:\n  {}", problems.join("\n  ")));
    }

    match cli.command {
        Commands::Search { query } => {
            let adapter = bootstrap::search_adapter(&config)?;
            let places = application::PlaceSearchPort::search(&adapter, &query).await?;
            print!("{}", render::places(&places));
        },

        Commands::Geocode { address } => {
            let adapter = bootstrap::geocoding_adapter(&config)?;
            let found = adapter.geocode(&address).await?;
            println!("{}", found.road_address);
            println!("  at {}", found.coordinate);
        },

        Commands::Blogs { query } => {
            let adapter = bootstrap::search_adapter(&config)?;
            let posts = application::BlogSearchPort::search_blogs(&adapter, &query).await?;
            print!("{}", render::blogs(&posts));
        },

        Commands::Route { query, pick, from } => run_route(&config, &query, pick, from).await?,

        Commands::Auth(command) => run_auth(&config, command).await?,
    }

    Ok(())
}
