//! gitbridge CLI - one issue-tracking interface over GitHub and GitLab.

mod providers;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gitbridge_core::config::Config;
use gitbridge_core::{Error, IssueRequest, ProviderRegistry, DEFAULT_PER_PAGE};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitbridge")]
#[command(author, version, about = "gitbridge - manage issues across GitHub and GitLab", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Provider and repository an issue command targets.
#[derive(Args, Debug)]
struct RepoArgs {
    /// Provider name (github, gitlab)
    provider: String,

    /// Repository owner (user, organization, or group)
    owner: String,

    /// Repository name
    repo: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered providers
    Providers,

    /// Check that the configured credentials authenticate
    Validate {
        /// Provider name (github, gitlab)
        provider: String,
    },

    /// List issues
    List {
        #[command(flatten)]
        target: RepoArgs,

        /// Page number (starting at 1)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Issues per page (1-100)
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,
    },

    /// Show a single issue
    Get {
        #[command(flatten)]
        target: RepoArgs,

        /// Issue number
        id: String,
    },

    /// Create an issue
    Create {
        #[command(flatten)]
        target: RepoArgs,

        /// Issue title
        #[arg(long)]
        title: String,

        /// Issue description
        #[arg(long)]
        description: Option<String>,
    },

    /// Replace an issue's title and description
    Update {
        #[command(flatten)]
        target: RepoArgs,

        /// Issue number
        id: String,

        /// New title
        #[arg(long)]
        title: String,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Close an issue
    Close {
        #[command(flatten)]
        target: RepoArgs,

        /// Issue number
        id: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (tokens masked)
    Show,

    /// Print a single value (e.g., `gitlab.url`)
    Get {
        /// Key in `section.field` form
        key: String,
    },

    /// Set a single value (e.g., `http.timeout_secs 30`)
    Set {
        /// Key in `section.field` form
        key: String,

        /// New value
        value: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path)?;

    let Some(command) = cli.command else {
        println!("gitbridge - manage issues across GitHub and GitLab");
        println!("Run with --help for usage information");
        return Ok(());
    };

    if let Commands::Config { command } = command {
        return run_config(command, config, &config_path);
    }

    let registry = providers::build_registry(&config)?;
    run(command, &registry).await
}

async fn run(command: Commands, registry: &ProviderRegistry) -> anyhow::Result<()> {
    match command {
        Commands::Providers => {
            for name in registry.names() {
                println!("{}", name);
            }
        }
        Commands::Validate { provider } => {
            let client = registry.resolve(&provider)?;
            let valid = client.validate_credentials().await;
            tracing::info!(provider = client.service_type(), valid, "Credential check");
            print_json(&serde_json::json!({
                "service_type": client.service_type(),
                "valid": valid,
            }))?;
        }
        Commands::List {
            target,
            page,
            per_page,
        } => {
            let client = registry.resolve(&target.provider)?;
            tracing::info!(
                "Fetching issues for {} repo {}/{}",
                client.service_type(),
                target.owner,
                target.repo
            );
            let issues = client
                .list_issues(&target.owner, &target.repo, page, per_page)
                .await?;
            print_json(&issues)?;
        }
        Commands::Get { target, id } => {
            let client = registry.resolve(&target.provider)?;
            let issue = client.get_issue(&target.owner, &target.repo, &id).await?;
            print_json(&issue)?;
        }
        Commands::Create {
            target,
            title,
            description,
        } => {
            let client = registry.resolve(&target.provider)?;
            let request = issue_request(&target, title, description)?;
            let issue = client
                .create_issue(&target.owner, &target.repo, &request)
                .await?;
            tracing::info!(id = %issue.id, "Issue created");
            print_json(&issue)?;
        }
        Commands::Update {
            target,
            id,
            title,
            description,
        } => {
            let client = registry.resolve(&target.provider)?;
            let request = issue_request(&target, title, description)?;
            let issue = client
                .update_issue(&target.owner, &target.repo, &id, &request)
                .await?;
            print_json(&issue)?;
        }
        Commands::Close { target, id } => {
            let client = registry.resolve(&target.provider)?;
            let issue = client.close_issue(&target.owner, &target.repo, &id).await?;
            tracing::info!(id = %issue.id, "Issue closed");
            print_json(&issue)?;
        }
        Commands::Config { .. } => anyhow::bail!("config commands do not use a provider"),
    }

    Ok(())
}

fn run_config(
    command: ConfigCommands,
    mut config: Config,
    path: &std::path::Path,
) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            let masked = mask_tokens(config);
            let rendered =
                toml::to_string_pretty(&masked).context("Failed to render configuration")?;
            println!("# {}", path.display());
            print!("{}", rendered);
        }
        ConfigCommands::Get { key } => match config.get(&key)? {
            Some(value) => println!("{}", value),
            None => println!("(not set)"),
        },
        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            config.save_to(path)?;
            tracing::info!(key = %key, "Configuration updated");
        }
    }
    Ok(())
}

/// Build the request for create/update. An empty title is rejected here,
/// before any provider is contacted.
fn issue_request(
    target: &RepoArgs,
    title: String,
    description: Option<String>,
) -> gitbridge_core::Result<IssueRequest> {
    if title.trim().is_empty() {
        return Err(Error::InvalidArgument("title must not be empty".to_string()));
    }
    Ok(IssueRequest::new(title, description).for_repository(&target.owner, &target.repo))
}

fn mask_tokens(mut config: Config) -> Config {
    const MASK: &str = "********";
    if let Some(github) = config.github.as_mut() {
        if github.token.is_some() {
            github.token = Some(MASK.to_string());
        }
    }
    if let Some(gitlab) = config.gitlab.as_mut() {
        if gitlab.token.is_some() {
            gitlab.token = Some(MASK.to_string());
        }
    }
    config
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(())
}
