use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gitlab_provider::{CancellationToken, Provider, GROUP_HOOK_RESOURCE_TYPE};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitlab_provider_cli::commands::{apply_cmd, import_cmd, schema_cmd, state_cmd, Session};
use gitlab_provider_cli::config::{get_config_path, AppConfig};
use gitlab_provider_cli::errors::Error;

/// gitlab-hooks: manage GitLab group hooks declaratively
#[derive(Parser)]
#[command(name = "gitlab-hooks")]
#[command(about = "Manage GitLab group hooks declaratively", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Resource type to operate on
    #[arg(short = 't', long = "type", global = true, default_value = GROUP_HOOK_RESOURCE_TYPE)]
    resource_type: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resource schema as JSON
    Schema,

    /// Create or update a resource from a TOML file of desired attributes
    Apply {
        /// Name the resource is tracked under
        name: String,

        /// File with the desired attributes
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Reconcile tracked state with the remote object
    Refresh { name: String },

    /// Delete the remote object and stop tracking it
    Destroy { name: String },

    /// Adopt an existing remote object, e.g. `import ci my-group:42`
    Import { name: String, key: String },

    /// Print tracked state with sensitive values masked
    Show { name: String },
}

fn build_session(cli: &Cli, cancel: CancellationToken) -> Result<Session, Error> {
    let mut config = AppConfig::load(&get_config_path(cli.config.as_deref()))?;
    config.apply_env_overrides()?;

    let provider = Provider::from_config(&config.client_config()?)?;
    Ok(Session::new(
        provider,
        cli.resource_type.clone(),
        config.state_file,
        cancel,
    ))
}

async fn execute(cli: &Cli, session: &Session) -> Result<(), Error> {
    match &cli.command {
        Commands::Schema => println!("{}", schema_cmd::render_schema(session)?),
        Commands::Apply { name, file } => {
            let desired = apply_cmd::load_desired(file)?;
            let (action, state) = apply_cmd::apply(session, name, desired).await?;
            match state {
                Some(state) => println!("{name}: {action} (id {})", state.id),
                None => println!("{name}: {action}, but the resource no longer exists"),
            }
        }
        Commands::Refresh { name } => match state_cmd::refresh(session, name).await? {
            Some(state) => println!("{name}: refreshed (id {})", state.id),
            None => println!("{name}: no longer exists, removed from state"),
        },
        Commands::Destroy { name } => {
            state_cmd::destroy(session, name).await?;
            println!("{name}: destroyed");
        }
        Commands::Import { name, key } => {
            let state = import_cmd::import(session, name, key).await?;
            println!("{name}: imported (id {})", state.id);
        }
        Commands::Show { name } => {
            let shown = state_cmd::show(session, name)?;
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("GITLAB_HOOKS_LOG"))
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let session = match build_session(&cli, cancel) {
        Ok(session) => session,
        Err(e) => {
            error!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = execute(&cli, &session).await {
        error!("Error: {e}");
        std::process::exit(1);
    }

    info!("Done");
}
