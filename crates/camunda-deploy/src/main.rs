mod commands;
mod manifest;
mod state;

use camunda_provider::{CamundaProvider, ConfigValue, ProviderConfigInput};
use clap::{Args, Parser, Subcommand};
use commands::Context;
use state::StateManager;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "camunda-deploy")]
#[command(about = "Declarative deployments for the Camunda engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the .camunda state
    #[arg(long, global = true, default_value = ".")]
    state_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    provider: ProviderArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update the deployment described by a manifest
    Apply {
        /// Path to the manifest (JSON)
        manifest: PathBuf,
    },
    /// Re-read a tracked deployment from the engine
    Refresh {
        /// Deployment key
        key: String,
    },
    /// Delete a tracked deployment from the engine
    Destroy {
        /// Deployment key
        key: String,
    },
    /// Start tracking an existing deployment
    ///
    /// The id is recorded as the deployment key and the follow-up read has
    /// no engine id to fetch, so an import ends with "Error reading
    /// deployment" and leaves the state file untouched.
    Import {
        /// Deployment id on the engine
        id: String,
    },
    /// Show tracked deployments
    Show {
        /// Print the raw state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show version information
    Version,
}

/// Provider settings. Endpoint and credentials fall back to
/// CAMUNDA_ENDPOINT, CAMUNDA_USERNAME and CAMUNDA_PASSWORD when omitted.
#[derive(Args)]
struct ProviderArgs {
    /// Engine REST endpoint, e.g. https://engine.example.com/engine-rest
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Basic auth user
    #[arg(long, global = true)]
    username: Option<String>,

    /// Basic auth password
    #[arg(long, global = true)]
    password: Option<String>,

    /// Skip server certificate verification
    #[arg(long, global = true, env = "CAMUNDA_INSECURE_SKIP_VERIFY")]
    insecure_skip_verify: bool,

    /// Client certificate (PEM file)
    #[arg(long, global = true, env = "CAMUNDA_TLS_CERTIFICATE")]
    tls_certificate: Option<PathBuf>,

    /// Client private key (PEM file)
    #[arg(long, global = true, env = "CAMUNDA_TLS_KEY")]
    tls_key: Option<PathBuf>,

    /// Additional trusted certificates (PEM bundle)
    #[arg(long, global = true, env = "CAMUNDA_TLS_CA")]
    tls_ca: Option<PathBuf>,
}

impl ProviderArgs {
    fn to_input(&self) -> anyhow::Result<ProviderConfigInput> {
        Ok(ProviderConfigInput {
            endpoint: self.endpoint.clone().into(),
            username: self.username.clone().into(),
            password: self.password.clone().into(),
            insecure_skip_verify: if self.insecure_skip_verify {
                ConfigValue::Known(true)
            } else {
                ConfigValue::Null
            },
            tls_certificate: read_pem(self.tls_certificate.as_deref())?,
            tls_key: read_pem(self.tls_key.as_deref())?,
            tls_ca: read_pem(self.tls_ca.as_deref())?,
        })
    }
}

fn read_pem(path: Option<&Path>) -> anyhow::Result<ConfigValue<String>> {
    let Some(path) = path else {
        return Ok(ConfigValue::Null);
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
    Ok(ConfigValue::Known(content))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let states = StateManager::new(&cli.state_dir);

    // Commands that never talk to the engine
    match &cli.command {
        Commands::Version => {
            println!("camunda-deploy {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Show { json } => return commands::show::handle(&states, *json).await,
        _ => {}
    }

    let provider = CamundaProvider::new();
    let diags = provider.configure(&cli.provider.to_input()?);
    commands::check_diagnostics(&diags)?;
    if !provider.is_configured() {
        anyhow::bail!("Provider configuration is incomplete");
    }

    let ctx = Context { provider, states };

    match &cli.command {
        Commands::Apply { manifest } => commands::apply::handle(&ctx, manifest).await,
        Commands::Refresh { key } => commands::refresh::handle(&ctx, key).await,
        Commands::Destroy { key } => commands::destroy::handle(&ctx, key).await,
        Commands::Import { id } => commands::import::handle(&ctx, id).await,
        Commands::Version | Commands::Show { .. } => {
            unreachable!("handled before provider configuration")
        }
    }
}
