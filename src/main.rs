use clap::Parser;

use ideaforge_lib::config::{
    AppConfig, SecretsConfig, COMPLETION_PROVIDER_ID, DEFAULT_COMPLETIONS_URL, DEFAULT_MODEL,
    DEFAULT_SEARCH_URL,
};
use ideaforge_lib::server::{self, ServerAppState};
use ideaforge_lib::shutdown::{register_signal_handlers, ShutdownState};

/// IdeaForge - HTTP API server for AI-assisted business idea generation
#[derive(Parser, Debug)]
#[command(name = "ideaforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, default_value = "4520")]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Allowed CORS origins (comma separated). Permissive when omitted.
    #[arg(long, value_delimiter = ',')]
    cors_origin: Vec<String>,

    /// Completion API key. Falls back to ~/.ideaforge/secrets.toml; when
    /// absent the server runs in deterministic offline mode.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Persist the provided API key to the secrets file before starting
    #[arg(long)]
    store_api_key: bool,

    /// Chat-completion model
    #[arg(long, env = "IDEAFORGE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Chat-completion endpoint URL
    #[arg(long, env = "IDEAFORGE_COMPLETIONS_URL", default_value = DEFAULT_COMPLETIONS_URL)]
    completions_url: String,

    /// Story-search endpoint URL
    #[arg(long, env = "IDEAFORGE_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    search_url: String,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::init();

    if cli.store_api_key {
        match &cli.api_key {
            Some(key) if !key.trim().is_empty() => {
                if let Err(e) = store_api_key(key) {
                    eprintln!("Failed to store API key: {}", e);
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("--store-api-key requires an API key (flag or OPENAI_API_KEY)");
                std::process::exit(1);
            }
        }
    }

    let config = AppConfig::resolve(cli.api_key, cli.model, cli.completions_url, cli.search_url);

    // Create the tokio runtime
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        let shutdown_state = ShutdownState::new();
        if let Err(e) = register_signal_handlers(shutdown_state.clone()) {
            log::warn!("Failed to register signal handlers: {}", e);
        }

        let state = ServerAppState::new(config, shutdown_state);

        let cors_origins = if cli.cors_origin.is_empty() {
            None
        } else {
            Some(cli.cors_origin)
        };

        if let Err(e) = server::run_server(cli.port, &cli.bind, state, cors_origins).await {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
    });
}

/// Save the completion credential to ~/.ideaforge/secrets.toml
fn store_api_key(key: &str) -> anyhow::Result<()> {
    let mut secrets = SecretsConfig::load()?;
    secrets.set_token(COMPLETION_PROVIDER_ID, key.trim());
    secrets.save()?;
    println!("API key stored in secrets file");
    Ok(())
}
