//! HTTP server exposing GET /chat_stream/{message} with Server-Sent Events.
//!
//! Configure via env: OPENAI_API_KEY, OPENAI_MODEL, OPENAI_BASE_URL, TAVILY_API_KEY,
//! SYSTEM_PROMPT, RECURSION_LIMIT, LISTEN, LOG_FILE, etc.
//! See searchgraph's ChatBuildConfig::from_env(). Load .env with dotenv.

use std::sync::Arc;

use searchgraph::{build_chat_runner, ChatBuildConfig};
use searchgraph_server::{app, AppState};
use tracing::info;

/// Default listen address.
const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

/// Load .env from current directory; if not found, try parent (workspace root when run from crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

/// Initializes tracing: always to stdout; if env `LOG_FILE` is set, also to that file (append, plain text).
fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,searchgraph=debug,searchgraph_server=debug")
    });

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(filter.clone());

    let registry = tracing_subscriber::registry().with(stdout_layer);

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(filter);
        registry.with(file_layer).init();
        tracing::info!(path = %path, "logging to file");
    } else {
        registry.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();
    init_tracing()?;

    let config = ChatBuildConfig::from_env();
    if config.openai_api_key.is_none() {
        return Err("OPENAI_API_KEY must be set".into());
    }
    info!(
        model = %config.model_or_default(),
        base_url = ?config.openai_base_url,
        search = config.tavily_api_key.is_some(),
        "LLM and runtime config loaded"
    );

    let runner = build_chat_runner(&config, None)?;
    let app = app(AppState {
        runner: Arc::new(runner),
    });

    let listen = std::env::var("LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN.to_string());
    info!("listening on http://{}", listen);
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
