pub mod api;
pub mod config;
pub mod effects;
pub mod form;
pub mod models;
pub mod report;
pub mod session;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiContext, ServerError};
use crate::config::{AppConfig, ConfigError};
use crate::effects::LogFeedbackSink;
use crate::models::DocumentType;
use crate::report::{
    CompletionClient, CompletionError, GenerationSettings, OpenAiClient, ReportGenerator,
    TemplateLoadError, TemplateRegistry,
};
use crate::session::SessionStore;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Templates(#[from] TemplateLoadError),

    #[error("Cannot build completion client: {0}")]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Runtime error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the template file (if any), then let the environment override it.
pub fn load_templates(config: &AppConfig) -> Result<TemplateRegistry, TemplateLoadError> {
    let mut templates = match &config.templates_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading instruction templates");
            TemplateRegistry::from_json_file(path)?
        }
        None => TemplateRegistry::new(),
    };
    templates.overlay_env();

    for document_type in DocumentType::all() {
        if !templates.is_configured(*document_type) {
            tracing::warn!(
                document_type = document_type.as_str(),
                key = document_type.template_key(),
                "No instruction template; generation for this type will fail"
            );
        }
    }
    Ok(templates)
}

/// Start Mediscript: configure, serve until Ctrl-C, shut down.
pub fn run() -> Result<(), RunError> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Mediscript starting v{}", config::APP_VERSION);

    let config = AppConfig::from_env()?;
    let templates = load_templates(&config)?;

    // Built and dropped outside the async runtime: the blocking HTTP client
    // owns its own runtime and must not be dropped from async context.
    let client: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(
        &config.base_url,
        config.api_key.clone(),
        config.timeout,
    )?);

    let generator = ReportGenerator::new(
        Arc::new(templates),
        Arc::clone(&client),
        GenerationSettings {
            model: config.model.clone(),
            temperature: config::TEMPERATURE,
            timeout: config.timeout,
        },
    );
    let ctx = ApiContext::new(
        Arc::new(SessionStore::new(config.session_idle_timeout)),
        Arc::new(generator),
        Arc::new(LogFeedbackSink),
    );

    tracing::info!(
        model = %config.model,
        base_url = %config.base_url,
        session_idle_secs = config.session_idle_timeout.as_secs(),
        "Configuration loaded"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let served = runtime.block_on(async move {
        let mut server = api::start_server(ctx, config.bind_addr).await?;
        tracing::info!(addr = %server.addr(), "Listening");

        tokio::signal::ctrl_c().await?;
        server.shutdown();
        server.wait().await;
        Ok::<(), RunError>(())
    });

    drop(runtime);
    drop(client);
    served
}
