//! travel-agent server.
//!
//! Configuration comes from `TRAVEL_AGENT__*` environment variables (a `.env`
//! file is read when present). See [`travel_agent::config`].

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use travel_agent::adapters::ai::{AnthropicConfig, AnthropicProvider};
use travel_agent::adapters::email::{SendGridConfig, SendGridNotifier};
use travel_agent::adapters::http::api_router;
use travel_agent::adapters::inventory::{Endpoint, HttpInventoryConfig, HttpInventoryProvider};
use travel_agent::adapters::ledger::InMemoryBookingLedger;
use travel_agent::adapters::memory::{FileCustomerMemory, InMemoryCustomerMemory};
use travel_agent::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use travel_agent::adapters::supplier::{HttpSupplierConfig, HttpSupplierGateway, LocalSupplierGateway};
use travel_agent::application::session_registry::sweep_idle_sessions;
use travel_agent::application::{
    BookingClient, BookingSettings, ConversationEngine, EngineSettings, InventorySearchClient,
    SearchPolicy, SessionRegistry, WorkflowController, WorkflowDependencies, WorkflowSettings,
};
use travel_agent::config::{AppConfig, ConfigError, MemoryBackend, ValidationError};
use travel_agent::domain::workflow::KeywordIntentClassifier;
use travel_agent::ports::{AIError, AIProvider, CustomerMemory, SupplierGateway};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build language model client: {0}")]
    LanguageModel(#[from] AIError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for StartupError {
    fn from(err: ValidationError) -> Self {
        StartupError::Config(err.into())
    }
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("travel-agent: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "travel-agent stopped with an error");
        std::process::exit(1);
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info,travel_agent=debug"));

    if config.server.json_logs() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    config.validate()?;
    let addr = config.server.socket_addr()?;

    let controller = Arc::new(build_controller(&config)?);
    let registry = Arc::new(SessionRegistry::new());
    let sweeper_shutdown = CancellationToken::new();
    let sweeper = tokio::spawn(sweep_idle_sessions(
        registry.clone(),
        config.workflow.session_idle_timeout(),
        sweeper_shutdown.clone(),
    ));
    let app = with_middleware(api_router(controller, registry), &config);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        address = %addr,
        environment = ?config.server.environment,
        model = %config.ai.model,
        "travel-agent listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper_shutdown.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Session sweeper ended abnormally");
    }

    tracing::info!("travel-agent stopped");
    Ok(())
}

fn build_controller(config: &AppConfig) -> Result<WorkflowController, StartupError> {
    let api_key = config
        .ai
        .anthropic_api_key
        .clone()
        .ok_or(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))?;
    let mut anthropic = AnthropicConfig::new(api_key)
        .with_model(config.ai.model.clone())
        .with_timeout(config.ai.timeout());
    if let Some(base_url) = &config.ai.base_url {
        anthropic = anthropic.with_base_url(base_url.clone());
    }
    let model = AnthropicProvider::new(anthropic)?;
    let info = model.provider_info();
    if !info.supports_tools {
        return Err(AIError::InvalidRequest(format!("{} does not support tool calling", info.model)).into());
    }
    tracing::info!(
        provider = %info.name,
        model = %info.model,
        max_context_tokens = info.max_context_tokens,
        "Language model configured"
    );
    let engine = ConversationEngine::new(
        Arc::new(model),
        EngineSettings {
            max_tokens: config.ai.max_tokens,
            timeout: config.ai.timeout(),
            history_limit: config.workflow.history_limit,
        },
    );

    let inventory = &config.inventory;
    let endpoint = |base_url: &str, api_key: &Option<String>| {
        Endpoint::new(base_url, api_key.clone().unwrap_or_default())
    };
    let provider = HttpInventoryProvider::new(HttpInventoryConfig {
        flights: inventory
            .has_flights()
            .then(|| endpoint(&inventory.flights_base_url, &inventory.flights_api_key)),
        hotels: inventory
            .has_hotels()
            .then(|| endpoint(&inventory.hotels_base_url, &inventory.hotels_api_key)),
        activities: inventory
            .activities_base_url
            .as_deref()
            .filter(|_| inventory.has_activities())
            .map(|url| endpoint(url, &inventory.activities_api_key)),
        default_currency: config.payment.currency.to_uppercase(),
        timeout: inventory.timeout(),
    });
    let search = InventorySearchClient::new(
        Arc::new(provider),
        SearchPolicy {
            call_timeout: inventory.timeout(),
            max_retries: inventory.max_retries,
            initial_backoff: inventory.retry_backoff(),
        },
    );

    let payments = StripePaymentAdapter::new(
        StripeConfig::new(config.payment.stripe_api_key.clone())
            .with_base_url(config.payment.base_url.clone())
            .with_timeout(config.payment.timeout()),
    );

    let suppliers: Arc<dyn SupplierGateway> =
        match (&config.supplier.base_url, &config.supplier.api_key) {
            (Some(base_url), Some(api_key)) => Arc::new(HttpSupplierGateway::new(
                HttpSupplierConfig::new(base_url.clone(), api_key.clone()),
            )),
            _ => {
                tracing::warn!("No supplier API configured, confirmation numbers are issued locally");
                Arc::new(LocalSupplierGateway::new())
            }
        };

    let notifier = SendGridNotifier::new(
        SendGridConfig::new(
            config.email.sendgrid_api_key.clone(),
            config.email.from_email.clone(),
            config.email.from_name.clone(),
        )
        .with_base_url(config.email.base_url.clone()),
    );

    let booking = BookingClient::new(
        Arc::new(payments),
        suppliers,
        Arc::new(notifier),
        Arc::new(InMemoryBookingLedger::new()),
        BookingSettings {
            call_timeout: config.payment.timeout(),
            email_subject: config.email.confirmation_subject.clone(),
            agency_name: config.email.from_name.clone(),
        },
    );

    let memory: Arc<dyn CustomerMemory> = match (config.memory.backend, &config.memory.directory) {
        (MemoryBackend::File, Some(directory)) => {
            tracing::info!(directory = %directory.display(), "Using file customer memory");
            Arc::new(FileCustomerMemory::new(directory))
        }
        _ => Arc::new(InMemoryCustomerMemory::new()),
    };

    Ok(WorkflowController::new(
        WorkflowDependencies {
            engine: Arc::new(engine),
            search: Arc::new(search),
            booking: Arc::new(booking),
            memory,
            classifier: Arc::new(KeywordIntentClassifier::new()),
        },
        WorkflowSettings {
            max_turns: config.workflow.max_turns,
            step_timeout: config.workflow.step_timeout(),
        },
    ))
}

fn with_middleware(router: Router, config: &AppConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = if origins.is_empty() && !config.is_production() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    router
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
