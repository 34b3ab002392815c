//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{GoogleSearchAdapter, MarkdownDeckExporter, OpenAiLessonAdapter, UnsplashAdapter},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use lesson_planner_core::LessonWorkflow;
use std::{sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let mut openai_config = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());
    if let Some(api_base) = &config.llm_api_base {
        info!("Using text generation endpoint {}", api_base);
        openai_config = openai_config.with_api_base(api_base.clone());
    }
    let lesson_adapter = Arc::new(OpenAiLessonAdapter::new(
        Client::with_config(openai_config),
        config.llm_model.clone(),
    ));

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    if config.unsplash_access_key.is_none() {
        warn!("UNSPLASH_ACCESS_KEY is not set; lessons will have no images");
    }
    let image_adapter = Arc::new(UnsplashAdapter::new(
        http.clone(),
        config.unsplash_access_key.clone(),
    ));
    if config.google_api_key.is_none() || config.search_engine_id.is_none() {
        warn!("GOOGLE_API_KEY or SEARCH_ENGINE_ID is not set; lessons will have no references");
    }
    let search_adapter = Arc::new(GoogleSearchAdapter::new(
        http,
        config.google_api_key.clone(),
        config.search_engine_id.clone(),
    ));

    // --- 3. Build the Workflow and Shared AppState ---
    let workflow = LessonWorkflow::new(
        lesson_adapter.clone(),
        lesson_adapter,
        image_adapter,
        search_adapter,
        Arc::new(MarkdownDeckExporter::new()),
    );
    let app_state = Arc::new(AppState::new(workflow));

    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS_ORIGIN '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .expose_headers([CONTENT_DISPOSITION]);

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(web::router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
