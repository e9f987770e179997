use audioscribe_backend::config::AppConfig;
use audioscribe_backend::services::staging::StagingArea;
use audioscribe_backend::services::store::TranscriptionStore;
use audioscribe_backend::services::transcriber::GeminiTranscriber;
use audioscribe_backend::services::transcription::TranscriptionService;
use audioscribe_backend::{AppState, create_app};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing with EnvFilter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audioscribe_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting AudioScribe Backend...");

    let config = AppConfig::from_env();
    info!(
        "🎙️  Store: {}, Max Upload: {}MB, Model: {}",
        config.store_dir.display(),
        config.max_file_size / 1024 / 1024,
        config.gemini_model
    );

    // Missing credentials are fatal here: no key means no calls are possible
    let transcriber = Arc::new(GeminiTranscriber::from_config(&config)?);
    let store = Arc::new(TranscriptionStore::new(&config.store_dir)?);
    let staging = StagingArea::new(&config.staging_dir)?;
    let transcriptions = Arc::new(TranscriptionService::new(
        transcriber,
        store.clone(),
        staging,
        config.max_file_size,
    ));

    let state = AppState {
        transcriptions,
        store,
        config: config.clone(),
    };

    let app = create_app(state).layer(
        TraceLayer::new_for_http()
            .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                info!("📥 {} {}", request.method(), request.uri());
            })
            .on_response(
                |response: &axum::http::Response<_>,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    info!(
                        "📤 Finished in {:?} with status {}",
                        latency,
                        response.status()
                    );
                },
            ),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("✅ Server ready at http://{}", addr);
    info!("📖 Swagger UI: http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
