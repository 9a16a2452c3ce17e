//! Yoake server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;
use yoake_api::{AppState, SseBroadcaster, auth_middleware, router as api_router};
use yoake_common::Config;
use yoake_core::{
    CollectionService, DriveService, EmojiService, FollowingMemberStore, MetaSettingsService,
    ModerationService, NoteService, UserService,
};
use yoake_db::repositories::{
    DriveFileRepository, EmojiRepository, FollowingRepository, MetaSettingsRepository,
    ModerationLogRepository, NoteRepository, UserProfileRepository, UserRepository,
};
use yoake_federation::{CollectionState, MetaFetchAuthorizer, UrlConfig, collection_routes};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Windows, only Ctrl+C is handled.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yoake=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting yoake server...");

    // Load configuration
    let config = Config::load()?;
    let base_url = Url::parse(&config.server.url)?;

    // Connect to database
    let db = yoake_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    yoake_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let following_repo = FollowingRepository::new(Arc::clone(&db));
    let note_repo = NoteRepository::new(Arc::clone(&db));
    let drive_file_repo = DriveFileRepository::new(Arc::clone(&db));
    let emoji_repo = EmojiRepository::new(Arc::clone(&db));
    let moderation_log_repo = ModerationLogRepository::new(Arc::clone(&db));
    let meta_settings_repo = MetaSettingsRepository::new(Arc::clone(&db));

    // Services
    let sse_broadcaster = SseBroadcaster::new();
    let meta_settings_service = MetaSettingsService::new(meta_settings_repo);
    let user_service = UserService::new(
        user_repo.clone(),
        profile_repo.clone(),
        following_repo.clone(),
        &config,
    );
    let note_service = NoteService::new(note_repo, user_repo.clone());
    let emoji_service = EmojiService::new(
        emoji_repo,
        DriveService::new(drive_file_repo),
        ModerationService::new(moderation_log_repo),
        Arc::new(sse_broadcaster.clone()),
    );

    let state = AppState {
        user_service,
        note_service,
        emoji_service,
        sse_broadcaster,
    };

    let api = api_router().layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    let mut app = Router::new().nest("/api", api).with_state(state);

    if config.federation.enabled {
        let collection_state = CollectionState {
            collection_service: CollectionService::new(
                user_repo,
                profile_repo,
                Arc::new(FollowingMemberStore::new(following_repo)),
            ),
            meta_service: meta_settings_service.clone(),
            authorizer: Arc::new(MetaFetchAuthorizer::new(meta_settings_service)),
            url_config: UrlConfig::new(&base_url),
        };
        app = app.merge(collection_routes(collection_state));
        info!(instance = %config.federation.instance_name, "ActivityPub collections enabled");
    }

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server with graceful shutdown
    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(ip, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
