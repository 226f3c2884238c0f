mod cache;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod rate_limit;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use courtside_availability::{Clock, Policy, SystemClock};
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cache::AvailabilityCache;
use config::Config;
use rate_limit::{rate_limit_booking, rate_limit_public, RateLimitConfig, RateLimiter};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub policy: Policy,
    pub clock: Arc<dyn Clock>,
    pub cache: AvailabilityCache,
    pub started_at: Instant,
}

/// Rate limit and cache cleanup interval (seconds).
const CLEANUP_INTERVAL_SECS: u64 = 300;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::from_default_env().add_directive("info".parse()?);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        blocking = ?config.blocking,
        closed_hours = config.closed_hours.len(),
        utc_offset_hours = config.utc_offset_hours,
        "Configuration loaded"
    );

    // ── Database ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    db::run_migrations(&pool).await?;
    if config.seed_demo_data {
        db::seed_demo_courts(&pool).await?;
    }

    let state = Arc::new(AppState {
        db: pool,
        policy: config.policy(),
        clock: Arc::new(SystemClock::with_utc_offset_hours(config.utc_offset_hours)?),
        cache: AvailabilityCache::new(config.cache_ttl),
        started_at: Instant::now(),
    });

    let rate_limiter = RateLimiter::new(
        RateLimitConfig {
            max_requests: 60,
            window: Duration::from_secs(60),
        },
        RateLimitConfig {
            max_requests: 5,
            window: Duration::from_secs(300),
        },
    );

    // ── Background task: drop stale rate limit entries and cached boards ──
    let cleanup_limiter = rate_limiter.clone();
    let cleanup_cache = state.cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup();
            cleanup_cache.cleanup();
        }
    });

    // ── CORS: whitelist WEBAPP_URL when configured, otherwise allow any ──
    let cors = match &config.webapp_url {
        Some(url) => {
            let origin: axum::http::HeaderValue = url.parse()?;
            CorsLayer::new()
                .allow_origin(AllowOrigin::list([origin]))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = router(state, rate_limiter)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.bind_addr();
    tracing::info!("Courtside server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// All routes, grouped by rate limit tier.
pub fn router(state: Arc<AppState>, rate_limiter: RateLimiter) -> Router {
    let no_limit_routes = Router::new().route("/api/health", get(handlers::health::health));

    let public_routes = Router::new()
        .route("/api/courts", get(handlers::courts::list_courts))
        .route("/api/courts/{id}/slots", get(handlers::courts::day_slots))
        .route("/api/courts/{id}/dates", get(handlers::courts::booking_dates))
        .route("/api/quote", post(handlers::bookings::quote))
        .layer(from_fn_with_state(rate_limiter.clone(), rate_limit_public));

    let booking_routes = Router::new()
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .layer(from_fn_with_state(rate_limiter, rate_limit_booking));

    Router::new()
        .merge(no_limit_routes)
        .merge(public_routes)
        .merge(booking_routes)
        .with_state(state)
}
