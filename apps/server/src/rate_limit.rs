use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::ApiResponse;

// ── Configuration ──

/// Sliding-window limit for one tier.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Read-only board, calendar and quote endpoints.
    Public,
    /// Booking writes.
    Booking,
}

impl Tier {
    fn name(self) -> &'static str {
        match self {
            Tier::Public => "public",
            Tier::Booking => "booking",
        }
    }
}

// ── Core Rate Limiter ──

#[derive(Debug)]
struct Bucket {
    config: RateLimitConfig,
    hits: DashMap<IpAddr, Vec<Instant>>,
}

impl Bucket {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            hits: DashMap::new(),
        }
    }
}

/// In-memory per-IP rate limiter, one sliding window per tier.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    public: Arc<Bucket>,
    booking: Arc<Bucket>,
}

impl RateLimiter {
    pub fn new(public: RateLimitConfig, booking: RateLimitConfig) -> Self {
        Self {
            public: Arc::new(Bucket::new(public)),
            booking: Arc::new(Bucket::new(booking)),
        }
    }

    fn bucket(&self, tier: Tier) -> &Bucket {
        match tier {
            Tier::Public => &self.public,
            Tier::Booking => &self.booking,
        }
    }

    /// `Ok(())` if allowed, `Err(retry_after_secs)` if limited.
    pub fn check(&self, tier: Tier, ip: IpAddr) -> Result<(), u64> {
        let bucket = self.bucket(tier);
        let now = Instant::now();
        let window = bucket.config.window;

        let mut entry = bucket.hits.entry(ip).or_insert_with(Vec::new);
        entry.retain(|t| now.duration_since(*t) < window);

        if entry.len() >= bucket.config.max_requests as usize {
            let oldest = entry[0];
            let retry_after = (oldest + window)
                .saturating_duration_since(now)
                .as_secs()
                .max(1);
            return Err(retry_after);
        }

        entry.push(now);
        Ok(())
    }

    /// Forget clients idle for longer than twice their window.
    pub fn cleanup(&self) {
        let now = Instant::now();
        for bucket in [&self.public, &self.booking] {
            let cutoff = bucket.config.window * 2;
            bucket.hits.retain(|_ip, stamps| {
                stamps.retain(|t| now.duration_since(*t) < cutoff);
                !stamps.is_empty()
            });
        }
    }
}

// ── IP Extraction ──

/// Client IP from `X-Forwarded-For` (reverse proxy) or the socket.
pub fn extract_client_ip(req: &Request) -> IpAddr {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn too_many_requests(retry_after: u64) -> Response {
    let body = ApiResponse::<()>::error(format!(
        "Too many requests. Try again in {} seconds",
        retry_after
    ));
    (
        StatusCode::TOO_MANY_REQUESTS,
        [("Retry-After", retry_after.to_string())],
        Json(body),
    )
        .into_response()
}

async fn limit(limiter: &RateLimiter, tier: Tier, req: Request, next: Next) -> Result<Response, Response> {
    let ip = extract_client_ip(&req);
    limiter.check(tier, ip).map_err(|retry_after| {
        tracing::warn!(tier = tier.name(), %ip, retry_after, "rate limited");
        too_many_requests(retry_after)
    })?;
    Ok(next.run(req).await)
}

pub async fn rate_limit_public(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    limit(&limiter, Tier::Public, req, next).await
}

pub async fn rate_limit_booking(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    limit(&limiter, Tier::Booking, req, next).await
}
