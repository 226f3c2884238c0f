use std::time::Duration;

use anyhow::Context;
use courtside_availability::{BlockingPolicy, HourSet, Policy, SlotTime};

/// Default venue offset from UTC (hours).
const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;
/// Default lifetime of a cached day board (seconds).
const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Server settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub utc_offset_hours: i32,
    pub closed_hours: HourSet,
    pub blocking: BlockingPolicy,
    pub cache_ttl: Duration,
    pub webapp_url: Option<String>,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").unwrap_or_else(|| "sqlite:courtside.db?mode=rwc".into());
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("PORT") {
            Some(p) => p.parse().with_context(|| format!("PORT must be a number, got {:?}", p))?,
            None => 3000,
        };
        let utc_offset_hours = match get("UTC_OFFSET_HOURS") {
            Some(h) => h
                .parse()
                .with_context(|| format!("UTC_OFFSET_HOURS must be a number, got {:?}", h))?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let closed_hours = match get("CLOSED_HOURS") {
            Some(raw) => parse_closed_hours(&raw)?,
            None => Policy::default().closed_hours,
        };
        let blocking = match get("BLOCKING_STATUSES") {
            Some(raw) => raw.parse()?,
            None => BlockingPolicy::default(),
        };
        let cache_ttl = match get("CACHE_TTL_SECS") {
            Some(s) => Duration::from_secs(
                s.parse()
                    .with_context(|| format!("CACHE_TTL_SECS must be a number, got {:?}", s))?,
            ),
            None => Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        };
        let webapp_url = get("WEBAPP_URL").filter(|u| !u.trim().is_empty());
        let seed_demo_data = get("SEED_DEMO_DATA")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            host,
            port,
            utc_offset_hours,
            closed_hours,
            blocking,
            cache_ttl,
            webapp_url,
            seed_demo_data,
        })
    }

    pub fn policy(&self) -> Policy {
        Policy {
            closed_hours: self.closed_hours,
            blocking: self.blocking,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `"12"`, `"12,13"`, `"12:00, 13:00"`; empty means no policy closures.
fn parse_closed_hours(raw: &str) -> anyhow::Result<HourSet> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let slot = match s.parse::<u8>() {
                Ok(hour) => SlotTime::from_hour(hour),
                Err(_) => s.parse::<SlotTime>(),
            };
            slot.with_context(|| format!("bad CLOSED_HOURS entry {:?}", s))
        })
        .collect()
}
