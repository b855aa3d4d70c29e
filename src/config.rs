use std::{net::SocketAddr, num::NonZeroU64};

use anyhow::{Context, Result};
use chrono::FixedOffset;

// ---------------------------------------------------------------------------
// WeatherConfig
// ---------------------------------------------------------------------------

/// Settings for the periodic weather/clock sync. Only present when
/// `OPENWEATHER_API_KEY` is set.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub city: String,
    pub country: String,
    /// Name of the record the sync writes into.
    pub device_name: String,
    pub interval_secs: u64,
    /// Local clock used for `date`, `time`, `sunrise` and `sunset`.
    pub utc_offset: FixedOffset,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub server_bind: String,
    pub port: u16,
    /// Host shown in the startup log line. Not used for binding.
    pub public_host: String,
    /// `true` when `APP_ENV=production`; only switches the logged scheme to https.
    pub production: bool,
    pub weather: Option<WeatherConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env(lookup);

        let weather = match env.get("OPENWEATHER_API_KEY") {
            Some(api_key) if !api_key.trim().is_empty() => Some(WeatherConfig {
                api_key,
                base_url: env
                    .optional("OPENWEATHER_BASE_URL", "http://api.openweathermap.org")
                    .trim_end_matches('/')
                    .to_owned(),
                city: env.optional("WEATHER_CITY", "New Delhi"),
                country: env.optional("WEATHER_COUNTRY", "IN"),
                device_name: env.optional("WEATHER_DEVICE_NAME", "neo"),
                interval_secs: env
                    .optional("WEATHER_INTERVAL_SECS", "60")
                    .parse::<NonZeroU64>()
                    .context("WEATHER_INTERVAL_SECS must be a positive integer")?
                    .get(),
                utc_offset: parse_utc_offset(&env.optional("WEATHER_UTC_OFFSET_MINUTES", "330"))?,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: env.required("DATABASE_URL")?,
            db_max_connections: env
                .optional("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            server_bind: env.optional("SERVER_BIND", "0.0.0.0"),
            port: env
                .optional("PORT", "3000")
                .parse()
                .context("PORT must be a valid port number")?,
            public_host: env.optional("HOST", "localhost"),
            production: env.get("APP_ENV").is_some_and(|v| v == "production"),
            weather,
        })
    }

    /// Human-readable URL for the startup log line.
    ///
    /// `localhost` on an IPv6 listener is rendered as `[::1]`.
    pub fn public_url(&self, local_addr: SocketAddr) -> String {
        let scheme = if self.production { "https" } else { "http" };
        let port = local_addr.port();

        if self.public_host == "localhost" && local_addr.is_ipv6() {
            format!("{scheme}://[::1]:{port}")
        } else {
            format!("{scheme}://{}:{port}", self.public_host)
        }
    }
}

/// Parse a signed minute offset from UTC, e.g. `330` for +05:30.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let minutes: i32 = raw
        .trim()
        .parse()
        .context("WEATHER_UTC_OFFSET_MINUTES must be an integer number of minutes")?;
    FixedOffset::east_opt(minutes * 60)
        .with_context(|| format!("WEATHER_UTC_OFFSET_MINUTES out of range: {minutes}"))
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .with_context(|| format!("missing required env var: {key}"))
    }

    fn optional(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_owned())
    }
}
