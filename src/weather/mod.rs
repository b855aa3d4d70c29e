pub mod models;
pub mod service;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use std::sync::Arc;
use tracing::debug;

use crate::config::WeatherConfig;

use self::models::CurrentWeather;

pub use service::WeatherSync;

/// Minimal OpenWeatherMap client for the current-weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
    api_key: String,
    city: String,
    country: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                city: config.city.clone(),
                country: config.country.clone(),
            }),
        }
    }

    /// Fetch current conditions for the configured city.
    pub async fn current(&self) -> Result<CurrentWeather> {
        let location = format!("{},{}", self.inner.city, self.inner.country);
        let url = Url::parse_with_params(
            &format!("{}/data/2.5/weather", self.inner.base_url),
            &[
                ("q", location.as_str()),
                ("appid", self.inner.api_key.as_str()),
                ("units", "metric"),
            ],
        )
        .context("Invalid weather API base URL")?;
        debug!(location = %location, "Requesting current weather");

        let weather = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .context("Weather request failed")?
            .error_for_status()
            .context("Weather endpoint returned error status")?
            .json::<CurrentWeather>()
            .await
            .context("Failed to deserialize weather response")?;

        Ok(weather)
    }
}
