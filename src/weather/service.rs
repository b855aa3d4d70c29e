use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use tokio::time;
use tracing::{error, info, warn};

use super::{models::CurrentWeather, WeatherClient};
use crate::{
    config::WeatherConfig,
    db::models::{NeolightPatch, NeolightRecord},
    store::NeolightStore,
};

/// Periodically writes local date/time and the current weather into one
/// device record.
pub struct WeatherSync<S> {
    store: Arc<S>,
    client: WeatherClient,
    device_name: String,
    interval: Duration,
    utc_offset: FixedOffset,
}

impl<S: NeolightStore> WeatherSync<S> {
    pub fn new(store: Arc<S>, client: WeatherClient, config: &WeatherConfig) -> Self {
        Self {
            store,
            client,
            device_name: config.device_name.clone(),
            interval: Duration::from_secs(config.interval_secs),
            utc_offset: config.utc_offset,
        }
    }

    /// Runs the sync loop indefinitely.
    /// Spawn this via `tokio::spawn`.
    pub async fn run(self) {
        info!(
            device_name = %self.device_name,
            interval_secs = self.interval.as_secs(),
            "Weather sync loop started"
        );
        let mut ticker = time::interval(self.interval);

        loop {
            ticker.tick().await;
            if let Err(e) = self.run_once().await {
                error!(device_name = %self.device_name, error = %e, "Weather sync iteration failed");
            }
        }
    }

    async fn run_once(&self) -> Result<()> {
        let weather = match self.client.current().await {
            Ok(w) => w,
            Err(e) => {
                warn!(error = %e, "Skipping update due to weather fetch error");
                return Ok(());
            }
        };

        self.record(&weather, Utc::now()).await?;
        Ok(())
    }

    /// Upsert the clock and weather fields derived from `weather` at `now`.
    async fn record(&self, weather: &CurrentWeather, now: DateTime<Utc>) -> Result<NeolightRecord> {
        let patch = weather_patch(weather, now, self.utc_offset)?;
        let record = self
            .store
            .upsert_by_name(&self.device_name, patch)
            .await
            .context("Failed to store weather update")?;

        info!(
            device_name = %record.name,
            time = record.time.as_deref().unwrap_or_default(),
            "Weather and clock fields updated"
        );
        Ok(record)
    }
}

/// Build the patch written by the sync.
///
/// | Field     | Source                         | Format       |
/// |-----------|--------------------------------|--------------|
/// | `date`    | `now` in `offset`              | `DD-MM-YYYY` |
/// | `time`    | `now` in `offset`              | `HH:MM:SS`   |
/// | `weather` | first condition, lower-cased   | e.g. `clear` |
/// | `sunrise` | `sys.sunrise` in `offset`      | `HH:MM:SS`   |
/// | `sunset`  | `sys.sunset` in `offset`       | `HH:MM:SS`   |
pub fn weather_patch(
    weather: &CurrentWeather,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<NeolightPatch> {
    let local_now = now.with_timezone(&offset);

    Ok(NeolightPatch {
        date: Some(local_now.format("%d-%m-%Y").to_string()),
        time: Some(local_now.format("%H:%M:%S").to_string()),
        weather: weather.condition(),
        sunrise: Some(clock_time(weather.sys.sunrise, offset)?),
        sunset: Some(clock_time(weather.sys.sunset, offset)?),
        ..Default::default()
    })
}

fn clock_time(unix_secs: i64, offset: FixedOffset) -> Result<String> {
    let at = DateTime::from_timestamp(unix_secs, 0)
        .with_context(|| format!("timestamp out of range: {unix_secs}"))?;
    Ok(at.with_timezone(&offset).format("%H:%M:%S").to_string())
}
