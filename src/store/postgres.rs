use std::future::Future;

use sqlx::PgPool;
use tracing::debug;

use super::{NeolightStore, StoreError};
use crate::db::models::{NeolightPatch, NeolightRecord};

const SELECT_BY_NAME: &str = r#"
    SELECT id, name, current_mode, app_control_duration, base_brightness,
           motion_brightness, led1_working, led2_working, led3_working,
           current_power, total_energy, time, weather, sunrise, sunset, date
    FROM neolights
    WHERE name = $1
    ORDER BY created_at ASC
    LIMIT 1
"#;

// Single-statement find-or-create. COALESCE keeps the stored value for every
// column the patch leaves NULL.
const UPSERT_BY_NAME: &str = r#"
    INSERT INTO neolights (
        name, current_mode, app_control_duration, base_brightness,
        motion_brightness, led1_working, led2_working, led3_working,
        current_power, total_energy, time, weather, sunrise, sunset, date
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
    ON CONFLICT (name) DO UPDATE SET
        current_mode         = COALESCE(EXCLUDED.current_mode,         neolights.current_mode),
        app_control_duration = COALESCE(EXCLUDED.app_control_duration, neolights.app_control_duration),
        base_brightness      = COALESCE(EXCLUDED.base_brightness,      neolights.base_brightness),
        motion_brightness    = COALESCE(EXCLUDED.motion_brightness,    neolights.motion_brightness),
        led1_working         = COALESCE(EXCLUDED.led1_working,         neolights.led1_working),
        led2_working         = COALESCE(EXCLUDED.led2_working,         neolights.led2_working),
        led3_working         = COALESCE(EXCLUDED.led3_working,         neolights.led3_working),
        current_power        = COALESCE(EXCLUDED.current_power,        neolights.current_power),
        total_energy         = COALESCE(EXCLUDED.total_energy,         neolights.total_energy),
        time                 = COALESCE(EXCLUDED.time,                 neolights.time),
        weather              = COALESCE(EXCLUDED.weather,              neolights.weather),
        sunrise              = COALESCE(EXCLUDED.sunrise,              neolights.sunrise),
        sunset               = COALESCE(EXCLUDED.sunset,               neolights.sunset),
        date                 = COALESCE(EXCLUDED.date,                 neolights.date),
        updated_at           = now()
    RETURNING id, name, current_mode, app_control_duration, base_brightness,
              motion_brightness, led1_working, led2_working, led3_working,
              current_power, total_energy, time, weather, sunrise, sunset, date
"#;

/// Postgres-backed store over the `neolights` table.
#[derive(Debug, Clone)]
pub struct PgNeolightStore {
    pool: PgPool,
}

impl PgNeolightStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NeolightStore for PgNeolightStore {
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<NeolightRecord>, StoreError>> + Send {
        async move {
            debug!(name = %name, "Fetching neolight record");
            let row = sqlx::query_as::<_, NeolightRecord>(SELECT_BY_NAME)
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }
    }

    fn upsert_by_name(
        &self,
        name: &str,
        patch: NeolightPatch,
    ) -> impl Future<Output = Result<NeolightRecord, StoreError>> + Send {
        async move {
            debug!(name = %name, "Upserting neolight record");
            let row = sqlx::query_as::<_, NeolightRecord>(UPSERT_BY_NAME)
                .bind(name)
                .bind(patch.current_mode)
                .bind(patch.app_control_duration)
                .bind(patch.base_brightness)
                .bind(patch.motion_brightness)
                .bind(patch.led1_working)
                .bind(patch.led2_working)
                .bind(patch.led3_working)
                .bind(patch.current_power)
                .bind(patch.total_energy)
                .bind(patch.time)
                .bind(patch.weather)
                .bind(patch.sunrise)
                .bind(patch.sunset)
                .bind(patch.date)
                .fetch_one(&self.pool)
                .await?;
            Ok(row)
        }
    }
}
