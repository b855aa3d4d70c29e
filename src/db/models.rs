use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Latest known state of one Neolight, keyed by `name`.
///
/// Every field except `id` and `name` is nullable: a record only carries the
/// fields that have been written to it so far, and absent fields are left out
/// of the JSON representation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NeolightRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_control_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion_brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led1_working: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led2_working: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led3_working: Option<bool>,
    /// Watts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_energy: Option<f64>,
    /// Local wall-clock time, `HH:MM:SS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
    /// Local date, `DD-MM-YYYY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Partial update for a [`NeolightRecord`].
///
/// `None` means "leave the stored value alone". JSON `null` and missing keys
/// both deserialize to `None`; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NeolightPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_control_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion_brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led1_working: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led2_working: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led3_working: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl NeolightRecord {
    /// A record with only `id` and `name` set.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            current_mode: None,
            app_control_duration: None,
            base_brightness: None,
            motion_brightness: None,
            led1_working: None,
            led2_working: None,
            led3_working: None,
            current_power: None,
            total_energy: None,
            time: None,
            weather: None,
            sunrise: None,
            sunset: None,
            date: None,
        }
    }

    /// Overwrite every field that is present in `patch`; leave the rest.
    pub fn apply(&mut self, patch: NeolightPatch) {
        fn set<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set(&mut self.current_mode, patch.current_mode);
        set(&mut self.app_control_duration, patch.app_control_duration);
        set(&mut self.base_brightness, patch.base_brightness);
        set(&mut self.motion_brightness, patch.motion_brightness);
        set(&mut self.led1_working, patch.led1_working);
        set(&mut self.led2_working, patch.led2_working);
        set(&mut self.led3_working, patch.led3_working);
        set(&mut self.current_power, patch.current_power);
        set(&mut self.total_energy, patch.total_energy);
        set(&mut self.time, patch.time);
        set(&mut self.weather, patch.weather);
        set(&mut self.sunrise, patch.sunrise);
        set(&mut self.sunset, patch.sunset);
        set(&mut self.date, patch.date);
    }
}
