use serde::Deserialize;

// ---------------------------------------------------------------------------
// OpenWeatherMap "current weather" response
//
// Only the parts the sync uses are modelled:
//
//   {
//     "weather": [ { "id": 800, "main": "Clear", "description": "clear sky", ... } ],
//     "sys": { "sunrise": 1760576472, "sunset": 1760617897, ... },
//     "cod": 200,
//     ...
//   }
//
// `sunrise`/`sunset` are unix timestamps in seconds (UTC).
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub weather: Vec<Condition>,
    pub sys: Sun,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    /// Condition group, e.g. `"Clear"`, `"Clouds"`, `"Rain"`.
    pub main: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sun {
    pub sunrise: i64,
    pub sunset: i64,
}

impl CurrentWeather {
    /// Lower-cased condition group of the primary condition.
    pub fn condition(&self) -> Option<String> {
        self.weather.first().map(|c| c.main.to_lowercase())
    }
}
