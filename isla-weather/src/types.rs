use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Location used when the model does not name one.
pub const DEFAULT_LOCATION: &str = "Tenerife";

/// Arguments of the `get_weather` tool as produced by the model.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherArgs {
    /// Fecha del pronóstico en formato YYYY-MM-DD, o una expresión relativa como "hoy", "mañana" o "fin de semana"
    pub date: String,
    /// Ubicación en Tenerife (opcional, por defecto: Tenerife)
    #[serde(default)]
    pub location: Option<String>,
}

impl WeatherArgs {
    /// JSON Schema of the arguments object, without the root metadata keys.
    pub fn schema() -> Value {
        let mut schema =
            serde_json::to_value(schemars::schema_for!(WeatherArgs)).unwrap_or_else(|_| Value::Null);
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
            object.remove("title");
        }
        schema
    }
}

/// A validated forecast request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub date: NaiveDate,
    pub location: String,
}

/// A single-day forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub date: NaiveDate,
    pub location: String,
    /// °C
    pub temperature_high: i32,
    /// °C
    pub temperature_low: i32,
    pub condition: String,
    /// Percent.
    pub humidity: u32,
    /// km/h
    pub wind_speed: u32,
    pub recommendation: String,
    pub simulated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_date_only() {
        let schema = WeatherArgs::schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["date"].is_object());
        assert!(schema["properties"]["location"].is_object());
        assert_eq!(schema["required"], serde_json::json!(["date"]));
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn response_serializes_iso_date() {
        let response = WeatherResponse {
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            location: DEFAULT_LOCATION.into(),
            temperature_high: 24,
            temperature_low: 18,
            condition: "Soleado".into(),
            humidity: 60,
            wind_speed: 12,
            recommendation: "Playa".into(),
            simulated: true,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["date"], "2026-10-20");
        assert_eq!(value["simulated"], true);
    }
}
