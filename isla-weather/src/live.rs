//! WeatherAPI.com forecast backend.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, WeatherError};
use crate::simulated::recommendation;
use crate::types::{WeatherRequest, WeatherResponse};

pub const WEATHERAPI_BASE: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    forecast: Forecast,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: NaiveDate,
    day: Day,
}

#[derive(Debug, Deserialize)]
struct Day {
    maxtemp_c: f64,
    mintemp_c: f64,
    avghumidity: f64,
    maxwind_kph: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for the `forecast.json` endpoint.
pub struct LiveWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl LiveWeatherClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_key: api_key.into(), base_url: WEATHERAPI_BASE.to_string() })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch enough forecast days to cover `request.date`.
    pub async fn forecast(&self, request: &WeatherRequest, today: NaiveDate) -> Result<WeatherResponse> {
        let days = (request.date - today).num_days().max(0) + 1;
        let days_param = days.to_string();
        let url = format!("{}/forecast.json", self.base_url);
        debug!(location = %request.location, days, "requesting live forecast");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", request.location.as_str()),
                ("days", days_param.as_str()),
                ("lang", "es"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| WeatherError::Unavailable(e.to_string()))?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(WeatherError::Unavailable(format!("WeatherAPI {status}: {message}")));
        }

        parse_forecast(&body, request)
    }
}

fn parse_forecast(body: &str, request: &WeatherRequest) -> Result<WeatherResponse> {
    let parsed: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::Unavailable(format!("unexpected forecast payload: {e}")))?;

    let day = parsed
        .forecast
        .forecastday
        .into_iter()
        .find(|d| d.date == request.date)
        .ok_or_else(|| {
            WeatherError::Unavailable(format!("no forecast returned for {}", request.date))
        })?;

    let advice = recommendation(classify(&day.day.condition.text, day.day.maxwind_kph));
    Ok(WeatherResponse {
        date: day.date,
        location: request.location.clone(),
        temperature_high: day.day.maxtemp_c.round() as i32,
        temperature_low: day.day.mintemp_c.round() as i32,
        condition: day.day.condition.text,
        humidity: day.day.avghumidity.round().max(0.0) as u32,
        wind_speed: day.day.maxwind_kph.round().max(0.0) as u32,
        recommendation: advice.to_string(),
        simulated: false,
    })
}

/// Map a free-form provider condition onto one of the known conditions.
fn classify(text: &str, wind_kph: f64) -> &'static str {
    let text = text.to_lowercase();
    if ["lluvi", "llovizna", "rain", "drizzle", "chubasco", "tormenta"].iter().any(|k| text.contains(k)) {
        "Lluvia ligera"
    } else if wind_kph >= 40.0 {
        "Ventoso"
    } else if text.contains("parcial") || text.contains("partly") {
        "Parcialmente nublado"
    } else if ["nublado", "cubierto", "niebla", "cloud", "overcast", "fog", "mist"].iter().any(|k| text.contains(k)) {
        "Nublado"
    } else {
        "Soleado"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> WeatherRequest {
        WeatherRequest { date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(), location: "Tenerife".into() }
    }

    const BODY: &str = r#"{
        "location": {"name": "Santa Cruz de Tenerife"},
        "forecast": {"forecastday": [
            {"date": "2026-10-19", "day": {"maxtemp_c": 25.0, "mintemp_c": 19.0, "avghumidity": 60, "maxwind_kph": 12.0, "condition": {"text": "Soleado"}}},
            {"date": "2026-10-20", "day": {"maxtemp_c": 23.6, "mintemp_c": 18.4, "avghumidity": 71, "maxwind_kph": 18.7, "condition": {"text": "Lluvia  moderada a intervalos"}}}
        ]}
    }"#;

    #[test]
    fn picks_requested_day() {
        let response = parse_forecast(BODY, &request()).unwrap();
        assert_eq!(response.temperature_high, 24);
        assert_eq!(response.temperature_low, 18);
        assert_eq!(response.humidity, 71);
        assert_eq!(response.wind_speed, 19);
        assert!(!response.simulated);
        assert_eq!(response.recommendation, recommendation("Lluvia ligera"));
    }

    #[test]
    fn missing_day_is_unavailable() {
        let mut other = request();
        other.date = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();
        assert!(matches!(parse_forecast(BODY, &other), Err(WeatherError::Unavailable(_))));
    }

    #[test]
    fn classification() {
        assert_eq!(classify("Parcialmente nublado", 10.0), "Parcialmente nublado");
        assert_eq!(classify("Cielo cubierto", 10.0), "Nublado");
        assert_eq!(classify("Despejado", 45.0), "Ventoso");
        assert_eq!(classify("Sunny", 5.0), "Soleado");
    }
}
