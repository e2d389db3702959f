use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use isla_core::{Tool, ToolCall, ToolContext};
use serde_json::Value;
use tracing::{info, warn};

use crate::date::{resolve_date, validate_window};
use crate::error::{Result, WeatherError};
use crate::live::LiveWeatherClient;
use crate::simulated;
use crate::types::{DEFAULT_LOCATION, WeatherArgs, WeatherRequest, WeatherResponse};

pub const TOOL_NAME: &str = "get_weather";

const TOOL_DESCRIPTION: &str = "Obtiene el pronóstico del tiempo para una fecha específica en Tenerife. \
Usar cuando el usuario pregunte sobre el clima, tiempo, temperatura o condiciones meteorológicas.";

/// Where forecasts come from. Fixed for the lifetime of a [`WeatherService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherMode {
    Simulated { seed: u64 },
    Live { api_key: String },
}

enum Backend {
    Simulated { seed: u64 },
    Live(LiveWeatherClient),
}

/// The `get_weather` tool.
pub struct WeatherService {
    backend: Backend,
    max_days: u32,
}

impl WeatherService {
    /// Build the service. Live mode without an API key is a configuration error.
    pub fn new(mode: WeatherMode, max_days: u32, timeout: Duration) -> Result<Self> {
        let backend = match mode {
            WeatherMode::Simulated { seed } => Backend::Simulated { seed },
            WeatherMode::Live { api_key } if api_key.trim().is_empty() => {
                return Err(WeatherError::Config(
                    "live weather mode requires WEATHER_API_KEY".to_string(),
                ));
            }
            WeatherMode::Live { api_key } => Backend::Live(LiveWeatherClient::new(api_key, timeout)?),
        };

        info!(simulated = matches!(backend, Backend::Simulated { .. }), max_days, "weather service initialized");
        Ok(Self { backend, max_days })
    }

    /// A simulated service with the default seven-day window.
    pub fn simulated(seed: u64) -> Self {
        Self { backend: Backend::Simulated { seed }, max_days: 7 }
    }

    /// Point live mode at another base URL.
    pub fn with_live_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.backend = match self.backend {
            Backend::Live(client) => Backend::Live(client.with_base_url(base_url)),
            simulated => simulated,
        };
        self
    }

    /// Forecast for `date` (ISO or relative expression) anchored on the local date.
    ///
    /// Never fails: errors come back as `{ "error": true, "kind", "message" }`.
    pub async fn get_weather(&self, date: &str, location: Option<&str>) -> Value {
        self.get_weather_on(date, location, Local::now().date_naive()).await
    }

    /// Like [`get_weather`](Self::get_weather) with an explicit "today".
    pub async fn get_weather_on(&self, date: &str, location: Option<&str>, today: NaiveDate) -> Value {
        match self.forecast(date, location, today).await {
            Ok(response) => {
                info!(
                    date = %response.date,
                    location = %response.location,
                    condition = %response.condition,
                    temperature_high = response.temperature_high,
                    "weather forecast produced"
                );
                serde_json::to_value(response).unwrap_or_else(|e| {
                    WeatherError::Unavailable(e.to_string()).to_value()
                })
            }
            Err(e) => {
                warn!(date, kind = e.kind(), error = %e, "weather request rejected");
                e.to_value()
            }
        }
    }

    /// Typed forecast, for callers that want the error instead of a JSON value.
    pub async fn forecast(
        &self,
        date: &str,
        location: Option<&str>,
        today: NaiveDate,
    ) -> Result<WeatherResponse> {
        let request = self.request(date, location, today)?;
        match &self.backend {
            Backend::Simulated { seed } => Ok(simulated::forecast(*seed, &request)),
            Backend::Live(client) => client.forecast(&request, today).await,
        }
    }

    fn request(&self, date: &str, location: Option<&str>, today: NaiveDate) -> Result<WeatherRequest> {
        let date = resolve_date(date, today)?;
        validate_window(date, today, self.max_days)?;
        let location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();
        Ok(WeatherRequest { date, location })
    }

    /// Validate a model-issued call and run it, anchored on the local date.
    pub async fn parse_tool_call(&self, call: &ToolCall) -> Value {
        self.call_on(&call.arguments, Local::now().date_naive()).await
    }

    async fn call_on(&self, arguments: &str, today: NaiveDate) -> Value {
        match serde_json::from_str::<WeatherArgs>(arguments) {
            Ok(args) => self.get_weather_on(&args.date, args.location.as_deref(), today).await,
            Err(e) => {
                warn!(error = %e, "malformed weather arguments");
                WeatherError::InvalidArguments(e.to_string()).to_value()
            }
        }
    }
}

#[async_trait]
impl Tool for WeatherService {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    fn parameters_schema(&self) -> Value {
        WeatherArgs::schema()
    }

    async fn call(&self, ctx: &ToolContext, arguments: &str) -> Value {
        self.call_on(arguments, ctx.today).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn live_without_key_fails_at_construction() {
        let result = WeatherService::new(WeatherMode::Live { api_key: " ".into() }, 7, Duration::from_secs(5));
        assert!(matches!(result, Err(WeatherError::Config(_))));
    }

    #[tokio::test]
    async fn tomorrow_resolves_against_today() {
        let service = WeatherService::simulated(42);
        let value = service.get_weather_on("mañana", None, today()).await;
        assert_eq!(value["date"], (today() + Days::days(1)).to_string());
        assert_eq!(value["location"], "Tenerife");
        assert_eq!(value["simulated"], true);
    }

    #[tokio::test]
    async fn malformed_arguments_become_error_value() {
        let service = WeatherService::simulated(42);
        let value = service.call_on("{\"dat", today()).await;
        assert_eq!(value["error"], true);
        assert_eq!(value["kind"], "invalid-format");

        let value = service.call_on("{\"location\":\"Adeje\"}", today()).await;
        assert_eq!(value["kind"], "invalid-format");
    }

    #[tokio::test]
    async fn window_errors_are_values() {
        let service = WeatherService::simulated(42);
        let far = service.get_weather_on("en 10 días", None, today()).await;
        assert_eq!(far["kind"], "too-far");
        let past = service.get_weather_on("2026-10-01", None, today()).await;
        assert_eq!(past["kind"], "in-past");
    }

    #[test]
    fn declaration_uses_tool_name() {
        let declaration = WeatherService::simulated(1).declaration();
        assert_eq!(declaration.name, "get_weather");
        assert_eq!(declaration.parameters["required"], serde_json::json!(["date"]));
    }
}
