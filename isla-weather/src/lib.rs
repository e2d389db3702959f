//! # isla-weather
//!
//! The `get_weather` tool offered to the model by the Isla assistant.
//!
//! ## Overview
//!
//! - [`WeatherService`] - implements [`isla_core::Tool`]; resolves dates, validates the forecast window
//! - [`WeatherMode`] - simulated (seeded, seasonal values for Tenerife) or live (WeatherAPI.com)
//! - [`resolve_date`] - ISO dates plus relative expressions in English and Spanish
//!
//! Failures never escape as errors from the tool: they are returned as
//! `{ "error": true, "kind": "...", "message": "..." }` so the model can explain
//! them to the user.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use isla_weather::{WeatherMode, WeatherService};
//!
//! let weather = WeatherService::new(WeatherMode::Simulated { seed: 42 }, 7, timeout)?;
//! let forecast = weather.get_weather("mañana", Some("Puerto de la Cruz")).await;
//! ```

pub mod date;
pub mod error;
pub mod live;
pub mod service;
pub mod simulated;
pub mod types;

pub use date::{resolve_date, validate_window};
pub use error::{Result, WeatherError};
pub use live::{LiveWeatherClient, WEATHERAPI_BASE};
pub use service::{TOOL_NAME, WeatherMode, WeatherService};
pub use types::{DEFAULT_LOCATION, WeatherArgs, WeatherRequest, WeatherResponse};
