use serde_json::{Value, json};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeatherError>;

/// Why a forecast could not be produced.
///
/// Messages are user facing (Spanish) because they are handed to the model
/// verbatim as tool output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeatherError {
    #[error("Formato de fecha inválido: '{0}'. Usar YYYY-MM-DD o expresiones como 'mañana'.")]
    InvalidFormat(String),

    #[error("Error al procesar la solicitud del tiempo: {0}")]
    InvalidArguments(String),

    #[error("Solo puedo proporcionar pronósticos hasta {max_days} días en el futuro.")]
    TooFar { max_days: u32 },

    #[error("No puedo proporcionar el tiempo para fechas pasadas.")]
    InPast,

    #[error("Error al obtener el pronóstico del tiempo: {0}")]
    Unavailable(String),

    #[error("weather configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// Stable machine-readable kind reported in tool results.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::InvalidFormat(_) | WeatherError::InvalidArguments(_) => "invalid-format",
            WeatherError::TooFar { .. } => "too-far",
            WeatherError::InPast => "in-past",
            WeatherError::Unavailable(_) => "unavailable",
            WeatherError::Config(_) => "config",
        }
    }

    /// The `{ error, kind, message }` object returned to the model.
    pub fn to_value(&self) -> Value {
        json!({ "error": true, "kind": self.kind(), "message": self.to_string() })
    }
}
