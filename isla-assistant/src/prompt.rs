//! Prompt assembly.

use std::path::Path;

use chrono::NaiveDate;
use isla_rag::SearchResult;

use crate::error::{AssistantError, Result};

/// Built-in instructions for the guide persona.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Eres un asistente turístico experto en Tenerife. Respondes en el idioma del usuario, \
de forma clara, amable y concisa.

Reglas:
- Basa tus respuestas en el CONTEXTO extraído de la guía turística. Cita la página \
cuando sea útil, por ejemplo \"(página 12)\".
- Si el contexto no contiene la información, dilo con honestidad y no inventes datos.
- Para preguntas sobre el tiempo, la temperatura o el clima usa la herramienta get_weather. \
Convierte fechas relativas (\"mañana\", \"el fin de semana\") a la fecha correspondiente.
- Si la herramienta devuelve un error, explica al usuario el motivo con naturalidad.";

const SOURCE_SEPARATOR: &str = "\n\n---\n\n";

/// Shown to the model when retrieval found nothing relevant.
pub const EMPTY_CONTEXT_NOTICE: &str = "No se encontró información relevante en la guía para esta pregunta. \
Indica al usuario que la guía no cubre este tema.";

/// Load the system prompt from `path`, or fall back to [`DEFAULT_SYSTEM_PROMPT`].
pub fn load_system_prompt(path: Option<&Path>) -> Result<String> {
    match path {
        None => Ok(DEFAULT_SYSTEM_PROMPT.to_string()),
        Some(path) => std::fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(|e| {
                AssistantError::Config(format!("cannot read system prompt {}: {e}", path.display()))
            }),
    }
}

/// The system prompt with today's date appended, so relative dates can be resolved.
pub fn system_message(prompt: &str, today: NaiveDate) -> String {
    format!("{prompt}\n\nFecha actual: {} ({}).", today.format("%Y-%m-%d"), today.format("%A"))
}

/// Format retrieved chunks as the context block.
pub fn context_message(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("CONTEXTO:\n{EMPTY_CONTEXT_NOTICE}");
    }

    let parts: Vec<String> = results
        .iter()
        .map(|r| {
            let page = r.chunk.page().map_or_else(|| "N/A".to_string(), |p| p.to_string());
            format!("[Fuente: página {page}]\n{}", r.chunk.text)
        })
        .collect();
    format!("CONTEXTO:\n{}", parts.join(SOURCE_SEPARATOR))
}
