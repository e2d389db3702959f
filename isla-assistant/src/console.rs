//! Interactive console.

use std::sync::Arc;

use isla_core::Role;
use isla_rag::DocumentStats;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::error;

use crate::engine::{ConversationEngine, QueryResult};
use crate::error::{AssistantError, Result};

const PROMPT: &str = "tú > ";

const HELP: &str = "\
Comandos:
  /clear    borra el historial de la conversación
  /history  muestra el historial
  /stats    estadísticas del documento y del índice
  /help     esta ayuda
  /exit     salir";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Clear,
    History,
    Stats,
    Help,
    Exit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if !line.starts_with('/') {
            return Command::Ask(line.to_string());
        }
        match line.to_lowercase().as_str() {
            "/clear" => Command::Clear,
            "/history" => Command::History,
            "/stats" => Command::Stats,
            "/help" => Command::Help,
            "/exit" | "/quit" | "/salir" => Command::Exit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Render an answer with its cited pages.
pub fn render_answer(result: &QueryResult) -> String {
    let mut out = format!("isla > {}", result.answer);

    let mut pages: Vec<usize> = result.sources.iter().filter_map(|s| s.page).collect();
    pages.sort_unstable();
    pages.dedup();
    if !pages.is_empty() {
        let pages: Vec<String> = pages.iter().map(ToString::to_string).collect();
        out.push_str(&format!("\n       Fuentes: página {}", pages.join(", ")));
    }
    if result.tool_called {
        out.push_str("\n       (pronóstico del tiempo consultado)");
    }
    out
}

/// A read-eval-print loop over a [`ConversationEngine`].
pub struct Console {
    engine: Arc<ConversationEngine>,
    document: DocumentStats,
    top_k: usize,
}

impl Console {
    pub fn new(engine: Arc<ConversationEngine>, document: DocumentStats, top_k: usize) -> Self {
        Self { engine, document, top_k }
    }

    pub async fn run(&self) -> Result<()> {
        let mut rl = DefaultEditor::new()
            .map_err(|e| AssistantError::Initialization(format!("failed to init rustyline: {e}")))?;

        println!("🌋 Asistente turístico de Tenerife. Escribe /help para ver los comandos.");

        loop {
            let line = match rl.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    return Err(AssistantError::Initialization(format!("readline error: {e}")));
                }
            };
            let _ = rl.add_history_entry(line.as_str());

            match Command::parse(&line) {
                Command::Empty => {}
                Command::Exit => break,
                Command::Help => println!("{HELP}"),
                Command::Clear => {
                    self.engine.clear_history().await;
                    println!("Historial borrado.");
                }
                Command::History => self.print_history().await,
                Command::Stats => self.print_stats().await,
                Command::Unknown(cmd) => println!("Comando desconocido: {cmd}. Escribe /help."),
                Command::Ask(question) => match self.engine.query(&question, self.top_k).await {
                    Ok(result) => println!("{}\n", render_answer(&result)),
                    Err(e) => {
                        error!(error = %e, "query failed");
                        println!("Lo siento, no he podido responder ahora mismo: {e}\n");
                    }
                },
            }
        }

        println!("¡Hasta pronto!");
        Ok(())
    }

    async fn print_history(&self) {
        let turns = self.engine.history().await;
        if turns.is_empty() {
            println!("El historial está vacío.");
            return;
        }
        for turn in turns {
            let who = if turn.role == Role::User { "tú" } else { "isla" };
            println!("[{who}] {}", turn.content);
        }
    }

    async fn print_stats(&self) {
        let chunks = self.engine.index().chunk_stats().await;
        println!(
            "Documento: {} páginas, {} palabras, {} caracteres ({} por página)",
            self.document.num_pages,
            self.document.total_words,
            self.document.total_chars,
            self.document.avg_chars_per_page
        );
        println!(
            "Índice: {} fragmentos (tamaño medio {}, mín {}, máx {})",
            chunks.num_chunks, chunks.avg_chunk_size, chunks.min_chunk_size, chunks.max_chunk_size
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SourceExcerpt;

    #[test]
    fn parses_commands_and_questions() {
        assert_eq!(Command::parse("  /CLEAR "), Command::Clear);
        assert_eq!(Command::parse("/salir"), Command::Exit);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("¿Dónde está el Teide?"), Command::Ask("¿Dónde está el Teide?".into()));
        assert_eq!(Command::parse("/foo"), Command::Unknown("/foo".into()));
    }

    #[test]
    fn answer_lists_unique_pages_and_tool_flag() {
        let source = |page| SourceExcerpt { chunk_id: "guide_0".into(), page, text: String::new(), score: 0.5 };
        let result = QueryResult {
            answer: "Sube en teleférico.".into(),
            sources: vec![source(Some(12)), source(Some(3)), source(Some(12)), source(None)],
            tool_called: true,
        };
        let rendered = render_answer(&result);
        assert!(rendered.contains("Fuentes: página 3, 12"));
        assert!(rendered.contains("pronóstico"));
    }
}
