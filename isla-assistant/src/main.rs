//! `isla` - console front-end for the Tenerife tourist assistant.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use isla_assistant::prompt::load_system_prompt;
use isla_assistant::{AssistantConfig, Console, ConversationEngine, logging};
use isla_model::OpenAIClient;
use isla_rag::{
    DocumentLoader, EmbeddingProvider, InMemoryVectorStore, MockEmbeddingProvider,
    OpenAIEmbeddingProvider, VectorIndex,
};
use isla_weather::WeatherService;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "isla", version, about = "Asistente turístico de Tenerife basado en la guía oficial")]
struct Args {
    /// Guide to index (PDF or plain text); overrides ISLA_DOCUMENT
    #[arg(long)]
    document: Option<PathBuf>,

    /// Directory for the persisted index; overrides ISLA_INDEX_DIR
    #[arg(long)]
    index_dir: Option<PathBuf>,

    /// Rebuild the index even if a snapshot exists
    #[arg(long)]
    rebuild: bool,

    /// Number of guide chunks retrieved per question; overrides ISLA_TOP_K
    #[arg(long)]
    top_k: Option<usize>,

    /// Use local hashed embeddings instead of the embeddings API
    #[arg(long)]
    offline: bool,

    /// Check the connection to the completion API and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let log_file = std::env::var_os(logging::LOG_FILE_ENV).map(PathBuf::from);
    logging::init(log_file.as_deref())?;

    let args = Args::parse();
    let config = configure(&args)?;

    let llm = Arc::new(OpenAIClient::new(config.openai_config()).context("failed to create completion client")?);
    if args.check {
        let ok = llm.test_connection().await;
        println!("{}: {}", config.model, if ok { "OK" } else { "FAILED" });
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let document_path = config.document_path.clone();
    let (pages, stats) = tokio::task::spawn_blocking(move || {
        let mut loader = DocumentLoader::new(&document_path)?;
        let stats = loader.stats()?;
        Ok::<_, isla_rag::RagError>((loader.pages()?.to_vec(), stats))
    })
    .await
    .context("document loading task panicked")?
    .context("failed to load the guide")?;
    info!(pages = stats.num_pages, words = stats.total_words, "guide loaded");

    let embedder: Arc<dyn EmbeddingProvider> = if args.offline {
        Arc::new(MockEmbeddingProvider::new())
    } else {
        Arc::new(OpenAIEmbeddingProvider::new(&config.api_key)?.with_timeout(config.request_timeout))
    };
    let index = Arc::new(VectorIndex::new(
        config.index_config()?,
        embedder,
        Arc::new(InMemoryVectorStore::new()),
    ));

    let chunks = if args.rebuild {
        index.build(&pages).await?
    } else {
        match index.load_existing().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "no usable index snapshot, building a new one");
                index.build(&pages).await?
            }
        }
    };
    info!(chunks, "index ready");

    let weather = WeatherService::new(
        config.weather_mode.clone(),
        config.weather_max_days,
        config.request_timeout,
    )?;
    let prompt = load_system_prompt(config.system_prompt_path.as_deref())?;

    let engine = ConversationEngine::new(
        llm,
        index,
        prompt,
        config.generation_config(),
        config.max_history_turns,
    )
    .with_tool(Arc::new(weather));

    Console::new(Arc::new(engine), stats, config.top_k).run().await?;
    Ok(ExitCode::SUCCESS)
}

/// Environment settings with command-line overrides applied.
fn configure(args: &Args) -> Result<AssistantConfig> {
    let mut builder = AssistantConfig::from_env().context("invalid configuration")?.into_builder();
    if let Some(document) = &args.document {
        builder = builder.document_path(document);
    }
    if let Some(dir) = &args.index_dir {
        builder = builder.persist_dir(dir);
    }
    if let Some(k) = args.top_k {
        builder = builder.top_k(k);
    }
    Ok(builder.build()?)
}
