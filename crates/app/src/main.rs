use chrono::Utc;
use clap::{Parser, Subcommand};
use pdf_rag_core::{
    build_provider, ingest_pdf, run_chat, LopdfExtractor, PgVectorStore, SearchError,
    SearchPipeline, Settings,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-rag", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding `.env`; a relative PDF_PATH is resolved against it.
    #[arg(long, env = "RAG_PROJECT_ROOT", global = true)]
    project_root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Load PDF_PATH, split it into chunks and store their embeddings in pgvector.
    Ingest,
    /// Ask one question and print the prompt that would be sent to the LLM.
    Search,
    /// Interactive question loop answered by the configured LLM.
    Chat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let project_root = match cli.project_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let settings = Settings::from_env(&project_root)?;
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        provider = %settings.provider(),
        collection = settings.collection_name(),
        "pdf-rag boot"
    );

    match cli.command {
        Command::Ingest => ingest(&settings).await,
        Command::Search => search(&settings).await,
        Command::Chat => chat(&settings).await,
    }
}

async fn ingest(settings: &Settings) -> anyhow::Result<()> {
    let pdf_path = settings.existing_pdf_path()?;

    println!("== Ingestão do PDF ==");
    println!("PDF: {}", pdf_path.display());
    println!("Provider: {}", settings.provider());
    println!("Embedding model: {}", settings.embedding_model());
    println!("Collection: {}", settings.collection_name());

    let provider = build_provider(settings)?;
    let store = PgVectorStore::connect(settings.database_url(), settings.collection_name()).await?;
    let report = ingest_pdf(pdf_path, &LopdfExtractor, provider.as_ref(), &store).await?;

    println!("Páginas carregadas: {}", report.pages);
    println!("Chunks gerados: {}", report.chunks);
    info!(
        document_id = %report.document_id,
        chunks = report.chunks,
        "ingestion finished"
    );
    println!("*** Ingestão finalizada com sucesso! Vetores armazenados no Postgres/pgvector. ***");
    Ok(())
}

async fn search(settings: &Settings) -> anyhow::Result<()> {
    print!("PERGUNTA: ");
    io::stdout().flush()?;
    let mut question = String::new();
    io::stdin().lock().read_line(&mut question)?;

    let question = question.trim();
    if question.is_empty() {
        return Err(SearchError::EmptyQuery.into());
    }

    let provider = build_provider(settings)?;
    let store = PgVectorStore::connect(settings.database_url(), settings.collection_name()).await?;
    let pipeline = SearchPipeline::new(provider.as_ref(), &store);

    let prompt = pipeline.search_prompt(question).await?;
    println!("\n=== PROMPT GERADO (para enviar à LLM) ===\n");
    println!("{prompt}");
    Ok(())
}

async fn chat(settings: &Settings) -> anyhow::Result<()> {
    let provider = build_provider(settings)?;
    let store = PgVectorStore::connect(settings.database_url(), settings.collection_name()).await?;
    let pipeline = SearchPipeline::new(provider.as_ref(), &store);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let answered = run_chat(stdin.lock(), &mut stdout, &pipeline, provider.as_ref()).await?;

    info!(answered, "chat finished");
    Ok(())
}
