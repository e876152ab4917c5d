pub mod chat;
pub mod chunking;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod search;
pub mod store;
pub mod stores;

pub use chat::{classify_input, run_chat, ChatInput, EXIT_KEYWORDS};
pub use chunking::{normalize_whitespace, split_pages, split_text, ChunkingConfig};
pub use config::{ProviderKind, Settings};
pub use error::{ChatError, ConfigError, IngestError, ProviderError, SearchError, StoreError};
pub use extractor::{extract_page_texts, LopdfExtractor, PageText, PdfExtractor};
pub use ingest::{ingest_pdf, load_document_chunks, store_chunks, IngestionReport, LoadedDocument};
pub use models::{DocumentChunk, DocumentFingerprint, ScoredChunk};
pub use prompt::{build_context, build_prompt, SEARCH_PROMPT_TEMPLATE};
pub use provider::{build_provider, provider_from_config, ModelProvider, ProviderConfig};
pub use providers::{GeminiProvider, OpenAiProvider};
pub use search::{SearchPipeline, SEARCH_TOP_K};
pub use store::VectorStore;
pub use stores::PgVectorStore;
