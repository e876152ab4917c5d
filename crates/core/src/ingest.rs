use crate::chunking::{split_pages, ChunkingConfig};
use crate::error::IngestError;
use crate::extractor::PdfExtractor;
use crate::models::{DocumentChunk, DocumentFingerprint};
use crate::provider::ModelProvider;
use crate::store::VectorStore;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::info;

pub struct LoadedDocument {
    pub fingerprint: DocumentFingerprint,
    pub pages: usize,
    pub chunks: Vec<DocumentChunk>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    pub document_id: String,
    pub pages: usize,
    pub chunks: usize,
}

pub fn digest_file(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Extracts and chunks a PDF. Fails with `NoChunks` when nothing is extractable.
pub fn load_document_chunks(
    path: &Path,
    extractor: &dyn PdfExtractor,
    config: ChunkingConfig,
) -> Result<LoadedDocument, IngestError> {
    let fingerprint = build_document_fingerprint(path)?;
    let pages = extractor.extract_pages(path)?;
    let chunks = split_pages(&fingerprint, &pages, config)?;

    if chunks.is_empty() {
        return Err(IngestError::NoChunks(path.to_path_buf()));
    }

    info!(path = %path.display(), pages = pages.len(), chunks = chunks.len(), "document chunked");
    Ok(LoadedDocument {
        fingerprint,
        pages: pages.len(),
        chunks,
    })
}

/// Embeds every chunk and hands the whole batch to the store in a single call.
pub async fn store_chunks(
    chunks: &[DocumentChunk],
    provider: &dyn ModelProvider,
    store: &dyn VectorStore,
) -> Result<usize, IngestError> {
    let texts = chunks
        .iter()
        .map(|chunk| chunk.text.clone())
        .collect::<Vec<_>>();
    let embeddings = provider.embed_batch(&texts).await?;
    store.add_chunks(chunks, &embeddings).await?;

    info!(provider = %provider.kind(), chunks = chunks.len(), "chunks stored");
    Ok(chunks.len())
}

pub async fn ingest_pdf(
    path: &Path,
    extractor: &dyn PdfExtractor,
    provider: &dyn ModelProvider,
    store: &dyn VectorStore,
) -> Result<IngestionReport, IngestError> {
    let loaded = load_document_chunks(path, extractor, ChunkingConfig::default())?;
    let stored = store_chunks(&loaded.chunks, provider, store).await?;

    Ok(IngestionReport {
        document_id: loaded.fingerprint.document_id,
        pages: loaded.pages,
        chunks: stored,
    })
}

fn build_document_fingerprint(path: &Path) -> Result<DocumentFingerprint, IngestError> {
    let checksum = digest_file(path)?;
    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(DocumentFingerprint {
        document_id: generate_document_id(path),
        document_title: title,
        source_path: path.to_string_lossy().to_string(),
        checksum,
        ingested_at: Utc::now(),
    })
}

fn generate_document_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}
