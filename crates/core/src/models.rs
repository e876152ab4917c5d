use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFingerprint {
    pub document_id: String,
    pub document_title: String,
    pub source_path: String,
    pub checksum: String,
    pub ingested_at: DateTime<Utc>,
}

/// A window of extracted page text, the unit that gets embedded and stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub page: u32,
    pub chunk_index: u64,
    pub document: DocumentFingerprint,
}

impl DocumentChunk {
    /// Metadata stored next to the chunk text in the vector store.
    pub fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "source": self.document.source_path,
            "page": self.page,
            "chunk_index": self.chunk_index,
            "document_id": self.document.document_id,
            "title": self.document.document_title,
            "checksum": self.document.checksum,
            "ingested_at": self.document.ingested_at.to_rfc3339(),
        })
    }
}

/// A stored chunk returned by a similarity search, with the store's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f64,
}
