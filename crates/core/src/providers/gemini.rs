use crate::config::ProviderKind;
use crate::error::ProviderError;
use crate::provider::{base_url, ensure_success, ModelProvider, ProviderConfig};
use crate::providers::openai::parse_vector;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

const PROVIDER: &str = "gemini";
const MAX_BATCH_SIZE: usize = 100;

pub struct GeminiProvider {
    client: Client,
    base: Url,
    api_key: String,
    embedding_model: String,
    llm_model: String,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::new(),
            base: base_url(&config.base_url)?,
            api_key: config.api_key,
            embedding_model: model_resource(&config.embedding_model),
            llm_model: model_resource(&config.llm_model),
        })
    }

    async fn call(&self, model: &str, method: &str, body: &Value) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(self.base.join(&format!("{model}:{method}"))?)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        Ok(ensure_success(PROVIDER, response).await?.json().await?)
    }

    fn embed_request(&self, text: &str, task_type: &str) -> Value {
        json!({
            "model": self.embedding_model,
            "content": { "parts": [{ "text": text }] },
            "taskType": task_type,
        })
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let parsed = self
            .call(
                &self.embedding_model,
                "embedContent",
                &self.embed_request(text, "RETRIEVAL_QUERY"),
            )
            .await?;

        parse_vector(parsed.pointer("/embedding/values")).map_err(|_| malformed("embedding without values"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_SIZE) {
            let requests = batch
                .iter()
                .map(|text| self.embed_request(text, "RETRIEVAL_DOCUMENT"))
                .collect::<Vec<_>>();
            let parsed = self
                .call(
                    &self.embedding_model,
                    "batchEmbedContents",
                    &json!({ "requests": requests }),
                )
                .await?;

            let embeddings = parsed
                .pointer("/embeddings")
                .and_then(Value::as_array)
                .ok_or_else(|| malformed("batch response without embeddings"))?;
            if embeddings.len() != batch.len() {
                return Err(malformed(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            for embedding in embeddings {
                vectors.push(
                    parse_vector(embedding.pointer("/values"))
                        .map_err(|_| malformed("embedding without values"))?,
                );
            }
        }

        Ok(vectors)
    }

    async fn chat(&self, prompt: &str) -> Result<String, ProviderError> {
        let parsed = self
            .call(
                &self.llm_model,
                "generateContent",
                &json!({
                    "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
                    "generationConfig": { "temperature": 0 },
                }),
            )
            .await?;

        let parts = parsed
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("response without candidates"))?;

        Ok(parts
            .iter()
            .filter_map(|part| part.pointer("/text").and_then(Value::as_str))
            .collect::<String>())
    }
}

/// Accepts both `text-embedding-004` and `models/text-embedding-004`.
fn model_resource(model: &str) -> String {
    let model = model.trim();
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn malformed(details: impl Into<String>) -> ProviderError {
    ProviderError::MalformedResponse {
        provider: PROVIDER,
        details: details.into(),
    }
}
