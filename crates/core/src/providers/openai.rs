use crate::config::ProviderKind;
use crate::error::ProviderError;
use crate::provider::{base_url, ensure_success, ModelProvider, ProviderConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

const PROVIDER: &str = "openai";
// Keeps one request of ~1000-character chunks under the per-request token limit.
const MAX_BATCH_SIZE: usize = 1_000;

pub struct OpenAiProvider {
    client: Client,
    base: Url,
    api_key: String,
    embedding_model: String,
    llm_model: String,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::new(),
            base: base_url(&config.base_url)?,
            api_key: config.api_key,
            embedding_model: config.embedding_model,
            llm_model: config.llm_model,
        })
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(self.base.join(endpoint)?)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        Ok(ensure_success(PROVIDER, response).await?.json().await?)
    }

    async fn embed_inputs(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let parsed = self
            .post(
                "embeddings",
                &json!({
                    "model": self.embedding_model,
                    "input": inputs,
                }),
            )
            .await?;

        let data = parsed
            .pointer("/data")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("embedding response without data"))?;

        let mut vectors = vec![None; inputs.len()];
        for (position, item) in data.iter().enumerate() {
            let index = item
                .pointer("/index")
                .and_then(Value::as_u64)
                .map(|index| index as usize)
                .unwrap_or(position);
            let slot = vectors
                .get_mut(index)
                .ok_or_else(|| malformed(format!("embedding index {index} out of range")))?;
            *slot = Some(parse_vector(item.pointer("/embedding"))?);
        }

        vectors
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| malformed("embedding response is missing inputs"))
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.embed_inputs(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| malformed("empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            vectors.extend(self.embed_inputs(batch).await?);
        }
        Ok(vectors)
    }

    async fn chat(&self, prompt: &str) -> Result<String, ProviderError> {
        let mut body = json!({
            "model": self.llm_model,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if accepts_temperature(&self.llm_model) {
            body["temperature"] = json!(0);
        }

        let parsed = self.post("chat/completions", &body).await?;
        parsed
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| malformed("chat response without message content"))
    }
}

/// Reasoning models only accept their default temperature.
fn accepts_temperature(model: &str) -> bool {
    !["gpt-5", "o1", "o3", "o4"]
        .iter()
        .any(|prefix| model.starts_with(prefix))
}

pub(crate) fn parse_vector(value: Option<&Value>) -> Result<Vec<f32>, ProviderError> {
    value
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("embedding is not an array"))?
        .iter()
        .map(|component| {
            component
                .as_f64()
                .map(|number| number as f32)
                .ok_or_else(|| malformed("embedding component is not a number"))
        })
        .collect()
}

fn malformed(details: impl Into<String>) -> ProviderError {
    ProviderError::MalformedResponse {
        provider: PROVIDER,
        details: details.into(),
    }
}
