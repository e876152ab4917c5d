use crate::config::{ProviderKind, Settings};
use crate::error::ProviderError;
use crate::providers::{GeminiProvider, OpenAiProvider};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// A hosted model backend that can embed text and answer prompts.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Embeds a search query.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Embeds document chunks, one vector per input in the same order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    async fn chat(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub embedding_model: String,
    pub llm_model: String,
    pub base_url: String,
}

impl From<&Settings> for ProviderConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            kind: settings.provider(),
            api_key: settings.api_key().to_string(),
            embedding_model: settings.embedding_model().to_string(),
            llm_model: settings.llm_model().to_string(),
            base_url: settings.base_url().to_string(),
        }
    }
}

pub fn build_provider(settings: &Settings) -> Result<Box<dyn ModelProvider>, ProviderError> {
    provider_from_config(ProviderConfig::from(settings))
}

pub fn provider_from_config(
    config: ProviderConfig,
) -> Result<Box<dyn ModelProvider>, ProviderError> {
    let provider: Box<dyn ModelProvider> = match config.kind {
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(config)?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(config)?),
    };
    Ok(provider)
}

/// Parses a base URL so that relative endpoint paths join underneath it.
pub(crate) fn base_url(raw: &str) -> Result<Url, ProviderError> {
    Ok(Url::parse(&format!("{}/", raw.trim_end_matches('/')))?)
}

/// Turns a non-2xx response into `ProviderError::Api`, keeping the
/// provider's own `error.message` when the body carries one.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|parsed| {
            parsed
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);

    Err(ProviderError::Api {
        provider,
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: ProviderKind) -> ProviderConfig {
        ProviderConfig {
            kind,
            api_key: "key".to_string(),
            embedding_model: "embed".to_string(),
            llm_model: "chat".to_string(),
            base_url: "http://localhost:1/v1".to_string(),
        }
    }

    #[test]
    fn factory_builds_the_selected_backend() {
        for kind in [ProviderKind::OpenAi, ProviderKind::Gemini] {
            let provider = provider_from_config(config(kind)).unwrap();
            assert_eq!(provider.kind(), kind);
        }
    }

    #[test]
    fn factory_rejects_unparseable_base_urls() {
        let mut broken = config(ProviderKind::OpenAi);
        broken.base_url = "not a url".to_string();
        assert!(matches!(
            provider_from_config(broken),
            Err(ProviderError::Url(_))
        ));
    }

    #[test]
    fn base_url_keeps_the_version_segment() {
        let base = base_url("https://api.openai.com/v1/").unwrap();
        assert_eq!(
            base.join("embeddings").unwrap().as_str(),
            "https://api.openai.com/v1/embeddings"
        );
    }
}
