use crate::error::ConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_COLLECTION_NAME: &str = "documents";
pub const DEFAULT_PDF_PATH: &str = "document.pdf";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

/// Environment variable names and defaults that belong to one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderVars {
    pub api_key: &'static str,
    pub embedding_model: &'static str,
    pub llm_model: &'static str,
    pub default_llm_model: &'static str,
    pub base_url: &'static str,
    pub default_base_url: &'static str,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }

    pub fn vars(self) -> ProviderVars {
        match self {
            Self::OpenAi => ProviderVars {
                api_key: "OPENAI_API_KEY",
                embedding_model: "OPENAI_EMBEDDING_MODEL",
                llm_model: "OPENAI_LLM_MODEL",
                default_llm_model: "gpt-5-nano",
                base_url: "OPENAI_BASE_URL",
                default_base_url: DEFAULT_OPENAI_BASE_URL,
            },
            Self::Gemini => ProviderVars {
                api_key: "GOOGLE_API_KEY",
                embedding_model: "GOOGLE_EMBEDDING_MODEL",
                llm_model: "GOOGLE_LLM_MODEL",
                default_llm_model: "gemini-2.5-flash-lite",
                base_url: "GOOGLE_BASE_URL",
                default_base_url: DEFAULT_GOOGLE_BASE_URL,
            },
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(ConfigError::InvalidProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide configuration, read once at startup and never mutated.
#[derive(Clone)]
pub struct Settings {
    provider: ProviderKind,
    api_key: String,
    embedding_model: String,
    llm_model: String,
    base_url: String,
    database_url: String,
    collection_name: String,
    pdf_path: PathBuf,
}

impl Settings {
    /// Loads `<project_root>/.env` (if present) on top of the process
    /// environment and reads the settings from it. Variables already set in
    /// the environment win over the file.
    pub fn from_env(project_root: &Path) -> Result<Self, ConfigError> {
        load_dotenv(&project_root.join(".env"));
        Self::from_lookup(project_root, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(project_root: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |key: &'static str| read(key).ok_or(ConfigError::MissingVar(key));

        let database_url = require("DATABASE_URL")?;
        // Unset falls back to openai; set but blank is rejected like any other value.
        let provider = lookup("ACTIVE_PROVIDER")
            .as_deref()
            .unwrap_or("openai")
            .parse::<ProviderKind>()?;

        let vars = provider.vars();
        let api_key = require(vars.api_key)?;
        let embedding_model = require(vars.embedding_model)?;
        let llm_model = read(vars.llm_model).unwrap_or_else(|| vars.default_llm_model.to_string());
        let base_url = read(vars.base_url).unwrap_or_else(|| vars.default_base_url.to_string());
        let collection_name =
            read("PG_VECTOR_COLLECTION_NAME").unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string());

        let pdf_path = resolve_pdf_path(
            project_root,
            read("PDF_PATH").as_deref().unwrap_or(DEFAULT_PDF_PATH),
        );

        Ok(Self {
            provider,
            api_key,
            embedding_model,
            llm_model,
            base_url,
            database_url,
            collection_name,
            pdf_path,
        })
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn llm_model(&self) -> &str {
        &self.llm_model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn pdf_path(&self) -> &Path {
        &self.pdf_path
    }

    pub fn existing_pdf_path(&self) -> Result<&Path, ConfigError> {
        if self.pdf_path.is_file() {
            Ok(&self.pdf_path)
        } else {
            Err(ConfigError::PdfNotFound(self.pdf_path.clone()))
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("embedding_model", &self.embedding_model)
            .field("llm_model", &self.llm_model)
            .field("base_url", &self.base_url)
            .field("database_url", &self.database_url)
            .field("collection_name", &self.collection_name)
            .field("pdf_path", &self.pdf_path)
            .finish()
    }
}

/// Applies a `.env` file without overriding the process environment.
/// Returns whether the file was read completely.
pub fn load_dotenv(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    match dotenv::from_path(path) {
        Ok(()) => true,
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring malformed .env file");
            false
        }
    }
}

pub fn resolve_pdf_path(project_root: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}
