use super::{ModelLoadError, ModelParameters};
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Where the serialized model parameters come from
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    File(PathBuf),
    Http { url: String, timeout: Duration },
    Inline(String),
}

impl ModelSource {
    /// `http(s)://` locations are fetched, anything else is a file path
    pub fn from_location(location: &str, timeout_seconds: u64) -> Self {
        let lower = location.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Http {
                url: location.to_string(),
                timeout: Duration::from_secs(timeout_seconds),
            }
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    pub fn http(url: &str) -> Self {
        Self::from_location(url, DEFAULT_TIMEOUT_SECONDS)
    }

    pub async fn load(&self) -> Result<ModelParameters, ModelLoadError> {
        let content = match self {
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| ModelLoadError::Io {
                        path: path.display().to_string(),
                        source: Arc::new(source),
                    })?
            }
            Self::Http { url, timeout } => fetch(url, *timeout).await?,
            Self::Inline(json) => json.clone(),
        };

        ModelParameters::from_json(&content)
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http { url, .. } => write!(f, "{}", url),
            Self::Inline(_) => write!(f, "<inline>"),
        }
    }
}

async fn fetch(url: &str, timeout: Duration) -> Result<String, ModelLoadError> {
    let fetch_error = |source: reqwest::Error| ModelLoadError::Fetch {
        url: url.to_string(),
        source: Arc::new(source),
    };

    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("catchthephish/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(fetch_error)?;

    let response = client.get(url).send().await.map_err(fetch_error)?;
    if !response.status().is_success() {
        return Err(ModelLoadError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.text().await.map_err(fetch_error)
}
