//! Sources for the bundled default-rules document.

use std::path::PathBuf;

use async_trait::async_trait;

use lorekeep_core::RulesSource;

/// Default rules from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileRulesSource {
    path: PathBuf,
}

impl FileRulesSource {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl RulesSource for FileRulesSource {
    async fn fetch_default_rules(&self) -> anyhow::Result<serde_json::Value> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Default rules fetched from a static HTTP resource.
#[derive(Debug, Clone)]
pub struct HttpRulesSource {
    url: String,
    client: reqwest::Client,
}

impl HttpRulesSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RulesSource for HttpRulesSource {
    async fn fetch_default_rules(&self) -> anyhow::Result<serde_json::Value> {
        tracing::info!(url = self.url, "fetching default rules");
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}
