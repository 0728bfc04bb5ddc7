//! Remote log sources for the watcher.

use std::time::Duration;

use tracehound_core::prelude::*;

/// A remote plain-text log accessor. Non-success responses and network
/// failures surface as transport errors; the watcher treats them as
/// recoverable.
#[trait_variant::make(RemoteLogSource: Send)]
pub trait LocalRemoteLogSource {
    async fn fetch_text(&self) -> Result<String>;
}

/// HTTP implementation polling a fixed URL
pub struct HttpLogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpLogSource {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RemoteLogSource for HttpLogSource {
    async fn fetch_text(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "unexpected status {} from {}",
                status, self.url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_source_is_transport_error() {
        let source = HttpLogSource::new("http://127.0.0.1:1/log");
        let err = RemoteLogSource::fetch_text(&source).await.unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert!(err.is_recoverable());
    }
}
