use std::fs;

use tracing::debug;
use url::Url;

use crate::config::HarvestConfig;
use crate::error::HarvestError;

/// Retrieves the body behind a URL. Retries, throttling and caching belong to implementors.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, HarvestError>;
}

/// `http(s)` through a ureq agent; `file://` straight from disk.
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &HarvestConfig) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(config.connect_timeout))
            .timeout_global(Some(config.global_timeout))
            .build();
        HttpFetcher {
            agent: ureq::Agent::new_with_config(cfg),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        let parsed = Url::parse(url).map_err(|source| HarvestError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let failed = |message: String| HarvestError::Fetch {
            url: url.to_string(),
            message,
        };
        debug!(url = parsed.as_str(), "fetching");
        match parsed.scheme() {
            "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|()| failed("not a local path".to_string()))?;
                fs::read_to_string(&path).map_err(|e| failed(format!("{}: {e}", path.display())))
            }
            "http" | "https" => self
                .agent
                .get(parsed.as_str())
                .header("User-Agent", &self.user_agent)
                .call()
                .map_err(|e| failed(e.to_string()))?
                .into_body()
                .read_to_string()
                .map_err(|e| failed(e.to_string())),
            other => Err(failed(format!("unsupported scheme {other}"))),
        }
    }
}
