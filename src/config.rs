use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pos.sissa.it";
pub const DEFAULT_BASE_CONFERENCE_PAPER_URL: &str = "https://pos.sissa.it/contribution?id=";
pub const DEFAULT_BASE_PROCEEDINGS_URL: &str =
    "https://pos.sissa.it/cgi-bin/reader/conf.cgi?confid=";

/// Settings shared by every chain of a harvest run.
#[derive(Clone, Debug)]
pub struct HarvestConfig {
    /// Prefix the contribution identifier is appended to.
    pub base_conference_paper_url: String,
    /// Prefix the internal conference id is appended to.
    pub base_proceedings_url: String,
    /// `journal_title` of every proceedings record.
    pub venue_name: String,
    /// Language code that is left out of paper records.
    pub default_language: String,
    /// Worker threads for concurrent chains, 0 picks one per CPU.
    pub jobs: usize,
    pub connect_timeout: Duration,
    pub global_timeout: Duration,
    pub user_agent: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_conference_paper_url: DEFAULT_BASE_CONFERENCE_PAPER_URL.to_string(),
            base_proceedings_url: DEFAULT_BASE_PROCEEDINGS_URL.to_string(),
            venue_name: "PoS".to_string(),
            default_language: "en".to_string(),
            jobs: 0,
            connect_timeout: Duration::from_secs(5),
            global_timeout: Duration::from_secs(15),
            user_agent: format!(
                "Mozilla/5.0 (compatible; poscrawl/{}; +{})",
                env!("CARGO_PKG_VERSION"),
                DEFAULT_BASE_URL
            ),
        }
    }
}

impl HarvestConfig {
    /// Defaults, overridden by any `POSCRAWL_*` variable that is set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let secs = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(fallback)
        };
        Self {
            base_conference_paper_url: lookup("POSCRAWL_BASE_CONFERENCE_PAPER_URL")
                .unwrap_or(default.base_conference_paper_url),
            base_proceedings_url: lookup("POSCRAWL_BASE_PROCEEDINGS_URL")
                .unwrap_or(default.base_proceedings_url),
            venue_name: lookup("POSCRAWL_VENUE_NAME").unwrap_or(default.venue_name),
            default_language: lookup("POSCRAWL_DEFAULT_LANGUAGE")
                .unwrap_or(default.default_language),
            jobs: lookup("POSCRAWL_JOBS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.jobs),
            connect_timeout: secs("POSCRAWL_CONNECT_TIMEOUT", default.connect_timeout),
            global_timeout: secs("POSCRAWL_TIMEOUT", default.global_timeout),
            user_agent: lookup("POSCRAWL_USER_AGENT").unwrap_or(default.user_agent),
        }
    }
}
