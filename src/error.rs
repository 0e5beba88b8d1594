use std::fmt;

use thiserror::Error;

/// Everything that can stop a chain from producing one of its records.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("record has no contribution identifier")]
    MissingIdentifier,

    #[error("no pdf link found on conference paper page {url}")]
    PdfLinkNotFound { url: String },

    #[error("conference paper page for {identifier} was empty")]
    EmptyPaperPage { identifier: String },

    #[error("no proceedings link found on conference paper page for {identifier}")]
    ProceedingsLinkNotFound { identifier: String },

    #[error("invalid date: {raw:?}")]
    DateParse { raw: String },

    #[error("identifier {identifier:?} does not split into journal, volume and article id ({parts} parts)")]
    MalformedIdentifier { identifier: String, parts: usize },

    #[error("failed to decode source envelope: {0}")]
    Envelope(String),

    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to emit record")]
    Emit(#[from] std::io::Error),

    #[error("failed to start worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// The fetch-and-extract step a chain was in when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Envelope,
    PaperPage,
    ProceedingsPage,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Envelope => "envelope",
            Stage::PaperPage => "paper page",
            Stage::ProceedingsPage => "proceedings page",
        };
        f.write_str(name)
    }
}

/// A chain-local failure, tied to the record it happened to.
#[derive(Debug, Error)]
#[error("chain {} failed at {stage}: {error}", .identifier.as_deref().unwrap_or("<unidentified>"))]
pub struct ChainFailure {
    pub identifier: Option<String>,
    pub stage: Stage,
    #[source]
    pub error: HarvestError,
}

impl ChainFailure {
    pub fn new(identifier: Option<&str>, stage: Stage, error: HarvestError) -> Self {
        ChainFailure {
            identifier: identifier.map(str::to_string),
            stage,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_failure_names_identifier_and_stage() {
        let failure = ChainFailure::new(
            Some("PoS(LATTICE 2013)001"),
            Stage::ProceedingsPage,
            HarvestError::ProceedingsLinkNotFound {
                identifier: "PoS(LATTICE 2013)001".into(),
            },
        );
        let msg = failure.to_string();
        assert!(msg.starts_with("chain PoS(LATTICE 2013)001 failed at proceedings page"));
        assert!(msg.contains("no proceedings link"));
    }

    #[test]
    fn chain_failure_without_identifier() {
        let failure = ChainFailure::new(None, Stage::Envelope, HarvestError::MissingIdentifier);
        assert_eq!(
            failure.to_string(),
            "chain <unidentified> failed at envelope: record has no contribution identifier"
        );
    }
}
