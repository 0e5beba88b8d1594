//! Harvest conference paper and proceedings records from Proceedings of Science.
//!
//! Every feed record starts a [`chain::Chain`]: the contribution page is fetched to find the
//! full-text PDF and emit a conference paper record, then the proceedings page it links to is
//! fetched to emit a proceedings record. Chains are independent of each other and a chain may
//! end with only its paper record.

pub mod chain;
pub mod config;
pub mod error;
pub mod harvester;
pub mod page;
pub mod record;
pub mod sink;
pub mod source;
pub mod transport;

pub use chain::{Chain, ChainOutcome, ChainState, ChainStatus, CrawlContext};
pub use config::HarvestConfig;
pub use error::{ChainFailure, HarvestError, Stage};
pub use harvester::{HarvestReport, Harvester};
pub use record::{ConferencePaperRecord, HarvestedRecord, ProceedingsRecord};
pub use sink::{CollectingSink, JsonLinesSink, RecordSink};
pub use source::{Creator, Envelope, SourceRecord};
pub use transport::{Fetcher, HttpFetcher};
