//! The per-record crawl: paper page, then proceedings page.
//!
//! A chain is an explicit state machine. Each state owns the [`CrawlContext`] gathered so far
//! and the URL it is waiting on; [`Chain::advance`] consumes the state together with the fetch
//! result and returns the next state plus the record to emit, if any. [`Chain::run`] drives the
//! machine against a [`Fetcher`], emitting each record before the next fetch is issued.

use tracing::{debug, info, warn};

use crate::config::HarvestConfig;
use crate::error::{ChainFailure, HarvestError, Stage};
use crate::page::{Page, paper, proceedings};
use crate::record::HarvestedRecord;
use crate::record::license::LicensePolicy;
use crate::record::normalize::{self, PaperLinks};
use crate::sink::RecordSink;
use crate::source::{Envelope, SourceRecord};
use crate::transport::Fetcher;

/// What one chain knows at a given point. Each stage hands on a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlContext {
    pub record: SourceRecord,
    /// The source record markup as it came from the feed.
    pub raw_record: String,
    pub paper_page: Option<String>,
    pub proceedings_id: Option<String>,
}

impl CrawlContext {
    pub fn new(record: SourceRecord, raw_record: String) -> Self {
        CrawlContext {
            record,
            raw_record,
            paper_page: None,
            proceedings_id: None,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.record.identifier
    }

    fn with_paper_page(self, markup: String) -> Self {
        CrawlContext {
            paper_page: Some(markup),
            ..self
        }
    }

    fn with_proceedings_id(self, id: String) -> Self {
        CrawlContext {
            proceedings_id: Some(id),
            ..self
        }
    }
}

#[derive(Debug)]
pub enum ChainState {
    AwaitPaperPage { context: CrawlContext, url: String },
    AwaitProceedingsPage { context: CrawlContext, url: String },
    Done,
    Aborted(ChainFailure),
}

impl ChainState {
    /// The URL this state is waiting on, if it is waiting at all.
    pub fn pending_url(&self) -> Option<&str> {
        match self {
            ChainState::AwaitPaperPage { url, .. } | ChainState::AwaitProceedingsPage { url, .. } => {
                Some(url)
            }
            ChainState::Done | ChainState::Aborted(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.pending_url().is_none()
    }
}

/// Result of feeding one fetch result to a chain.
#[derive(Debug)]
pub struct Step {
    pub emitted: Option<HarvestedRecord>,
    pub next: ChainState,
}

impl Step {
    fn to(next: ChainState) -> Self {
        Step {
            emitted: None,
            next,
        }
    }
}

fn abort(identifier: &str, stage: Stage, error: HarvestError) -> ChainState {
    ChainState::Aborted(ChainFailure::new(Some(identifier), stage, error))
}

/// How a finished chain went.
#[derive(Debug)]
pub struct ChainOutcome {
    pub identifier: Option<String>,
    pub paper_emitted: bool,
    pub proceedings_emitted: bool,
    pub failure: Option<ChainFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStatus {
    /// Both records emitted.
    Complete,
    /// Paper record emitted, proceedings record not.
    Partial,
    Failed,
}

impl ChainOutcome {
    pub fn status(&self) -> ChainStatus {
        match (self.paper_emitted, self.proceedings_emitted) {
            (true, true) => ChainStatus::Complete,
            (true, false) => ChainStatus::Partial,
            _ => ChainStatus::Failed,
        }
    }
}

/// Stateless driver for chains; one value serves any number of concurrent chains.
#[derive(Clone, Copy)]
pub struct Chain<'a> {
    config: &'a HarvestConfig,
    licenses: &'a dyn LicensePolicy,
}

impl<'a> Chain<'a> {
    pub fn new(config: &'a HarvestConfig, licenses: &'a dyn LicensePolicy) -> Self {
        Chain { config, licenses }
    }

    /// Set up the context and the paper page request for one envelope.
    pub fn start(&self, envelope: Envelope) -> ChainState {
        let (record, raw_record) = match envelope.into_record() {
            Ok(parts) => parts,
            Err(error) => return ChainState::Aborted(ChainFailure::new(None, Stage::Envelope, error)),
        };
        let url = format!("{}{}", self.config.base_conference_paper_url, record.identifier);
        debug!(identifier = %record.identifier, %url, "awaiting paper page");
        ChainState::AwaitPaperPage {
            context: CrawlContext::new(record, raw_record),
            url,
        }
    }

    pub fn advance(&self, state: ChainState, fetched: Result<String, HarvestError>) -> Step {
        match state {
            ChainState::AwaitPaperPage { context, url } => match fetched {
                Ok(body) => self.on_paper_page(context, &url, body),
                Err(e) => Step::to(abort(context.identifier(), Stage::PaperPage, e)),
            },
            ChainState::AwaitProceedingsPage { context, .. } => match fetched {
                Ok(body) => self.on_proceedings_page(context, &body),
                Err(e) => Step::to(abort(context.identifier(), Stage::ProceedingsPage, e)),
            },
            terminal => Step::to(terminal),
        }
    }

    fn on_paper_page(&self, context: CrawlContext, page_url: &str, body: String) -> Step {
        let identifier = context.identifier().to_string();
        let pdf_url = match paper::pdf_url(
            &Page::parse(&body),
            &self.config.base_conference_paper_url,
            page_url,
        ) {
            Ok(url) => url,
            Err(e) => return Step::to(abort(&identifier, Stage::PaperPage, e)),
        };
        let links = PaperLinks {
            page_url,
            pdf_url: &pdf_url,
        };
        let paper = match normalize::conference_paper(
            &context.record,
            links,
            &self.config.default_language,
            self.licenses,
        ) {
            Ok(paper) => HarvestedRecord::ConferencePaper(paper),
            Err(e) => return Step::to(abort(&identifier, Stage::PaperPage, e)),
        };

        let context = context.with_paper_page(body);
        let markup = context.paper_page.as_deref().unwrap_or_default();
        let next = match proceedings::internal_id(markup, &identifier) {
            Ok(id) => {
                let url = proceedings::proceedings_url(&self.config.base_proceedings_url, &id);
                debug!(%identifier, %url, "awaiting proceedings page");
                ChainState::AwaitProceedingsPage {
                    context: context.with_proceedings_id(id),
                    url,
                }
            }
            Err(e) => abort(&identifier, Stage::ProceedingsPage, e),
        };
        Step {
            emitted: Some(paper),
            next,
        }
    }

    fn on_proceedings_page(&self, context: CrawlContext, body: &str) -> Step {
        match normalize::proceedings(body, context.identifier(), &self.config.venue_name) {
            Ok(rec) => Step {
                emitted: Some(HarvestedRecord::Proceedings(rec)),
                next: ChainState::Done,
            },
            Err(e) => Step::to(abort(context.identifier(), Stage::ProceedingsPage, e)),
        }
    }

    /// Drive one envelope to a terminal state, emitting records as they are built.
    pub fn run(
        &self,
        envelope: Envelope,
        fetcher: &dyn Fetcher,
        sink: &dyn RecordSink,
    ) -> ChainOutcome {
        let mut outcome = ChainOutcome {
            identifier: envelope
                .identifier
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            paper_emitted: false,
            proceedings_emitted: false,
            failure: None,
        };
        let mut state = self.start(envelope);
        while let Some(url) = state.pending_url() {
            let fetched = fetcher.fetch(url);
            let stage = match &state {
                ChainState::AwaitProceedingsPage { .. } => Stage::ProceedingsPage,
                _ => Stage::PaperPage,
            };
            let step = self.advance(state, fetched);
            state = step.next;
            if let Some(record) = step.emitted {
                let kind = record.kind();
                let is_paper = matches!(record, HarvestedRecord::ConferencePaper(_));
                if let Err(e) = sink.emit(record) {
                    state = abort(
                        outcome.identifier.as_deref().unwrap_or_default(),
                        stage,
                        HarvestError::Emit(e),
                    );
                    break;
                }
                info!(identifier = outcome.identifier.as_deref(), kind, "record emitted");
                if is_paper {
                    outcome.paper_emitted = true;
                } else {
                    outcome.proceedings_emitted = true;
                }
            }
        }
        if let ChainState::Aborted(failure) = state {
            warn!("{failure}");
            outcome.failure = Some(failure);
        }
        outcome
    }
}
