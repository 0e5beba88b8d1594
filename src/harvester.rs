use rayon::prelude::*;
use tracing::{debug, info};

use crate::chain::{Chain, ChainOutcome, ChainStatus};
use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::record::license::{CreativeCommons, LicensePolicy};
use crate::sink::RecordSink;
use crate::source::Envelope;
use crate::transport::Fetcher;

/// Runs one independent chain per envelope on a worker pool.
pub struct Harvester<F> {
    config: HarvestConfig,
    fetcher: F,
    licenses: Box<dyn LicensePolicy>,
}

/// Outcomes of every chain of a run, in input order.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub outcomes: Vec<ChainOutcome>,
}

impl HarvestReport {
    pub fn count(&self, status: ChainStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status() == status).count()
    }

    /// Chains that emitted at least their paper record.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.paper_emitted).count()
    }

    pub fn failed(&self) -> usize {
        self.count(ChainStatus::Failed)
    }
}

impl<F: Fetcher> Harvester<F> {
    pub fn new(config: HarvestConfig, fetcher: F) -> Self {
        Harvester {
            config,
            fetcher,
            licenses: Box::new(CreativeCommons),
        }
    }

    pub fn with_license_policy(mut self, licenses: impl LicensePolicy + 'static) -> Self {
        self.licenses = Box::new(licenses);
        self
    }

    /// Run every envelope to completion. `on_done` is called once per finished chain, from
    /// whichever worker ran it.
    pub fn harvest(
        &self,
        envelopes: Vec<Envelope>,
        sink: &dyn RecordSink,
        on_done: &(dyn Fn(&ChainOutcome) + Sync),
    ) -> Result<HarvestReport, HarvestError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()?;
        info!(
            chains = envelopes.len(),
            workers = pool.current_num_threads(),
            "starting harvest"
        );

        let chain = Chain::new(&self.config, self.licenses.as_ref());
        let outcomes = pool.install(|| {
            envelopes
                .into_par_iter()
                .map(|envelope| {
                    let outcome = chain.run(envelope, &self.fetcher, sink);
                    debug!(identifier = outcome.identifier.as_deref(), status = ?outcome.status(), "chain finished");
                    on_done(&outcome);
                    outcome
                })
                .collect::<Vec<_>>()
        });

        let report = HarvestReport { outcomes };
        info!(
            complete = report.count(ChainStatus::Complete),
            partial = report.count(ChainStatus::Partial),
            failed = report.failed(),
            "harvest finished"
        );
        Ok(report)
    }
}
