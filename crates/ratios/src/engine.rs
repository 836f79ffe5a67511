//! Async request boundary.
//!
//! [`Engine::run`] gathers the subject's, peers' and market index's facts
//! from the providers concurrently, then assembles the report on a blocking
//! task. Only the subject's fetch can fail the request; a peer or index whose
//! fetch fails, or whose facts are invalid, is logged and treated as having
//! no facts.

use crate::{
    CompanyId, FactProvider, FactStore, PeerProvider, Period, RatioError, RatioRegistry, Report,
    ReportAssembler, Result,
};
use futures::future::{join, join_all};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Ties fact and peer providers to a [`ReportAssembler`].
#[derive(Debug, Clone)]
pub struct Engine {
    facts: Arc<dyn FactProvider>,
    peers: Arc<dyn PeerProvider>,
    assembler: Arc<ReportAssembler>,
}

impl Engine {
    /// Engine over the default registry and configuration.
    pub fn new(facts: Arc<dyn FactProvider>, peers: Arc<dyn PeerProvider>) -> Self {
        Self::with_assembler(
            facts,
            peers,
            ReportAssembler::new(Arc::new(RatioRegistry::with_defaults())),
        )
    }

    /// Engine with an explicit assembler.
    pub fn with_assembler(
        facts: Arc<dyn FactProvider>,
        peers: Arc<dyn PeerProvider>,
        assembler: ReportAssembler,
    ) -> Self {
        Self {
            facts,
            peers,
            assembler: Arc::new(assembler),
        }
    }

    /// The assembler reports are built with.
    pub fn assembler(&self) -> &ReportAssembler {
        &self.assembler
    }

    /// Fetch everything needed for `company_id` and assemble its report.
    ///
    /// The configured market index takes precedence over the peer
    /// provider's. Peer hygiene and `max_peers` apply before any peer is
    /// fetched.
    #[instrument(skip(self, company_id, period), fields(company = %company_id))]
    pub async fn run(&self, company_id: &CompanyId, period: &Period) -> Result<Report> {
        let peers = self.peers.peers_for(company_id).await?;
        let market_index = match &self.assembler.config().market_index {
            Some(index) => Some(index.clone()),
            None => self.peers.market_index_id().await?,
        };

        // Capped-out peers are never requested.
        let peers = self.assembler.select_peers(company_id, &peers, market_index.as_ref());
        let others: Vec<CompanyId> = peers
            .iter()
            .chain(market_index.iter().filter(|index| *index != company_id))
            .cloned()
            .collect();

        let (subject, fetched) = join(
            self.facts.get_facts(company_id, period),
            join_all(others.iter().map(|id| self.facts.get_facts(id, period))),
        )
        .await;

        let mut store = FactStore::from_facts(subject?)?;
        for (id, outcome) in others.iter().zip(fetched) {
            let loaded = outcome.and_then(|facts| {
                debug!(company = %id, facts = facts.len(), "fetched facts");
                FactStore::from_facts(facts)
            });
            if let Err(e) = loaded.and_then(|peer_store| store.merge(peer_store)) {
                warn!(company = %id, error = %e, "unusable facts, excluding");
            }
        }

        let assembler = Arc::clone(&self.assembler);
        let company_id = company_id.clone();
        let period = period.clone();
        tokio::task::spawn_blocking(move || {
            assembler.assemble(&store, &company_id, &period, &peers, market_index.as_ref())
        })
        .await
        .map_err(|e| RatioError::Computation(format!("report assembly task failed: {e}")))?
    }
}
