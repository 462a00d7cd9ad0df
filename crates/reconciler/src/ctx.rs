use std::{sync::Arc, time::Duration};

use bridgewatch_chain::ChainParams;
use bridgewatch_store::RequestStore;
use bridgewatch_types::AccountId;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::watchers::WatcherRegistry;

/// Shared context handed to every reconciler task.
pub(crate) struct ReconcilerCtx<TClient> {
    pub client: Arc<TClient>,
    pub store: Arc<RequestStore>,
    pub watchers: Arc<WatcherRegistry>,

    /// Chain constants, refreshed by the sync pass so the execute path can
    /// check preconditions without a network round trip.
    pub params: Arc<RwLock<Option<ChainParams>>>,

    /// Active account signal; watchers drop out when it moves away from
    /// their request's owner.
    pub account_rx: watch::Receiver<Option<AccountId>>,

    pub poll_interval: Duration,
    pub sync_interval: Duration,
}

impl<TClient> Clone for ReconcilerCtx<TClient> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            store: Arc::clone(&self.store),
            watchers: Arc::clone(&self.watchers),
            params: Arc::clone(&self.params),
            account_rx: self.account_rx.clone(),
            poll_interval: self.poll_interval,
            sync_interval: self.sync_interval,
        }
    }
}

impl<TClient> ReconcilerCtx<TClient> {
    /// Publishes freshly fetched chain params for the execute path.
    pub(crate) fn cache_params(&self, params: ChainParams) {
        *self.params.write() = Some(params);
    }
}
