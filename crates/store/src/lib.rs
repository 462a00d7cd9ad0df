//! In-memory store of tracked bridge requests, keyed per account.
//!
//! Written by the reconciler and the execute path, read by the presentation
//! layer. Consumers subscribe to a revision counter and re-read on change
//! rather than receiving deltas; writes are last-writer-wins per
//! `(account, id)`.

use std::collections::HashMap;

use bridgewatch_types::{AccountId, BridgeRequest, RequestId, RequestStatus};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::trace;

/// Per-account, insertion-ordered collection of bridge requests.
///
/// Every mutation is total over `(account, id)`: unknown keys insert or
/// no-op, never error. Mutations that change nothing observable also leave
/// the revision counter untouched, so idempotent writes do not wake
/// subscribers.
#[derive(Debug)]
pub struct RequestStore {
    accounts: RwLock<HashMap<AccountId, Vec<BridgeRequest>>>,
    revision_tx: watch::Sender<u64>,
}

impl Default for RequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStore {
    pub fn new() -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            accounts: RwLock::new(HashMap::new()),
            revision_tx,
        }
    }

    /// Returns the tracked sequence for an account, oldest first.
    pub fn requests_for_account(&self, account: &AccountId) -> Vec<BridgeRequest> {
        self.accounts
            .read()
            .get(account)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns a single tracked request.
    pub fn get(&self, account: &AccountId, id: &RequestId) -> Option<BridgeRequest> {
        self.accounts
            .read()
            .get(account)
            .and_then(|reqs| reqs.iter().find(|r| r.id == *id))
            .cloned()
    }

    /// Inserts a request, or replaces it in place if the id is already
    /// tracked for the account. Existing records keep their position.
    pub fn upsert(&self, account: &AccountId, request: BridgeRequest) {
        let mut accounts = self.accounts.write();
        let reqs = accounts.entry(account.clone()).or_default();

        let changed = match reqs.iter_mut().find(|r| r.id == request.id) {
            Some(existing) => {
                if *existing == request {
                    false
                } else {
                    *existing = request;
                    true
                }
            }
            None => {
                trace!(%account, id = %request.id, "tracking new request");
                reqs.push(request);
                true
            }
        };
        drop(accounts);

        if changed {
            self.bump_revision();
        }
    }

    /// Wholesale replacement of an account's sequence after a full resync.
    /// Other accounts are unaffected.
    pub fn replace_all(&self, account: &AccountId, requests: Vec<BridgeRequest>) {
        let mut accounts = self.accounts.write();
        let changed = accounts.get(account) != Some(&requests);
        if changed {
            accounts.insert(account.clone(), requests);
        }
        drop(accounts);

        if changed {
            self.bump_revision();
        }
    }

    /// Sets a request to `Expired` unless it is missing or already terminal.
    pub fn mark_expired(&self, account: &AccountId, id: &RequestId) {
        let mut accounts = self.accounts.write();
        let Some(request) = accounts
            .get_mut(account)
            .and_then(|reqs| reqs.iter_mut().find(|r| r.id == *id))
        else {
            return;
        };
        if request.status.is_terminal() {
            return;
        }
        request.status = RequestStatus::Expired;
        drop(accounts);

        self.bump_revision();
    }

    /// Drops an account's records. Called when the active account changes;
    /// the only removal path for tracked requests.
    pub fn clear_account(&self, account: &AccountId) {
        let removed = self.accounts.write().remove(account);
        if removed.is_some() {
            trace!(%account, "cleared account requests");
            self.bump_revision();
        }
    }

    /// Subscribes to store changes. The value is a revision counter bumped
    /// on every effective mutation; subscribers re-read what they need.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    fn bump_revision(&self) {
        self.revision_tx.send_modify(|rev| *rev += 1);
    }
}
