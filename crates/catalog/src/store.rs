//! Shared catalog cache with in-flight de-duplication.
//!
//! # Architecture
//!
//! - One slot per endpoint URL; a URL with no slot is `NotFetched`
//! - The first caller to find a URL `NotFetched` marks it `Fetching` and spawns
//!   the fetch on the runtime; everyone (that caller included) then waits on a
//!   `watch` channel that carries the outcome
//! - Callers arriving while `Fetching` subscribe to the same channel and resume
//!   the moment the fetch settles
//! - Success stores the payload (`Complete`); failure removes the slot so a later
//!   `load` starts over
//!
//! The fetch runs detached from whoever started it. Dropping a `load` future does
//! not cancel the request and its result still lands in the cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use brandview_core::{FetchStatus, ProductCatalogResponse};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::CatalogConfig;
use crate::fetcher::{CatalogSource, FetchError, HttpCatalogSource, RetryPolicy, fetch_with_retry};

type Outcome = Result<Arc<ProductCatalogResponse>, FetchError>;

enum Slot {
    Fetching(watch::Receiver<Option<Outcome>>),
    Complete(Arc<ProductCatalogResponse>),
}

/// Snapshot of one cache entry.
///
/// The payload is present if and only if the status is `Complete`.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    status: FetchStatus,
    payload: Option<Arc<ProductCatalogResponse>>,
}

impl CacheEntry {
    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.status
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&Arc<ProductCatalogResponse>> {
        self.payload.as_ref()
    }
}

/// Cache of catalog snapshots keyed by endpoint URL.
///
/// Clones share the same cache. Pass one store to every consumer that should
/// share fetches.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogStoreInner>,
}

struct CatalogStoreInner {
    source: Arc<dyn CatalogSource>,
    policy: RetryPolicy,
    slots: Mutex<HashMap<Url, Slot>>,
}

impl CatalogStore {
    /// Create an empty store over the given source.
    #[must_use]
    pub fn new<S>(source: S, policy: RetryPolicy) -> Self
    where
        S: CatalogSource + 'static,
    {
        Self {
            inner: Arc::new(CatalogStoreInner {
                source: Arc::new(source),
                policy,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Create an empty store fetching over HTTP as configured.
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            HttpCatalogSource::with_simulated_delay(config.simulated_delay),
            config.retry,
        )
    }

    /// Retry policy applied to every fetch started by this store.
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.inner.policy
    }

    /// Current entry for `url`. Unknown URLs read as `NotFetched`.
    #[must_use]
    pub fn entry(&self, url: &Url) -> CacheEntry {
        match self.lock_slots().get(url) {
            None => CacheEntry::default(),
            Some(Slot::Fetching(_)) => CacheEntry {
                status: FetchStatus::Fetching,
                payload: None,
            },
            Some(Slot::Complete(catalog)) => CacheEntry {
                status: FetchStatus::Complete,
                payload: Some(Arc::clone(catalog)),
            },
        }
    }

    /// Current lifecycle status for `url`.
    #[must_use]
    pub fn status(&self, url: &Url) -> FetchStatus {
        self.entry(url).status
    }

    /// Get the catalog for `url`, fetching it if nobody has yet.
    ///
    /// At most one fetch per URL is in flight at any time; concurrent callers
    /// share its outcome.
    ///
    /// # Errors
    ///
    /// Returns the shared [`FetchError`] when the fetch exhausts its retries.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn load(&self, url: &Url) -> Result<Arc<ProductCatalogResponse>, FetchError> {
        let mut rx = {
            let mut slots = self.lock_slots();
            match slots.get(url) {
                Some(Slot::Complete(catalog)) => {
                    debug!("Cache hit for catalog");
                    return Ok(Arc::clone(catalog));
                }
                Some(Slot::Fetching(rx)) => {
                    debug!("Catalog fetch already in flight, waiting");
                    rx.clone()
                }
                None => {
                    debug_transition(FetchStatus::NotFetched, FetchStatus::Fetching);
                    let (tx, rx) = watch::channel(None);
                    slots.insert(url.clone(), Slot::Fetching(rx.clone()));
                    info!(status = %FetchStatus::Fetching, "Starting catalog fetch");
                    self.spawn_fetch(url.clone(), tx);
                    rx
                }
            }
        };

        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone().unwrap_or(Err(FetchError::Abandoned)),
            Err(_) => Err(FetchError::Abandoned),
        };
        outcome
    }

    /// Drop a completed entry so the next `load` fetches again.
    ///
    /// Returns `true` if an entry was dropped. In-flight fetches are left alone.
    pub fn invalidate(&self, url: &Url) -> bool {
        let mut slots = self.lock_slots();
        if matches!(slots.get(url), Some(Slot::Complete(_))) {
            debug_transition(FetchStatus::Complete, FetchStatus::NotFetched);
            slots.remove(url);
            info!(url = %url, status = %FetchStatus::NotFetched, "Catalog invalidated");
            true
        } else {
            false
        }
    }

    fn spawn_fetch(&self, url: Url, tx: watch::Sender<Option<Outcome>>) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let in_flight = InFlight {
                inner: Arc::clone(&inner),
                url,
                tx: Some(tx),
            };
            let outcome = fetch_with_retry(inner.source.as_ref(), &in_flight.url, &inner.policy)
                .await
                .map(Arc::new);
            in_flight.settle(outcome);
        });
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<Url, Slot>> {
        self.inner.lock_slots()
    }
}

impl CatalogStoreInner {
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<Url, Slot>> {
        // Slots are only ever replaced wholesale, so a poisoned map is still consistent
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Moves a `Fetching` slot to its final state and publishes the outcome.
///
/// If the fetch task dies before settling, dropping this resets the slot to
/// `NotFetched` before the sender closes, so a waiter woken with `Abandoned`
/// never observes the URL still `Fetching`.
struct InFlight {
    inner: Arc<CatalogStoreInner>,
    url: Url,
    tx: Option<watch::Sender<Option<Outcome>>>,
}

impl InFlight {
    fn settle(mut self, outcome: Outcome) {
        {
            let mut slots = self.inner.lock_slots();
            match &outcome {
                Ok(catalog) => {
                    debug_transition(FetchStatus::Fetching, FetchStatus::Complete);
                    slots.insert(self.url.clone(), Slot::Complete(Arc::clone(catalog)));
                    info!(
                        url = %self.url,
                        status = %FetchStatus::Complete,
                        products = catalog.products.len(),
                        "Catalog cached"
                    );
                }
                Err(err) => {
                    debug_transition(FetchStatus::Fetching, FetchStatus::NotFetched);
                    slots.remove(&self.url);
                    warn!(
                        url = %self.url,
                        status = %FetchStatus::NotFetched,
                        error = %err,
                        "Catalog fetch failed"
                    );
                }
            }
        }

        if let Some(tx) = self.tx.take() {
            tx.send_replace(Some(outcome));
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        // Settled fetches have already handed off their sender
        let Some(tx) = self.tx.take() else {
            return;
        };

        debug_transition(FetchStatus::Fetching, FetchStatus::NotFetched);
        self.inner.lock_slots().remove(&self.url);
        warn!(url = %self.url, "Catalog fetch abandoned");
        drop(tx);
    }
}

fn debug_transition(from: FetchStatus, to: FetchStatus) {
    debug_assert!(
        from.can_transition_to(to),
        "illegal catalog transition {from} -> {to}"
    );
}
