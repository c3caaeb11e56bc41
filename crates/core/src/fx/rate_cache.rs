//! Single-flight exchange-rate cache.
//!
//! The cache always holds a usable rate: it starts from the configured
//! fallback and is only ever replaced by a successful fetch. Failed fetches
//! leave the value alone and record an error string for optional display.
//!
//! At most one fetch is outstanding at a time. A `refresh` issued while a
//! fetch is in flight joins it and resolves with the same outcome instead of
//! starting a second request.
//!
//! The fetch runs on its own tokio task. Dropping a `refresh` future stops
//! the wait, not the fetch: the cache still settles once the provider answers.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, error, info, warn};
use pcbquote_rates::{ExchangeRate, RateError, RateProvider};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PricingConfig;

static GLOBAL_RATE_CACHE: OnceLock<RateCache> = OnceLock::new();

type InFlightFetch = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Snapshot of the cache as observers see it.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateCacheState {
    pub value: ExchangeRate,
    pub loading: bool,
    pub error: Option<String>,
}

/// Result of one refresh. Both arms carry a rate the caller can use.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated(ExchangeRate),
    Failed {
        error: String,
        retained: ExchangeRate,
    },
}

impl RefreshOutcome {
    /// The rate in effect after the refresh.
    pub fn rate(&self) -> &ExchangeRate {
        match self {
            Self::Updated(rate) => rate,
            Self::Failed { retained, .. } => retained,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Updated(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

struct Inner {
    provider: Arc<dyn RateProvider>,
    base: String,
    quote: String,
    state: RwLock<RateCacheState>,
    in_flight: Mutex<Option<InFlightFetch>>,
}

impl Inner {
    fn read_state(&self) -> RwLockReadGuard<'_, RateCacheState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("Rate cache state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RateCacheState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("Rate cache state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<InFlightFetch>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| {
            warn!("Rate cache in-flight lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Applies a provider result, logging it.
    fn commit(&self, result: Result<ExchangeRate, RateError>) -> RefreshOutcome {
        match result.and_then(|rate| self.check(rate)) {
            Ok(rate) => {
                info!(
                    "Exchange rate {} updated to {} from {}",
                    rate.pair_key(),
                    rate.rate,
                    rate.source
                );
                self.settle(Ok(rate))
            }
            Err(e) => {
                let outcome = self.settle(Err(e.to_string()));
                let kept = outcome.rate().rate;
                if e.is_transient() {
                    warn!("Exchange rate fetch failed, keeping {}: {}", kept, e);
                } else {
                    error!("Exchange rate fetch failed, keeping {}: {}", kept, e);
                }
                outcome
            }
        }
    }

    /// Settles a fetch that ended without a provider result.
    fn abandon(&self, reason: &str) -> RefreshOutcome {
        let outcome = self.settle(Err(format!("Exchange rate fetch aborted: {}", reason)));
        error!("Exchange rate fetch aborted, keeping {}: {}", outcome.rate().rate, reason);
        outcome
    }

    /// Updates the state and releases the single-flight slot.
    ///
    /// Lock order is `in_flight` then `state`, the same as `RateCache::refresh`.
    fn settle(&self, result: Result<ExchangeRate, String>) -> RefreshOutcome {
        let mut in_flight = self.lock_in_flight();
        let mut state = self.write_state();

        let outcome = match result {
            Ok(rate) => {
                state.value = rate.clone();
                state.error = None;
                RefreshOutcome::Updated(rate)
            }
            Err(error) => {
                state.error = Some(error.clone());
                RefreshOutcome::Failed {
                    error,
                    retained: state.value.clone(),
                }
            }
        };

        state.loading = false;
        *in_flight = None;
        outcome
    }

    /// Guards the cache invariant against providers that skip validation.
    fn check(&self, rate: ExchangeRate) -> Result<ExchangeRate, RateError> {
        if rate.rate <= Decimal::ZERO {
            return Err(RateError::NonPositiveRate {
                provider: rate.source,
                rate: rate.rate.to_string(),
            });
        }
        Ok(rate)
    }
}

/// Process-wide exchange-rate cache with single-flight refresh.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Clone)]
pub struct RateCache {
    inner: Arc<Inner>,
}

impl RateCache {
    /// Creates a cache pre-seeded with `fallback`; the pair is taken from it.
    pub fn new(provider: Arc<dyn RateProvider>, fallback: ExchangeRate) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                base: fallback.base.clone(),
                quote: fallback.quote.clone(),
                state: RwLock::new(RateCacheState {
                    value: fallback,
                    loading: false,
                    error: None,
                }),
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.build_provider(), config.fallback_exchange_rate())
    }

    /// Installs the process-wide cache. Only the first call takes effect;
    /// later calls return the cache that is already installed.
    pub fn install_global(cache: RateCache) -> &'static RateCache {
        if GLOBAL_RATE_CACHE.get().is_some() {
            warn!("Global rate cache already installed, ignoring new instance");
        }
        GLOBAL_RATE_CACHE.get_or_init(|| cache)
    }

    pub fn global() -> Option<&'static RateCache> {
        GLOBAL_RATE_CACHE.get()
    }

    /// The current rate. Never blocks on a fetch and never fails.
    pub fn get(&self) -> ExchangeRate {
        self.inner.read_state().value.clone()
    }

    pub fn state(&self) -> RateCacheState {
        self.inner.read_state().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read_state().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.read_state().error.clone()
    }

    /// Converts `amount` from the base into the quote currency at the current rate.
    pub fn convert(&self, amount: Decimal) -> Decimal {
        self.inner.read_state().value.convert(amount)
    }

    /// Fetches a fresh rate, or joins the fetch already in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn refresh(&self) -> RefreshOutcome {
        let fetch = self.start_or_join();
        fetch.await
    }

    fn start_or_join(&self) -> InFlightFetch {
        let mut in_flight = self.inner.lock_in_flight();
        if let Some(fetch) = in_flight.as_ref() {
            debug!("Exchange rate fetch already in flight, joining it");
            return fetch.clone();
        }

        {
            let mut state = self.inner.write_state();
            state.loading = true;
            state.error = None;
        }
        debug!(
            "Fetching exchange rate {}/{} from {}",
            self.inner.base,
            self.inner.quote,
            self.inner.provider.id()
        );

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let fetch = inner.provider.latest_rate(&inner.base, &inner.quote);
            match AssertUnwindSafe(fetch).catch_unwind().await {
                Ok(result) => inner.commit(result),
                Err(_) => inner.abandon("rate provider panicked"),
            }
        });

        let inner = Arc::clone(&self.inner);
        let fetch = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => inner.abandon(&e.to_string()),
            }
        }
        .boxed()
        .shared();

        *in_flight = Some(fetch.clone());
        fetch
    }
}
