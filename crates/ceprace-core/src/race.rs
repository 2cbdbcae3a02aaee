//! Concurrent provider race.
//!
//! One task per provider delivers its [`ProviderResult`] into a shared
//! channel; the coordinator resolves the first result (or, under
//! [`RacePolicy::FirstSuccess`], the first address) against one deadline.
//! Results already queued when the deadline fires still count if they were
//! delivered before it.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::adapters::{BrasilApiAdapter, ViaCepAdapter};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::provider::{AddressSource, LookupContext, LookupError, ProviderResult};
use crate::{LookupKey, NormalizedAddress, ProviderId};

pub const BRASILAPI_BASE_URL_ENV: &str = "CEPRACE_BRASILAPI_BASE_URL";
pub const VIACEP_BASE_URL_ENV: &str = "CEPRACE_VIACEP_BASE_URL";

/// How the coordinator treats a provider failure that arrives first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RacePolicy {
    /// The first result to arrive ends the race, success or not.
    #[default]
    FirstArrival,
    /// Failures are collected until a provider succeeds or all have failed.
    FirstSuccess,
}

/// Race tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceConfig {
    pub timeout: Duration,
    pub policy: RacePolicy,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
            policy: RacePolicy::FirstArrival,
        }
    }
}

/// A provider's contribution to a failed race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub provider: ProviderId,
    pub error: LookupError,
}

/// Single resolved outcome of one race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RaceOutcome {
    Winner {
        provider: ProviderId,
        address: NormalizedAddress,
    },
    /// Failures in arrival order. Under [`RacePolicy::FirstArrival`] this holds
    /// only the failure that ended the race.
    AllFailed { failures: Vec<ProviderFailure> },
    TimedOut { timeout_ms: u64 },
}

impl RaceOutcome {
    pub fn timed_out(timeout: Duration) -> Self {
        Self::TimedOut {
            timeout_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
        }
    }

    pub fn winner(&self) -> Option<(ProviderId, &NormalizedAddress)> {
        match self {
            Self::Winner { provider, address } => Some((*provider, address)),
            _ => None,
        }
    }

    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            Self::AllFailed { failures } => failures,
            _ => &[],
        }
    }

    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Fans one lookup out to every configured provider and resolves the race.
pub struct RaceCoordinator {
    sources: Vec<Arc<dyn AddressSource>>,
    config: RaceConfig,
}

impl Default for RaceCoordinator {
    fn default() -> Self {
        RaceCoordinatorBuilder::new().build()
    }
}

impl RaceCoordinator {
    pub fn new(sources: Vec<Arc<dyn AddressSource>>, config: RaceConfig) -> Self {
        Self { sources, config }
    }

    pub fn providers(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    pub const fn config(&self) -> RaceConfig {
        self.config
    }

    /// Races all providers for `key` under the configured timeout.
    pub async fn race(&self, key: &LookupKey) -> RaceOutcome {
        let ctx = LookupContext::with_timeout(self.config.timeout);
        self.run(key, ctx, self.config.timeout).await
    }

    /// Races all providers against an explicit deadline.
    pub async fn race_until(&self, key: &LookupKey, deadline: Instant) -> RaceOutcome {
        let timeout = deadline.saturating_duration_since(Instant::now());
        self.run(key, LookupContext::with_deadline(deadline), timeout)
            .await
    }

    async fn run(&self, key: &LookupKey, ctx: LookupContext, timeout: Duration) -> RaceOutcome {
        if ctx.is_expired() {
            info!(key = key.as_str(), "deadline already expired; no provider dispatched");
            return RaceOutcome::timed_out(timeout);
        }

        // Each result is stamped on delivery so a late-polled coordinator can
        // tell results that beat the deadline from ones produced by it.
        let (tx, mut rx) = mpsc::channel::<(Instant, ProviderResult)>(self.sources.len().max(1));
        for source in &self.sources {
            let source = Arc::clone(source);
            let tx = tx.clone();
            let key = key.clone();
            debug!(provider = source.id().as_str(), key = key.as_str(), "dispatching lookup");

            tokio::spawn(async move {
                let result = source.lookup(ctx, key).await;
                let provider = result.provider;
                if tx.send((Instant::now(), result)).await.is_err() {
                    debug!(provider = provider.as_str(), "race already resolved; discarding late result");
                }
            });
        }
        drop(tx);

        let deadline = tokio::time::sleep_until(ctx.deadline());
        tokio::pin!(deadline);
        let mut failures = Vec::new();

        let outcome = loop {
            tokio::select! {
                biased;

                _ = &mut deadline => {
                    let mut resolved = None;
                    while let Ok((delivered_at, result)) = rx.try_recv() {
                        if delivered_at >= ctx.deadline() {
                            continue;
                        }
                        resolved = self.absorb(result, &mut failures);
                        if resolved.is_some() {
                            break;
                        }
                    }
                    break resolved.unwrap_or_else(|| RaceOutcome::timed_out(timeout));
                }
                received = rx.recv() => {
                    let Some((_, result)) = received else {
                        break RaceOutcome::AllFailed { failures };
                    };
                    if let Some(outcome) = self.absorb(result, &mut failures) {
                        break outcome;
                    }
                }
            }
        };

        match &outcome {
            RaceOutcome::Winner { provider, .. } => {
                info!(provider = provider.as_str(), "race won")
            }
            RaceOutcome::AllFailed { failures } => {
                info!(failures = failures.len(), "race ended without an address")
            }
            RaceOutcome::TimedOut { timeout_ms } => info!(timeout_ms, "race timed out"),
        }
        outcome
    }

    /// Applies one delivered result under the configured policy, returning the
    /// outcome once the race is decided.
    fn absorb(
        &self,
        result: ProviderResult,
        failures: &mut Vec<ProviderFailure>,
    ) -> Option<RaceOutcome> {
        let ProviderResult { provider, outcome } = result;
        match outcome {
            Ok(address) => Some(RaceOutcome::Winner { provider, address }),
            Err(error) => {
                failures.push(ProviderFailure { provider, error });
                let decided = self.config.policy == RacePolicy::FirstArrival
                    || failures.len() >= self.sources.len();
                decided.then(|| RaceOutcome::AllFailed {
                    failures: std::mem::take(failures),
                })
            }
        }
    }
}

/// Builder wiring the bundled providers to one shared transport.
///
/// # Environment Variables
///
/// | Provider | Env Var |
/// |----------|---------|
/// | BrasilAPI | `CEPRACE_BRASILAPI_BASE_URL` |
/// | ViaCEP | `CEPRACE_VIACEP_BASE_URL` |
///
/// Base URLs must end with the path separator the key is appended to.
pub struct RaceCoordinatorBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    brasilapi_base_url: Option<String>,
    viacep_base_url: Option<String>,
    enable_brasilapi: bool,
    enable_viacep: bool,
    config: RaceConfig,
}

impl Default for RaceCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceCoordinatorBuilder {
    pub fn new() -> Self {
        Self {
            http_client: None,
            brasilapi_base_url: None,
            viacep_base_url: None,
            enable_brasilapi: true,
            enable_viacep: true,
            config: RaceConfig::default(),
        }
    }

    /// Reads base URL overrides from the environment. Unset variables keep
    /// whatever is already configured.
    pub fn with_env_overrides(self) -> Self {
        self.with_env_overrides_from(|name| env::var(name).ok())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides) with an
    /// explicit variable lookup.
    pub fn with_env_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BRASILAPI_BASE_URL_ENV) {
            self.brasilapi_base_url = Some(url);
        }
        if let Some(url) = lookup(VIACEP_BASE_URL_ENV) {
            self.viacep_base_url = Some(url);
        }
        self
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_brasilapi_base_url(mut self, url: impl Into<String>) -> Self {
        self.brasilapi_base_url = Some(url.into());
        self
    }

    pub fn with_viacep_base_url(mut self, url: impl Into<String>) -> Self {
        self.viacep_base_url = Some(url.into());
        self
    }

    /// Enables exactly the listed providers.
    pub fn with_providers(mut self, providers: &[ProviderId]) -> Self {
        self.enable_brasilapi = providers.contains(&ProviderId::BrasilApi);
        self.enable_viacep = providers.contains(&ProviderId::ViaCep);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_policy(mut self, policy: RacePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn build(self) -> RaceCoordinator {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let mut sources: Vec<Arc<dyn AddressSource>> = Vec::with_capacity(2);

        if self.enable_brasilapi {
            let mut adapter = BrasilApiAdapter::with_http_client(Arc::clone(&http_client));
            if let Some(url) = self.brasilapi_base_url {
                adapter = adapter.with_base_url(url);
            }
            sources.push(Arc::new(adapter));
        }

        if self.enable_viacep {
            let mut adapter = ViaCepAdapter::with_http_client(Arc::clone(&http_client));
            if let Some(url) = self.viacep_base_url {
                adapter = adapter.with_base_url(url);
            }
            sources.push(Arc::new(adapter));
        }

        RaceCoordinator::new(sources, self.config)
    }
}
