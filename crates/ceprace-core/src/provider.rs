//! Provider adapter contract and the types exchanged with the race coordinator.
//!
//! Every address provider implements [`AddressSource`]. A single call to
//! [`AddressSource::lookup`] performs exactly one outbound request and always
//! resolves to a [`ProviderResult`]; failures are carried inside it rather
//! than surfaced as a separate error channel.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Serialize, Serializer};
use tokio::time::Instant;

use crate::{LookupKey, NormalizedAddress, ProviderId};

/// Provider-local error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupErrorKind {
    RequestConstructionFailed,
    TransportFailed,
    DecodeFailed,
    NotFound,
}

/// Structured error produced by a single provider lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    kind: LookupErrorKind,
    message: String,
}

impl LookupError {
    pub fn request_construction_failed(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::RequestConstructionFailed,
            message: message.into(),
        }
    }

    pub fn transport_failed(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::TransportFailed,
            message: message.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::DecodeFailed,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            kind: LookupErrorKind::NotFound,
            message: String::from("postal code not found"),
        }
    }

    pub const fn kind(&self) -> LookupErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            LookupErrorKind::RequestConstructionFailed => "lookup.request_construction_failed",
            LookupErrorKind::TransportFailed => "lookup.transport_failed",
            LookupErrorKind::DecodeFailed => "lookup.decode_failed",
            LookupErrorKind::NotFound => "lookup.not_found",
        }
    }
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for LookupError {}

impl Serialize for LookupError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("LookupError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// Shared, read-only execution context for one race.
///
/// The deadline is the only cancellation signal: adapters refuse to start
/// once it has passed and bound in-flight calls by the time remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupContext {
    deadline: Instant,
}

impl LookupContext {
    pub fn with_deadline(deadline: Instant) -> Self {
        Self { deadline }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, or `None` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        (!remaining.is_zero()).then_some(remaining)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }
}

/// Completed lookup delivered to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub provider: ProviderId,
    pub outcome: Result<NormalizedAddress, LookupError>,
}

impl ProviderResult {
    pub fn found(provider: ProviderId, address: NormalizedAddress) -> Self {
        Self {
            provider,
            outcome: Ok(address),
        }
    }

    pub fn failed(provider: ProviderId, error: LookupError) -> Self {
        Self {
            provider,
            outcome: Err(error),
        }
    }

    pub fn address(&self) -> Option<&NormalizedAddress> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&LookupError> {
        self.outcome.as_ref().err()
    }
}

/// Address provider adapter contract.
///
/// Implementations must be `Send + Sync`; the coordinator shares them across
/// spawned tasks behind an `Arc`.
pub trait AddressSource: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Builds the request URL for `key`. The key is appended verbatim.
    fn endpoint(&self, key: &LookupKey) -> String;

    /// Decodes a raw response body into the normalized shape.
    ///
    /// # Errors
    ///
    /// - [`LookupErrorKind::DecodeFailed`] when the body is not the expected JSON
    /// - [`LookupErrorKind::NotFound`] when the decoded address fails the found check
    fn parse_response(&self, body: &str) -> Result<NormalizedAddress, LookupError>;

    /// Performs exactly one request for `key` under `ctx`.
    fn lookup<'a>(
        &'a self,
        ctx: LookupContext,
        key: LookupKey,
    ) -> Pin<Box<dyn Future<Output = ProviderResult> + Send + 'a>>;
}
