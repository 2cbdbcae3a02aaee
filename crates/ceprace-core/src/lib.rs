//! # ceprace Core
//!
//! Concurrent postal-code lookup across independent address providers.
//!
//! ## Overview
//!
//! A lookup key is sent to every configured provider at once. Each provider
//! adapter normalizes its own JSON schema into a [`NormalizedAddress`], and
//! the [`RaceCoordinator`] resolves the first result to arrive (or the shared
//! deadline) into a single [`RaceOutcome`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (BrasilAPI, ViaCEP) |
//! | [`domain`] | Lookup key and normalized address |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`provider`] | Adapter trait, lookup context, provider results |
//! | [`race`] | Race coordinator, policy and builder |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ceprace_core::{LookupKey, RaceCoordinatorBuilder, RaceOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = RaceCoordinatorBuilder::new().with_env_overrides().build();
//!     let key = LookupKey::parse("01001000")?;
//!
//!     if let RaceOutcome::Winner { provider, address } = coordinator.race(&key).await {
//!         println!("{provider}: {}", address.street);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐   mpsc    ┌──────────────────┐
//! │ Race Coordinator│◀──────────│ Provider tasks   │
//! │ (deadline)      │           │ (one per source) │
//! └─────────────────┘           └────────┬─────────┘
//!                                        │
//!                                        ▼
//!                               ┌──────────────────┐
//!                               │ HTTP Client      │
//!                               │ (shared reqwest) │
//!                               └──────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod race;
pub mod source;

pub use adapters::{BrasilApiAdapter, ViaCepAdapter};

pub use domain::{LookupKey, NormalizedAddress};

pub use error::ValidationError;

pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use provider::{
    AddressSource, LookupContext, LookupError, LookupErrorKind, ProviderResult,
};

pub use race::{
    ProviderFailure, RaceConfig, RaceCoordinator, RaceCoordinatorBuilder, RaceOutcome,
    RacePolicy,
};

pub use source::ProviderId;
