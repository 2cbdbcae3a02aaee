//! # Domain Models
//!
//! Canonical types shared by every provider adapter and the race coordinator.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LookupKey`] | Caller-supplied postal code, passed through opaquely |
//! | [`NormalizedAddress`] | Provider-neutral address shape |

mod address;
mod lookup_key;

pub use address::NormalizedAddress;
pub use lookup_key::LookupKey;
