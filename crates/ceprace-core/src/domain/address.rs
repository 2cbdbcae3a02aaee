use serde::{Deserialize, Serialize};

/// Provider-neutral address every adapter normalizes into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    pub code: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub region: String,
}

impl NormalizedAddress {
    pub fn new(
        code: impl Into<String>,
        street: impl Into<String>,
        neighborhood: impl Into<String>,
        city: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            street: street.into(),
            neighborhood: neighborhood.into(),
            city: city.into(),
            region: region.into(),
        }
    }

    /// An address counts as found only when a descriptive field is present.
    ///
    /// `code` and `region` are ignored: providers echo them back even for
    /// unknown postal codes.
    pub fn is_found(&self) -> bool {
        !(self.street.is_empty() && self.neighborhood.is_empty() && self.city.is_empty())
    }
}
