use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical identifiers for the address providers taking part in a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    BrasilApi,
    ViaCep,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::BrasilApi, Self::ViaCep];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrasilApi => "brasilapi",
            Self::ViaCep => "viacep",
        }
    }

    /// Human-facing name used when rendering outcomes.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BrasilApi => "BrasilAPI",
            Self::ViaCep => "ViaCEP",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "brasilapi" => Ok(Self::BrasilApi),
            "viacep" => Ok(Self::ViaCep),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_machine_names_case_insensitively() {
        assert_eq!("BrasilAPI".parse::<ProviderId>(), Ok(ProviderId::BrasilApi));
        assert_eq!(" viacep ".parse::<ProviderId>(), Ok(ProviderId::ViaCep));
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "correios".parse::<ProviderId>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidProvider { .. }));
    }

    #[test]
    fn display_uses_human_name() {
        assert_eq!(ProviderId::ViaCep.to_string(), "ViaCEP");
        assert_eq!(ProviderId::ViaCep.as_str(), "viacep");
    }
}
