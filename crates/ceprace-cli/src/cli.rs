//! CLI argument definitions for ceprace.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `CEP` | prompt | Postal code to look up |
//! | `--timeout-ms` | `1000` | Shared race deadline in ms |
//! | `--policy` | `first-arrival` | How a fast failure is treated |
//! | `--provider` | all | Providers to race (repeatable) |
//! | `--format` | `text` | Output format (text, json) |
//!
//! # Examples
//!
//! ```bash
//! ceprace 01001000
//! ceprace 01001000 --timeout-ms 2500 --policy first-success
//! ceprace --provider viacep --format json
//! ```

use std::str::FromStr;

use clap::{Parser, ValueEnum};

use ceprace_core::{ProviderId, RacePolicy};

/// Race BrasilAPI and ViaCEP for a postal code and print whichever answers first.
#[derive(Debug, Parser)]
#[command(name = "ceprace", author, version, about)]
pub struct Cli {
    /// Postal code to look up. Prompted for on stdin when omitted.
    #[arg(value_name = "CEP")]
    pub cep: Option<String>,

    /// Shared deadline for all providers, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Race resolution policy.
    ///
    /// - first-arrival: the first provider to answer decides, even with an error
    /// - first-success: keep waiting past failures until one provider succeeds
    #[arg(long, value_enum, default_value_t = PolicySelector::FirstArrival)]
    pub policy: PolicySelector,

    /// Restrict the race to these providers (brasilapi, viacep). Repeat to
    /// select several.
    #[arg(long = "provider", value_name = "PROVIDER", value_parser = ProviderId::from_str)]
    pub providers: Vec<ProviderId>,

    /// Output format for the outcome.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicySelector {
    FirstArrival,
    FirstSuccess,
}

impl From<PolicySelector> for RacePolicy {
    fn from(value: PolicySelector) -> Self {
        match value {
            PolicySelector::FirstArrival => Self::FirstArrival,
            PolicySelector::FirstSuccess => Self::FirstSuccess,
        }
    }
}

impl Cli {
    /// Selected providers, defaulting to every bundled provider.
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        if self.providers.is_empty() {
            return ProviderId::ALL.to_vec();
        }
        let mut selected = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            if !selected.contains(provider) {
                selected.push(*provider);
            }
        }
        selected
    }
}
