use std::io::Write;
use std::time::Duration;

use ceprace_core::RaceOutcome;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render<W: Write>(
    outcome: &RaceOutcome,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => out.write_all(render_text(outcome).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, outcome)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn render_text(outcome: &RaceOutcome) -> String {
    match outcome {
        RaceOutcome::Winner { provider, address } => format!(
            "{provider} answered first\nAddress: cep={}, street={}, neighborhood={}, city={}, region={}\n",
            address.code, address.street, address.neighborhood, address.city, address.region
        ),
        RaceOutcome::AllFailed { failures } if failures.is_empty() => {
            String::from("Error: no provider produced a result\n")
        }
        RaceOutcome::AllFailed { failures } => failures
            .iter()
            .map(|failure| format!("Error from {}: {}\n", failure.provider, failure.error))
            .collect(),
        RaceOutcome::TimedOut { timeout_ms } => format!(
            "Timeout: no provider responded within {}.\n",
            format_duration(Duration::from_millis(*timeout_ms))
        ),
    }
}

fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis > 0 && millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceprace_core::{LookupError, NormalizedAddress, ProviderFailure, ProviderId};

    fn text(outcome: &RaceOutcome) -> String {
        let mut out = Vec::new();
        render(outcome, OutputFormat::Text, &mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn winner_names_provider_and_all_fields() {
        let outcome = RaceOutcome::Winner {
            provider: ProviderId::BrasilApi,
            address: NormalizedAddress::new("01001000", "Praça da Sé", "Sé", "São Paulo", "SP"),
        };

        assert_eq!(
            text(&outcome),
            "BrasilAPI answered first\nAddress: cep=01001000, street=Praça da Sé, neighborhood=Sé, city=São Paulo, region=SP\n"
        );
    }

    #[test]
    fn failure_cites_provider_and_error_code() {
        let outcome = RaceOutcome::AllFailed {
            failures: vec![ProviderFailure {
                provider: ProviderId::ViaCep,
                error: LookupError::not_found(),
            }],
        };

        assert_eq!(
            text(&outcome),
            "Error from ViaCEP: postal code not found (lookup.not_found)\n"
        );
    }

    #[test]
    fn timeout_prints_whole_seconds_compactly() {
        assert_eq!(
            text(&RaceOutcome::timed_out(Duration::from_secs(1))),
            "Timeout: no provider responded within 1s.\n"
        );
        assert_eq!(
            text(&RaceOutcome::timed_out(Duration::from_millis(1500))),
            "Timeout: no provider responded within 1500ms.\n"
        );
    }

    #[test]
    fn json_output_is_status_tagged() {
        let outcome = RaceOutcome::AllFailed {
            failures: vec![ProviderFailure {
                provider: ProviderId::BrasilApi,
                error: LookupError::decode_failed("expected value"),
            }],
        };
        let mut out = Vec::new();
        render(&outcome, OutputFormat::Json, &mut out).expect("render");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(value["status"], "all_failed");
        assert_eq!(value["failures"][0]["provider"], "brasilapi");
        assert_eq!(value["failures"][0]["error"]["code"], "lookup.decode_failed");
    }
}
