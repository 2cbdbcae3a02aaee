//! Address provider adapters.
//!
//! Each adapter owns its endpoint template and native response schema. The
//! request path ([`lookup_with`]) is shared so every provider honors the
//! same deadline and error mapping.

mod brasilapi;
mod viacep;

pub use brasilapi::BrasilApiAdapter;
pub use viacep::ViaCepAdapter;

use tracing::debug;

use crate::http_client::{HttpClient, HttpErrorKind, HttpRequest};
use crate::provider::{AddressSource, LookupContext, LookupError, ProviderResult};
use crate::LookupKey;

/// Runs one lookup for `source`: build the endpoint, fetch it, decode it.
pub(crate) async fn lookup_with<S>(
    source: &S,
    http_client: &dyn HttpClient,
    ctx: LookupContext,
    key: LookupKey,
) -> ProviderResult
where
    S: AddressSource + ?Sized,
{
    let provider = source.id();
    let endpoint = source.endpoint(&key);

    let outcome = match fetch_body(http_client, ctx, &endpoint).await {
        Ok(body) => source.parse_response(&body),
        Err(error) => Err(error),
    };

    match &outcome {
        Ok(_) => debug!(provider = provider.as_str(), "provider returned an address"),
        Err(error) => debug!(provider = provider.as_str(), code = error.code(), %error, "provider lookup failed"),
    }

    ProviderResult { provider, outcome }
}

async fn fetch_body(
    http_client: &dyn HttpClient,
    ctx: LookupContext,
    endpoint: &str,
) -> Result<String, LookupError> {
    reqwest::Url::parse(endpoint).map_err(|e| {
        LookupError::request_construction_failed(format!("invalid endpoint '{endpoint}': {e}"))
    })?;

    let Some(remaining) = ctx.remaining() else {
        return Err(LookupError::transport_failed(
            "lookup deadline expired before the request was sent",
        ));
    };

    let request = HttpRequest::get(endpoint)
        .with_header("accept", "application/json")
        .with_timeout(remaining);

    let response = tokio::time::timeout(remaining, http_client.execute(request))
        .await
        .map_err(|_| LookupError::transport_failed("lookup deadline exceeded while awaiting response"))?
        .map_err(|error| match error.kind() {
            HttpErrorKind::InvalidRequest => {
                LookupError::request_construction_failed(error.message())
            }
            HttpErrorKind::Transport | HttpErrorKind::Timeout => {
                LookupError::transport_failed(error.message())
            }
        })?;

    // Providers report unknown codes with JSON bodies on both 200 and 404, so
    // the status never short-circuits decoding.
    debug!(status = response.status, endpoint, "provider responded");
    Ok(response.body)
}

/// Decodes a provider body, mapping any serde failure to `DecodeFailed`.
pub(crate) fn decode_json<T>(provider: &str, body: &str) -> Result<T, LookupError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        LookupError::decode_failed(format!("failed to parse {provider} response: {e}"))
    })
}
