use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use super::{decode_json, lookup_with};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::provider::{AddressSource, LookupContext, LookupError, ProviderResult};
use crate::{LookupKey, NormalizedAddress, ProviderId};

/// BrasilAPI CEP v1 adapter.
#[derive(Clone)]
pub struct BrasilApiAdapter {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
}

impl BrasilApiAdapter {
    pub const DEFAULT_BASE_URL: &'static str = "https://brasilapi.com.br/api/cep/v1/";

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url: String::from(Self::DEFAULT_BASE_URL),
            http_client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for BrasilApiAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl AddressSource for BrasilApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::BrasilApi
    }

    fn endpoint(&self, key: &LookupKey) -> String {
        format!("{}{}", self.base_url, key.as_str())
    }

    fn parse_response(&self, body: &str) -> Result<NormalizedAddress, LookupError> {
        let payload: BrasilApiPayload = decode_json("brasilapi", body)?;
        let address = payload.normalize();
        if !address.is_found() {
            return Err(LookupError::not_found());
        }
        Ok(address)
    }

    fn lookup<'a>(
        &'a self,
        ctx: LookupContext,
        key: LookupKey,
    ) -> Pin<Box<dyn Future<Output = ProviderResult> + Send + 'a>> {
        Box::pin(lookup_with(self, self.http_client.as_ref(), ctx, key))
    }
}

/// Native BrasilAPI body. Missing or null fields decode as empty.
#[derive(Debug, Clone, Default, Deserialize)]
struct BrasilApiPayload {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    neighborhood: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl BrasilApiPayload {
    fn normalize(self) -> NormalizedAddress {
        NormalizedAddress {
            code: self.cep.unwrap_or_default(),
            street: self.street.unwrap_or_default(),
            neighborhood: self.neighborhood.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            region: self.state.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::LookupErrorKind;

    fn adapter() -> BrasilApiAdapter {
        BrasilApiAdapter::default()
    }

    #[test]
    fn endpoint_appends_key_verbatim() {
        let key = LookupKey::parse("01001-000").expect("valid key");
        assert_eq!(
            adapter().endpoint(&key),
            "https://brasilapi.com.br/api/cep/v1/01001-000"
        );
    }

    #[test]
    fn maps_native_fields_onto_normalized_address() {
        let body = r#"{"cep":"01001000","state":"SP","city":"São Paulo","neighborhood":"Sé","street":"Praça da Sé","service":"open-cep"}"#;

        let address = adapter().parse_response(body).expect("address should parse");
        assert_eq!(
            address,
            NormalizedAddress::new("01001000", "Praça da Sé", "Sé", "São Paulo", "SP")
        );
    }

    #[test]
    fn service_error_body_is_not_found() {
        let body = r#"{"name":"CepPromiseError","message":"Todos os serviços de CEP retornaram erro.","type":"service_error","errors":[]}"#;

        let error = adapter().parse_response(body).expect_err("must be not found");
        assert_eq!(error.kind(), LookupErrorKind::NotFound);
    }

    #[test]
    fn null_fields_count_as_empty() {
        let body = r#"{"cep":"70000000","state":"DF","city":"Brasília","neighborhood":null,"street":null}"#;

        let address = adapter().parse_response(body).expect("city alone is enough");
        assert_eq!(address.street, "");
        assert_eq!(address.city, "Brasília");
    }

    #[test]
    fn non_object_body_is_decode_failure() {
        let error = adapter()
            .parse_response("<html>502 Bad Gateway</html>")
            .expect_err("must fail to decode");
        assert_eq!(error.kind(), LookupErrorKind::DecodeFailed);
    }
}
