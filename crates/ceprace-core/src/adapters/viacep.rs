use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use super::{decode_json, lookup_with};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::provider::{AddressSource, LookupContext, LookupError, ProviderResult};
use crate::{LookupKey, NormalizedAddress, ProviderId};

/// ViaCEP JSON web service adapter.
#[derive(Clone)]
pub struct ViaCepAdapter {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
}

impl ViaCepAdapter {
    pub const DEFAULT_BASE_URL: &'static str = "http://viacep.com.br/ws/";

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

impl Default for ViaCepAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl AddressSource for ViaCepAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::ViaCep
    }

    fn endpoint(&self, key: &LookupKey) -> String {
        format!("{}{}/json/", self.base_url, key.as_str())
    }

    fn parse_response(&self, body: &str) -> Result<NormalizedAddress, LookupError> {
        let payload: ViaCepPayload = decode_json("viacep", body)?;
        let address = payload.normalize();
        // `{"erro": true}` carries no address fields and lands here too.
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

#[derive(Debug, Clone, Default, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

impl ViaCepPayload {
    fn normalize(self) -> NormalizedAddress {
        NormalizedAddress {
            code: self.cep.unwrap_or_default(),
            street: self.logradouro.unwrap_or_default(),
            neighborhood: self.bairro.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            region: self.uf.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::LookupErrorKind;

    #[test]
    fn endpoint_wraps_key_in_json_path() {
        let adapter = ViaCepAdapter::default().with_base_url("http://localhost:9/ws/");
        let key = LookupKey::parse("01001000").expect("valid key");
        assert_eq!(adapter.endpoint(&key), "http://localhost:9/ws/01001000/json/");
    }

    #[test]
    fn maps_portuguese_fields() {
        let body = r#"{
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        }"#;

        let address = ViaCepAdapter::default()
            .parse_response(body)
            .expect("address should parse");
        assert_eq!(
            address,
            NormalizedAddress::new("01001-000", "Praça da Sé", "Sé", "São Paulo", "SP")
        );
    }

    #[test]
    fn erro_flag_is_not_found() {
        let error = ViaCepAdapter::default()
            .parse_response(r#"{"erro": true}"#)
            .expect_err("must be not found");
        assert_eq!(error.kind(), LookupErrorKind::NotFound);
    }

    #[test]
    fn wrong_field_type_is_decode_failure() {
        let error = ViaCepAdapter::default()
            .parse_response(r#"{"cep": 1001000, "logradouro": "Praça da Sé"}"#)
            .expect_err("must fail to decode");
        assert_eq!(error.kind(), LookupErrorKind::DecodeFailed);
    }
}
