//! Scripted transport shared by the integration suites.
#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ceprace_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, RaceCoordinator, RaceCoordinatorBuilder,
    RacePolicy,
};

pub const BRASILAPI_BASE: &str = "http://brasilapi.test/api/cep/v1/";
pub const VIACEP_BASE: &str = "http://viacep.test/ws/";

pub const SE_BRASILAPI: &str = r#"{"cep":"01001000","street":"Praça da Sé","neighborhood":"Sé","city":"São Paulo","state":"SP"}"#;
pub const SE_VIACEP: &str = r#"{"cep":"01001-000","logradouro":"Praça da Sé","bairro":"Sé","localidade":"São Paulo","uf":"SP"}"#;

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    delay: Duration,
    response: Result<HttpResponse, HttpError>,
}

/// Answers requests by URL prefix after an optional delay, recording each one.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    routes: Vec<Route>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(
        mut self,
        prefix: &str,
        delay_ms: u64,
        response: Result<HttpResponse, HttpError>,
    ) -> Self {
        self.routes.push(Route {
            prefix: prefix.to_owned(),
            delay: Duration::from_millis(delay_ms),
            response,
        });
        self
    }

    pub fn json(self, prefix: &str, delay_ms: u64, body: &str) -> Self {
        self.respond(prefix, delay_ms, Ok(HttpResponse::ok_json(body)))
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let route = self
            .routes
            .iter()
            .find(|route| request.url.starts_with(&route.prefix))
            .cloned();
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);

        Box::pin(async move {
            let Some(route) = route else {
                return Err(HttpError::transport("connection refused"));
            };
            tokio::time::sleep(route.delay).await;
            route.response
        })
    }
}

pub fn coordinator(
    client: Arc<ScriptedHttpClient>,
    timeout_ms: u64,
    policy: RacePolicy,
) -> RaceCoordinator {
    RaceCoordinatorBuilder::new()
        .with_http_client(client)
        .with_brasilapi_base_url(BRASILAPI_BASE)
        .with_viacep_base_url(VIACEP_BASE)
        .with_timeout(Duration::from_millis(timeout_ms))
        .with_policy(policy)
        .build()
}
