//! HTTP client for the core backend.
//!
//! JSON request/response over `POST`; the auth status subscription is a
//! newline-delimited JSON stream.

use super::{
    AccountService, AuthEvent, AuthEventStream, CatalogQuery, ConfigService, ModelCatalog,
    ModelCatalogService, Organization,
};
use crate::config::CoreConfig;
use crate::error::ServiceError;
use crate::merge::{Mode, ProviderUpdate};
use crate::provider::Provider;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const CORE_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpBackend {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

#[derive(Deserialize)]
struct StringValue {
    value: String,
}

#[derive(Deserialize)]
struct OrganizationsResponse {
    #[serde(default)]
    organizations: Vec<Organization>,
}

#[derive(Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    models: ModelCatalog,
}

#[derive(Deserialize)]
struct ModeResponse {
    mode: Mode,
}

#[derive(Serialize)]
struct ProviderUpdateRequest<'a> {
    mode: Mode,
    provider: Provider,
    update: &'a ProviderUpdate,
}

/// One line of the auth status stream
#[derive(Deserialize)]
struct AuthStatusFrame {
    #[serde(default)]
    user: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &CoreConfig) -> Result<Self, ServiceError> {
        // No client-wide timeout: the auth status stream stays open for minutes.
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(CORE_HTTP_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.address.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        path: &str,
        body: serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, ServiceError> {
        debug!(path, "Core request");
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn call<R: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<R, ServiceError> {
        let response = self.send(path, body, Some(self.request_timeout)).await?;
        response
            .json::<R>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn call_empty(&self, path: &str, body: serde_json::Value) -> Result<(), ServiceError> {
        self.send(path, body, Some(self.request_timeout)).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountService for HttpBackend {
    async fn initiate_login(&self) -> Result<String, ServiceError> {
        let response: StringValue = self.call("/account/login", json!({})).await?;
        Ok(response.value)
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        self.call_empty("/account/logout", json!({})).await
    }

    async fn check_credentials(&self) -> Result<(), ServiceError> {
        self.call_empty("/account/credits", json!({})).await
    }

    async fn subscribe_auth_status(&self) -> Result<AuthEventStream, ServiceError> {
        let response = self.send("/account/auth-status", json!({}), None).await?;
        Ok(ndjson_auth_events(response.bytes_stream()))
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, ServiceError> {
        let response: OrganizationsResponse =
            self.call("/account/organizations", json!({})).await?;
        Ok(response.organizations)
    }

    async fn set_organization(&self, organization_id: Option<&str>) -> Result<(), ServiceError> {
        self.call_empty(
            "/account/organization",
            json!({ "organization_id": organization_id }),
        )
        .await
    }
}

#[async_trait]
impl ConfigService for HttpBackend {
    async fn apply_provider_update(
        &self,
        mode: Mode,
        provider: Provider,
        update: &ProviderUpdate,
    ) -> Result<(), ServiceError> {
        let body = serde_json::to_value(ProviderUpdateRequest {
            mode,
            provider,
            update,
        })
        .map_err(|e| ServiceError::Decode(e.to_string()))?;
        self.call_empty("/state/provider", body).await
    }

    async fn current_mode(&self) -> Result<Mode, ServiceError> {
        let response: ModeResponse = self.call("/state/mode", json!({})).await?;
        Ok(response.mode)
    }

    async fn set_onboarding_completed(&self, completed: bool) -> Result<(), ServiceError> {
        self.call_empty("/state/welcome-completed", json!({ "value": completed }))
            .await
    }
}

#[async_trait]
impl ModelCatalogService for HttpBackend {
    async fn fetch_catalog(&self, query: &CatalogQuery) -> Result<ModelCatalog, ServiceError> {
        let body = serde_json::to_value(query).map_err(|e| ServiceError::Decode(e.to_string()))?;
        let response: CatalogResponse = self.call("/models/catalog", body).await?;
        Ok(response.models)
    }
}

fn parse_auth_status_line(line: &str) -> Result<AuthEvent, ServiceError> {
    let frame: AuthStatusFrame = serde_json::from_str(line)
        .map_err(|e| ServiceError::Decode(format!("Invalid auth status event: {}", e)))?;
    let authenticated = frame.user.map(|u| !u.is_null()).unwrap_or(false);
    Ok(AuthEvent {
        authenticated,
        reason: frame.error,
    })
}

/// Split a byte stream on newlines and decode each non-blank line as an auth event.
pub(crate) fn ndjson_auth_events<S, B, E>(bytes: S) -> AuthEventStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ServiceError> + Send + 'static,
{
    let state = (Box::pin(bytes), Vec::<u8>::new(), false);
    Box::pin(futures::stream::unfold(
        state,
        |(mut bytes, mut buffer, mut finished)| async move {
            loop {
                if let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let text = String::from_utf8_lossy(&line);
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let event = parse_auth_status_line(text);
                    return Some((event, (bytes, buffer, finished)));
                }
                if finished {
                    let rest = String::from_utf8_lossy(&buffer).trim().to_string();
                    buffer.clear();
                    if rest.is_empty() {
                        return None;
                    }
                    return Some((parse_auth_status_line(&rest), (bytes, buffer, finished)));
                }
                match bytes.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(chunk.as_ref()),
                    Some(Err(e)) => {
                        return Some((Err(e.into()), (bytes, buffer, true)));
                    }
                    None => finished = true,
                }
            }
        },
    ))
}
