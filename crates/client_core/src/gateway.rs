//! Remote Gateway contract and its reqwest binding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{PersonId, RecordKind},
    error::ApiError,
    protocol::Page,
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::Settings,
    error::GatewayError,
    resource::{People, QueryOf, Resource},
    session::Session,
};

#[async_trait]
pub trait RecordGateway<R: Resource>: Send + Sync {
    async fn search(&self, query: &QueryOf<R>) -> Result<Page<R::Summary>, GatewayError>;
    async fn fetch(&self, id: R::Id) -> Result<R::Record, GatewayError>;
    async fn create(&self, record: &R::Record) -> Result<R::Record, GatewayError>;
    async fn update(&self, id: R::Id, record: &R::Record) -> Result<R::Record, GatewayError>;
    async fn delete(&self, id: R::Id) -> Result<(), GatewayError>;
}

/// Dedicated active-flag call for persons; never resends the rest of the record.
#[async_trait]
pub trait StatusGateway: Send + Sync {
    async fn set_active(&self, id: PersonId, active: bool) -> Result<(), GatewayError>;
}

pub struct HttpGateway {
    http: Client,
    base_url: Url,
    session: Session,
    status_method: Method,
}

impl HttpGateway {
    pub fn new(base_url: &str, session: Session) -> Result<Self, GatewayError> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url)?,
            session,
            status_method: Method::PATCH,
        })
    }

    pub fn from_settings(settings: &Settings, session: Session) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs.filter(|s| *s > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let status_method = Method::from_bytes(settings.status_toggle_method.as_bytes())
            .map_err(|_| {
                GatewayError::Transport(format!(
                    "unsupported status toggle method '{}'",
                    settings.status_toggle_method
                ))
            })?;
        Ok(Self {
            http,
            base_url: normalize_base_url(&settings.api_url)?,
            session,
            status_method,
        })
    }

    pub fn with_status_method(mut self, method: Method) -> Self {
        self.status_method = method;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|err| GatewayError::Transport(format!("invalid request path '{path}': {err}")))
    }

    fn record_url<R: Resource>(&self, id: R::Id) -> Result<Url, GatewayError> {
        self.url(&format!("{}/{id}", R::PATH))
    }

    /// Attaches the bearer credential, sends, and maps non-2xx responses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let token = self.session.bearer()?;
        let response = request
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let api = ApiError::from_body(status.as_u16(), &body);
        if api.code.is_auth() {
            self.session.expire();
            warn!(status = status.as_u16(), "backend rejected credential");
            return Err(GatewayError::Authentication(api.message));
        }
        warn!(status = status.as_u16(), message = %api.message, "backend returned an error");
        Err(GatewayError::Server(api))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

#[async_trait]
impl<R: Resource> RecordGateway<R> for HttpGateway {
    async fn search(&self, query: &QueryOf<R>) -> Result<Page<R::Summary>, GatewayError> {
        debug!(kind = ?R::KIND, ?query, "searching");
        let url = self.url(R::SEARCH_PATH)?;
        self.send_json(self.http.get(url).query(query)).await
    }

    async fn fetch(&self, id: R::Id) -> Result<R::Record, GatewayError> {
        let url = self.record_url::<R>(id)?;
        self.send_json(self.http.get(url)).await
    }

    async fn create(&self, record: &R::Record) -> Result<R::Record, GatewayError> {
        let url = self.url(R::PATH)?;
        self.send_json(self.http.post(url).json(record)).await
    }

    async fn update(&self, id: R::Id, record: &R::Record) -> Result<R::Record, GatewayError> {
        let url = self.record_url::<R>(id)?;
        self.send_json(self.http.put(url).json(record)).await
    }

    async fn delete(&self, id: R::Id) -> Result<(), GatewayError> {
        let url = self.record_url::<R>(id)?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl StatusGateway for HttpGateway {
    async fn set_active(&self, id: PersonId, active: bool) -> Result<(), GatewayError> {
        let url = self.url(&format!("{}/{id}/ativo", People::PATH))?;
        debug!(kind = ?RecordKind::Person, %id, active, "changing status");
        self.send(self.http.request(self.status_method.clone(), url).json(&active))
            .await?;
        Ok(())
    }
}

/// Ensures the base path ends with `/` so relative joins append segments.
fn normalize_base_url(raw: &str) -> Result<Url, GatewayError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| GatewayError::Transport(format!("invalid api url '{raw}': {err}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
