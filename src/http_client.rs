use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// Request payload for `HttpClient::post`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// Status and raw body of a provider response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn error_for_status(self) -> anyhow::Result<Self> {
        match self.status() {
            200..=299 => Ok(self),
            status => anyhow::bail!("HTTP status {status}"),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> anyhow::Result<HttpResponse>;

    async fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: RequestBody,
        timeout: Duration,
    ) -> anyhow::Result<HttpResponse>;
}

/// One `reqwest::Client` shared by every provider for the life of the process.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        headers: &[(&str, &str)],
    ) -> reqwest::RequestBuilder {
        headers
            .iter()
            .fold(self.client.request(method, url), |req, (name, value)| {
                req.header(*name, *value)
            })
    }

    async fn send(
        req: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> anyhow::Result<HttpResponse> {
        let res = req.timeout(timeout).send().await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?;
        Ok(HttpResponse::new(status, body))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> anyhow::Result<HttpResponse> {
        let req = self.request(reqwest::Method::GET, url, headers).query(params);
        Self::send(req, timeout)
            .await
            .with_context(|| format!("GET {url}"))
    }

    async fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: RequestBody,
        timeout: Duration,
    ) -> anyhow::Result<HttpResponse> {
        // headers go on first so the body encoder owns Content-Type
        let req = self.request(reqwest::Method::POST, url, headers);
        let req = match &body {
            RequestBody::Json(value) => req.json(value),
            RequestBody::Form(fields) => req.form(fields),
        };
        Self::send(req, timeout)
            .await
            .with_context(|| format!("POST {url}"))
    }
}
