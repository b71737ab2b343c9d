use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::http_client::{HttpClient, HttpResponse, RequestBody};
use crate::logger::Logger;

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Get {
        url: String,
        headers: Vec<(String, String)>,
        params: Vec<(String, String)>,
        timeout: Duration,
    },
    Post {
        url: String,
        headers: Vec<(String, String)>,
        body: RequestBody,
        timeout: Duration,
    },
}

enum Reply {
    Json(u16, Value),
    Fail(String),
    Panic,
}

/// Answers by URL prefix and records every request.
#[derive(Default)]
pub struct FakeHttpClient {
    routes: Vec<(String, Reply)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url_prefix: &str, status: u16, body: Value) -> Self {
        self.routes
            .push((url_prefix.to_string(), Reply::Json(status, body)));
        self
    }

    pub fn fail(mut self, url_prefix: &str, message: &str) -> Self {
        self.routes
            .push((url_prefix.to_string(), Reply::Fail(message.to_string())));
        self
    }

    /// Makes the matching request panic inside the caller's future.
    pub fn panic_on(mut self, url_prefix: &str) -> Self {
        self.routes.push((url_prefix.to_string(), Reply::Panic));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn reply(&self, url: &str) -> anyhow::Result<HttpResponse> {
        match self.routes.iter().find(|(prefix, _)| url.starts_with(prefix)) {
            Some((_, Reply::Json(status, body))) => {
                Ok(HttpResponse::new(*status, serde_json::to_vec(body)?))
            }
            Some((_, Reply::Fail(message))) => Err(anyhow::anyhow!(message.clone())),
            Some((_, Reply::Panic)) => panic!("fake transport blew up on {url}"),
            None => Err(anyhow::anyhow!("connection refused: {url}")),
        }
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> anyhow::Result<HttpResponse> {
        self.calls.lock().unwrap().push(RecordedCall::Get {
            url: url.to_string(),
            headers: owned(headers),
            params: owned(params),
            timeout,
        });
        self.reply(url)
    }

    async fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: RequestBody,
        timeout: Duration,
    ) -> anyhow::Result<HttpResponse> {
        self.calls.lock().unwrap().push(RecordedCall::Post {
            url: url.to_string(),
            headers: owned(headers),
            body,
            timeout,
        });
        self.reply(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn critical(&self, message: &str) {
        self.push(Level::Critical, message);
    }
}
