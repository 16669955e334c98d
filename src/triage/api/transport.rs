//! 网络传输层
//!
//! `HttpTransport` 是真正发请求的接口，`ReqwestTransport` 为生产实现；
//! `LoggedTransport` 包在外层，每次请求无论成败都恰好写入一条调用记录。

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use tracing::{debug, info, warn};

use crate::error::{to_err, AppResult};
use crate::time_util::now_rfc3339_millis;
use crate::triage::api::call_log::{CallRecorder, CallStatus, NewLogEntry};
use crate::triage::api::error::FetchError;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 发送 HTTP 请求
///
/// 只有拿不到 HTTP 状态时才返回 `FetchError::Transport`；
/// 非 2xx 响应照常返回，由调用方判断。
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(to_err)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
        })
    }
}

/// 带调用记录的传输层
#[derive(Clone)]
pub struct LoggedTransport {
    inner: Arc<dyn HttpTransport>,
    recorder: CallRecorder,
}

impl LoggedTransport {
    pub fn new(inner: Arc<dyn HttpTransport>, recorder: CallRecorder) -> Self {
        Self { inner, recorder }
    }

    pub fn recorder(&self) -> &CallRecorder {
        &self.recorder
    }

    /// 发出请求并记录耗时；失败时原样返回错误
    pub async fn call(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let method = request.method.as_str().to_uppercase();
        let url = request.url.to_string();
        let start = Instant::now();

        let result = self.inner.send(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        let timestamp = now_rfc3339_millis();

        match &result {
            Ok(response) => {
                info!(
                    "{} {} -> {} ({}ms)",
                    method, url, response.status, duration_ms
                );
                if !response.is_success() {
                    debug!("url:{}, error_body: {}", url, String::from_utf8_lossy(&response.body));
                }
                self.recorder.append(NewLogEntry {
                    method,
                    url,
                    status: CallStatus::Code(response.status),
                    duration_ms,
                    timestamp,
                    error: None,
                });
            }
            Err(err) => {
                warn!("{} {} 请求失败 ({}ms): {}", method, url, duration_ms, err);
                self.recorder.append(NewLogEntry {
                    method,
                    url,
                    status: CallStatus::Error,
                    duration_ms,
                    timestamp,
                    error: Some(err.to_string()),
                });
            }
        }
        result
    }
}

#[async_trait]
impl HttpTransport for LoggedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        self.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<HttpResponse, FetchError>);

    #[async_trait]
    impl HttpTransport for Fixed {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, FetchError> {
            self.0.clone()
        }
    }

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: Method::GET,
            url: Url::parse(url).unwrap(),
            headers: HeaderMap::new(),
        }
    }

    #[tokio::test]
    async fn test_success_is_logged_once() {
        let recorder = CallRecorder::new();
        let transport = LoggedTransport::new(
            Arc::new(Fixed(Ok(HttpResponse {
                status: 500,
                status_text: "Internal Server Error".to_string(),
                body: Vec::new(),
            }))),
            recorder.clone(),
        );

        let response = transport.call(get("https://api.stage.polly.io/x/")).await.unwrap();
        assert_eq!(response.status, 500);

        let entries = recorder.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].method, "GET");
        assert_eq!(entries[0].url, "https://api.stage.polly.io/x/");
        assert_eq!(entries[0].status, CallStatus::Code(500));
        assert!(entries[0].error.is_none());
    }

    #[tokio::test]
    async fn test_failure_is_logged_and_returned() {
        let recorder = CallRecorder::new();
        let transport = LoggedTransport::new(
            Arc::new(Fixed(Err(FetchError::transport("connection refused")))),
            recorder.clone(),
        );

        let err = transport.call(get("https://api.prod.polly.io/y/")).await.unwrap_err();
        assert_eq!(err, FetchError::transport("connection refused"));

        let entries = recorder.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, CallStatus::Error);
        assert_eq!(entries[0].error.as_deref(), Some("connection refused"));
    }
}
