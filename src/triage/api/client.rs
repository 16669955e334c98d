use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::debug;

use crate::triage::api::call_log::CallRecorder;
use crate::triage::api::environment::{BaseUrls, Environment};
use crate::triage::api::error::FetchError;
use crate::triage::api::transport::{HttpRequest, HttpTransport, LoggedTransport};

/// Polly REST 客户端
///
/// 负责拼接地址、附加 Bearer 认证头、判断响应状态；
/// 所有请求都经过 `LoggedTransport`，因此都会出现在调用记录中。
#[derive(Clone)]
pub struct TriageApi {
    transport: LoggedTransport,
    base_urls: BaseUrls,
}

impl TriageApi {
    pub fn new(transport: Arc<dyn HttpTransport>, recorder: CallRecorder, base_urls: BaseUrls) -> Self {
        Self {
            transport: LoggedTransport::new(transport, recorder),
            base_urls,
        }
    }

    pub fn recorder(&self) -> &CallRecorder {
        self.transport.recorder()
    }

    /// 拼接接口地址
    ///
    /// * `segments` - 路径段，逐段转义，结尾自动补 `/`
    /// * `query` - 查询参数
    pub fn endpoint(
        &self,
        environment: Environment,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, FetchError> {
        let base = self.base_urls.for_env(environment);
        let mut url = Url::parse(base)
            .map_err(|e| FetchError::transport(format!("invalid base url {}: {}", base, e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FetchError::transport(format!("invalid base url {}", base)))?;
            path.pop_if_empty();
            path.extend(segments);
            path.push("");
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET 并解析 JSON；非 2xx 转为 `FetchError::Http`
    pub(crate) async fn get_json(&self, url: Url, token: &str) -> Result<Value, FetchError> {
        let request = HttpRequest {
            method: Method::GET,
            url,
            headers: auth_headers(token)?,
        };
        let response = self.transport.call(request).await?;

        if !response.is_success() {
            return Err(FetchError::from_http(
                response.status,
                response.status_text,
                &response.body,
            ));
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            debug!("invalid json body: {}", String::from_utf8_lossy(&response.body));
            FetchError::transport(format!("invalid JSON response: {}", e))
        })
    }
}

fn auth_headers(token: &str) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| FetchError::transport("bearer token contains invalid header characters"))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
