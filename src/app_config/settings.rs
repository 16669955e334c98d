//! 运行配置：从环境变量（及 .env）读取

use std::time::Duration;

use crate::app_config::env::{env_non_empty, env_or_default, env_u64};
use crate::triage::api::environment::{BaseUrls, PROD_BASE_URL, STAGE_BASE_URL};

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct TriageSettings {
    pub base_urls: BaseUrls,
    pub http_timeout: Duration,
    /// CLI 未传 --token 时使用
    pub bearer_token: Option<String>,
}

impl TriageSettings {
    /// 读取配置
    ///
    /// * `POLLY_PROD_BASE_URL` / `POLLY_STAGE_BASE_URL` - 覆盖默认地址
    /// * `TRIAGE_HTTP_TIMEOUT_SECS` - 单次请求超时
    /// * `TRIAGE_BEARER_TOKEN` - 默认 token
    pub fn from_env() -> Self {
        let prod = env_or_default("POLLY_PROD_BASE_URL", PROD_BASE_URL);
        let stage = env_or_default("POLLY_STAGE_BASE_URL", STAGE_BASE_URL);
        Self {
            base_urls: BaseUrls::new(trim_slash(&prod), trim_slash(&stage)),
            http_timeout: Duration::from_secs(env_u64(
                "TRIAGE_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
            bearer_token: env_non_empty("TRIAGE_BEARER_TOKEN"),
        }
    }
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            base_urls: BaseUrls::default(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            bearer_token: None,
        }
    }
}

fn trim_slash(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
