use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// 单次请求失败
///
/// 序列化后保持原有形状：`{status, statusText, data}` 或 `{message}`
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchError {
    /// 非 2xx 响应
    #[error("HTTP {status} {status_text}: {data}")]
    Http {
        status: u16,
        #[serde(rename = "statusText")]
        status_text: String,
        data: Value,
    },

    /// 连接失败、超时、响应体不可读等，没有可用的 HTTP 状态
    #[error("{message}")]
    Transport { message: String },
}

impl FetchError {
    /// 非 2xx 响应；错误体无法解析为 JSON 时使用通用占位
    pub fn from_http(status: u16, status_text: impl Into<String>, body: &[u8]) -> Self {
        let data = serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| json!({ "message": "Unknown error" }));
        FetchError::Http {
            status,
            status_text: status_text.into(),
            data,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::Transport {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            FetchError::Transport { .. } => None,
        }
    }
}
