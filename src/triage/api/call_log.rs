//! 接口调用记录
//!
//! 会话内所有请求共用一份只增不减的调用日志。`CallRecorder` 是共享句柄，
//! 克隆后指向同一份记录；订阅方通过 `watch` 通道总是看到完整追加后的列表。

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tokio::sync::watch;

/// 调用结果：HTTP 状态码，或传输层失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Code(u16),
    Error,
}

impl Serialize for CallStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CallStatus::Code(code) => serializer.serialize_u16(*code),
            CallStatus::Error => serializer.serialize_str("error"),
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStatus::Code(code) => write!(f, "{}", code),
            CallStatus::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: u64,
    pub method: String,
    pub url: String,
    pub status: CallStatus,
    pub duration_ms: u64,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 待写入的一条记录（id 由记录器分配）
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub method: String,
    pub url: String,
    pub status: CallStatus,
    pub duration_ms: u64,
    pub timestamp: String,
    pub error: Option<String>,
}

#[derive(Debug)]
struct CallLog {
    entries: Vec<LogEntry>,
    next_id: u64,
}

#[derive(Clone)]
pub struct CallRecorder {
    inner: Arc<watch::Sender<CallLog>>,
}

impl CallRecorder {
    pub fn new() -> Self {
        // 没有接收端时 send_modify 依然生效
        let (tx, _) = watch::channel(CallLog {
            entries: Vec::new(),
            next_id: 1,
        });
        Self { inner: Arc::new(tx) }
    }

    /// 追加一条记录并通知订阅方，返回分配的 id
    pub fn append(&self, entry: NewLogEntry) -> u64 {
        let mut assigned = 0;
        self.inner.send_modify(|log| {
            assigned = log.next_id;
            log.next_id += 1;
            let method = if entry.method.is_empty() {
                "GET".to_string()
            } else {
                entry.method.to_uppercase()
            };
            log.entries.push(LogEntry {
                id: assigned,
                method,
                url: entry.url,
                status: entry.status,
                duration_ms: entry.duration_ms,
                timestamp: entry.timestamp,
                error: entry.error,
            });
        });
        assigned
    }

    /// 当前记录的快照
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 订阅后续变更；丢弃返回值即取消订阅
    pub fn subscribe(&self) -> CallLogSubscription {
        CallLogSubscription {
            rx: self.inner.subscribe(),
        }
    }
}

impl Default for CallRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallRecorder")
            .field("entries", &self.len())
            .finish()
    }
}

pub struct CallLogSubscription {
    rx: watch::Receiver<CallLog>,
}

impl CallLogSubscription {
    /// 等待下一次追加，返回追加后的完整列表；记录器全部释放后返回 None
    pub async fn changed(&mut self) -> Option<Vec<LogEntry>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().entries.clone())
    }

    pub fn current(&self) -> Vec<LogEntry> {
        self.rx.borrow().entries.clone()
    }
}
