//! # Polly Triage
//!
//! 拉取变更集、利率、贷款、锁价请求与定价场景，统一解析为固定结构，
//! 并比较相邻两次锁价请求之间的定价输入差异。

pub mod app_config;
pub mod error;
pub mod time_util;
pub mod triage;

pub use triage::api::{CallRecorder, Environment, FetchError, TriageApi};
pub use triage::session::{AnalysisReport, AnalysisRequest, TriageSession};
