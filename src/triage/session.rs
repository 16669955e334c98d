//! 一次排查会话
//!
//! `TriageSession` 持有调用记录、API 客户端和三个聚合流程，
//! 会话内的所有请求共享同一份调用记录。

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::app_config::settings::TriageSettings;
use crate::error::AppResult;
use crate::triage::api::{
    BaseUrls, CallRecorder, Environment, HttpTransport, LogEntry, ReqwestTransport, TriageApi,
};
use crate::triage::pricing_diff::PricingChange;
use crate::triage::workflow::{
    ChangesetsState, ChangesetsWorkflow, LoanState, LoanWorkflow, LockRequestsState,
    LockRequestsWorkflow,
};

/// 一次排查的输入
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub environment: Environment,
    pub token: String,
    pub loan_id: Option<String>,
    /// 是否获取贷款详情
    pub loan_service: bool,
    /// 是否获取锁价请求及定价差异
    pub lock_requests: bool,
}

impl AnalysisRequest {
    fn trimmed_loan_id(&self) -> Option<&str> {
        self.loan_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockPricingDiff {
    pub lock_request_id: i64,
    pub requested_on: String,
    /// None 表示没有可比较的前一个请求或缺少定价场景
    pub changes: Option<Vec<PricingChange>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub environment: Environment,
    pub changesets: ChangesetsState,
    pub loan: LoanState,
    pub lock_requests: LockRequestsState,
    pub pricing_diffs: Vec<LockPricingDiff>,
    pub api_log: Vec<LogEntry>,
}

pub struct TriageSession {
    recorder: CallRecorder,
    changesets: ChangesetsWorkflow,
    loan: LoanWorkflow,
    lock_requests: LockRequestsWorkflow,
}

impl TriageSession {
    pub fn new(transport: Arc<dyn HttpTransport>, base_urls: BaseUrls) -> Self {
        let recorder = CallRecorder::new();
        let api = TriageApi::new(transport, recorder.clone(), base_urls);
        Self {
            recorder,
            changesets: ChangesetsWorkflow::new(api.clone()),
            loan: LoanWorkflow::new(api.clone()),
            lock_requests: LockRequestsWorkflow::new(api),
        }
    }

    /// 使用 reqwest 作为传输层
    pub fn from_settings(settings: &TriageSettings) -> AppResult<Self> {
        let transport = ReqwestTransport::new(settings.http_timeout)?;
        Ok(Self::new(Arc::new(transport), settings.base_urls.clone()))
    }

    pub fn recorder(&self) -> &CallRecorder {
        &self.recorder
    }

    pub fn changesets(&self) -> &ChangesetsWorkflow {
        &self.changesets
    }

    pub fn loan(&self) -> &LoanWorkflow {
        &self.loan
    }

    pub fn lock_requests(&self) -> &LockRequestsWorkflow {
        &self.lock_requests
    }

    /// 清空全部流程的状态
    pub fn reset_all(&self) {
        self.changesets.reset();
        self.loan.reset();
        self.lock_requests.reset();
    }

    /// 执行一次排查
    ///
    /// 先同步清空所有流程（包括本次未选择的），再并发运行选中的流程。
    /// 变更集总会获取；贷款和锁价请求需要非空的 loan id。
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        self.reset_all();

        let environment = request.environment;
        let token = request.token.as_str();
        let loan_id = request.trimmed_loan_id();
        info!(
            "开始排查: env={}, loan_id={:?}, loan_service={}, lock_requests={}",
            environment, loan_id, request.loan_service, request.lock_requests
        );

        let run_loan = async {
            if let Some(id) = loan_id.filter(|_| request.loan_service) {
                self.loan.run(environment, token, id).await;
            }
        };
        let run_locks = async {
            if let Some(id) = loan_id.filter(|_| request.lock_requests) {
                self.lock_requests.run(environment, token, id).await;
            }
        };
        tokio::join!(self.changesets.run(environment, token), run_loan, run_locks);

        self.report(environment)
    }

    /// 当前状态的快照
    pub fn report(&self, environment: Environment) -> AnalysisReport {
        let lock_requests = self.lock_requests.snapshot();
        let pricing_diffs = lock_requests
            .locks
            .iter()
            .zip(lock_requests.pricing_diffs())
            .map(|(lock, changes)| LockPricingDiff {
                lock_request_id: lock.id,
                requested_on: lock.requested_on.clone(),
                changes,
            })
            .collect();

        AnalysisReport {
            environment,
            changesets: self.changesets.snapshot(),
            loan: self.loan.snapshot(),
            lock_requests,
            pricing_diffs,
            api_log: self.recorder.entries(),
        }
    }
}
