//! 锁价请求 + 定价场景
//!
//! 先取贷款下的锁价请求，再对去重后的 peRequestId 并发获取定价场景。
//! 单个定价场景失败只会让该 id 映射为 None，不影响其他 id。

use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::triage::api::{Environment, FetchError, TriageApi};
use crate::triage::parser::{
    parse_lock_requests, parse_pricing_scenario, LockRequest, PricingByPeRequestId,
    PricingScenario,
};
use crate::triage::pricing_diff::{pricing_diffs_from_previous, PricingChange};
use crate::triage::workflow::{RunSlot, RunStatus};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRequestsState {
    pub status: RunStatus,
    pub attempted: bool,
    /// 保持接口返回顺序
    pub locks: Vec<LockRequest>,
    pub pricing_by_pe_request_id: PricingByPeRequestId,
    pub error: Option<FetchError>,
}

impl LockRequestsState {
    pub fn is_loading(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// 与 `locks` 一一对应的定价差异
    pub fn pricing_diffs(&self) -> Vec<Option<Vec<PricingChange>>> {
        pricing_diffs_from_previous(&self.locks, &self.pricing_by_pe_request_id)
    }
}

/// 去重后的非空 peRequestId，保持首次出现的顺序
pub fn unique_pe_request_ids(locks: &[LockRequest]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in locks.iter().filter_map(LockRequest::pe_request_id) {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

pub struct LockRequestsWorkflow {
    api: TriageApi,
    slot: RunSlot<LockRequestsState>,
}

impl LockRequestsWorkflow {
    pub fn new(api: TriageApi) -> Self {
        Self {
            api,
            slot: RunSlot::new(),
        }
    }

    pub fn snapshot(&self) -> LockRequestsState {
        self.slot.snapshot()
    }

    pub fn reset(&self) {
        self.slot.reset();
    }

    pub async fn run(&self, environment: Environment, token: &str, loan_id: &str) -> LockRequestsState {
        let mut run = self.slot.begin(|s| {
            s.status = RunStatus::Running;
            s.attempted = true;
        });

        let raw = match self.api.fetch_lock_requests(environment, token, loan_id).await {
            Ok(raw) => raw,
            Err(err) => {
                error!("获取锁价请求失败: loan_id={}, {}", loan_id, err);
                run.update(|s| {
                    s.status = RunStatus::Failed;
                    s.error = Some(err);
                });
                return run.finish();
            }
        };

        let locks = parse_lock_requests(&raw);
        let pe_request_ids = unique_pe_request_ids(&locks);
        info!(
            "获取锁价请求 {} 条, 定价场景 {} 个: loan_id={}",
            locks.len(),
            pe_request_ids.len(),
            loan_id
        );
        run.update(|s| s.locks = locks);

        if !pe_request_ids.is_empty() {
            let pricing = self.fetch_pricing(environment, token, &pe_request_ids).await;
            run.update(|s| s.pricing_by_pe_request_id = pricing);
        }

        run.update(|s| s.status = RunStatus::Succeeded);
        run.finish()
    }

    async fn fetch_pricing(
        &self,
        environment: Environment,
        token: &str,
        pe_request_ids: &[String],
    ) -> PricingByPeRequestId {
        let results = join_all(pe_request_ids.iter().map(|id| async move {
            let scenario: Option<PricingScenario> =
                match self.api.fetch_pricing_scenario(environment, token, id).await {
                    Ok(raw) => Some(parse_pricing_scenario(&raw)),
                    Err(err) => {
                        warn!("获取定价场景失败: pe_request_id={}, {}", id, err);
                        None
                    }
                };
            (id.clone(), scenario)
        }))
        .await;

        results.into_iter().collect()
    }
}
