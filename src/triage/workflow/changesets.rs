//! 变更集 + PE 利率
//!
//! 先取变更集列表，成功后按每个变更集 id 并发获取利率。
//! 利率批次任一失败则整体降级为空映射并单独记录 `rates_error`，
//! 变更集本身的结果不受影响。

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::triage::api::{Environment, FetchError, TriageApi};
use crate::triage::parser::{parse_changesets, parse_pe_rates, ChangesetPage, RatePage};
use crate::triage::workflow::{RunSlot, RunStatus};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesetsState {
    pub status: RunStatus,
    pub attempted: bool,
    /// 原始响应
    #[serde(skip_serializing)]
    pub raw: Option<Value>,
    pub parsed: Option<ChangesetPage>,
    pub rates_by_changeset_id: BTreeMap<String, RatePage>,
    pub rates_error: Option<FetchError>,
    pub error: Option<FetchError>,
}

impl ChangesetsState {
    pub fn is_loading(&self) -> bool {
        self.status == RunStatus::Running
    }
}

pub struct ChangesetsWorkflow {
    api: TriageApi,
    slot: RunSlot<ChangesetsState>,
}

impl ChangesetsWorkflow {
    pub fn new(api: TriageApi) -> Self {
        Self {
            api,
            slot: RunSlot::new(),
        }
    }

    pub fn snapshot(&self) -> ChangesetsState {
        self.slot.snapshot()
    }

    pub fn reset(&self) {
        self.slot.reset();
    }

    pub async fn run(&self, environment: Environment, token: &str) -> ChangesetsState {
        let mut run = self.slot.begin(|s| {
            s.status = RunStatus::Running;
            s.attempted = true;
        });

        let raw = match self.api.fetch_changesets(environment, token).await {
            Ok(raw) => raw,
            Err(err) => {
                error!("获取变更集失败: {}", err);
                run.update(|s| {
                    s.status = RunStatus::Failed;
                    s.error = Some(err);
                });
                return run.finish();
            }
        };

        let parsed = parse_changesets(&raw);
        let ids = parsed.ids();
        info!("获取变更集 {} 条 ({})", ids.len(), environment);
        run.update(|s| {
            s.raw = Some(raw);
            s.parsed = Some(parsed);
        });

        if !ids.is_empty() {
            match self.fetch_rates(environment, token, &ids).await {
                Ok(by_id) => {
                    run.update(|s| {
                        s.rates_by_changeset_id = by_id;
                        s.rates_error = None;
                    });
                }
                Err(err) => {
                    warn!("获取 PE 利率失败，利率结果整体置空: {}", err);
                    run.update(|s| {
                        s.rates_by_changeset_id = BTreeMap::new();
                        s.rates_error = Some(err);
                    });
                }
            }
        }

        run.update(|s| s.status = RunStatus::Succeeded);
        run.finish()
    }

    /// 并发获取全部利率；等所有请求结束后，按 id 顺序返回第一个失败
    async fn fetch_rates(
        &self,
        environment: Environment,
        token: &str,
        ids: &[String],
    ) -> Result<BTreeMap<String, RatePage>, FetchError> {
        let results = join_all(
            ids.iter()
                .map(|id| self.api.fetch_pe_rates(environment, token, id)),
        )
        .await;

        let mut by_id = BTreeMap::new();
        for (id, result) in ids.iter().zip(results) {
            by_id.insert(id.clone(), parse_pe_rates(&result?));
        }
        Ok(by_id)
    }
}
