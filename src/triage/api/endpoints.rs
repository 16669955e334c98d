//! 各业务接口（全部为 GET + Bearer + JSON）

use serde_json::Value;

use crate::triage::api::client::TriageApi;
use crate::triage::api::environment::Environment;
use crate::triage::api::error::FetchError;

/// 变更集列表固定只取最近 3 条
pub const CHANGESET_PAGE_SIZE: &str = "3";

impl TriageApi {
    /// 获取变更集列表 `/api/v2/changesets/?pageSize=3`
    pub async fn fetch_changesets(
        &self,
        environment: Environment,
        token: &str,
    ) -> Result<Value, FetchError> {
        let url = self.endpoint(
            environment,
            &["api", "v2", "changesets"],
            &[("pageSize", CHANGESET_PAGE_SIZE)],
        )?;
        self.get_json(url, token).await
    }

    /// 获取某个变更集的 PE 利率 `/api/v2/pe/rates/?changesetId={id}`
    pub async fn fetch_pe_rates(
        &self,
        environment: Environment,
        token: &str,
        changeset_id: &str,
    ) -> Result<Value, FetchError> {
        let url = self.endpoint(
            environment,
            &["api", "v2", "pe", "rates"],
            &[("changesetId", changeset_id)],
        )?;
        self.get_json(url, token).await
    }

    /// 获取贷款 `/api/v2/loans/{loanId}/`
    pub async fn fetch_loan(
        &self,
        environment: Environment,
        token: &str,
        loan_id: &str,
    ) -> Result<Value, FetchError> {
        let url = self.endpoint(environment, &["api", "v2", "loans", loan_id], &[])?;
        self.get_json(url, token).await
    }

    /// 获取贷款下的全部锁价请求 `/api/v2/pe/loans/{loanId}/lock-requests/`
    pub async fn fetch_lock_requests(
        &self,
        environment: Environment,
        token: &str,
        loan_id: &str,
    ) -> Result<Value, FetchError> {
        let url = self.endpoint(
            environment,
            &["api", "v2", "pe", "loans", loan_id, "lock-requests"],
            &[],
        )?;
        self.get_json(url, token).await
    }

    /// 获取 PE 请求对应的定价场景 `/api/v2/pe/pricing-scenarios/{peRequestId}/`
    pub async fn fetch_pricing_scenario(
        &self,
        environment: Environment,
        token: &str,
        pe_request_id: &str,
    ) -> Result<Value, FetchError> {
        let url = self.endpoint(
            environment,
            &["api", "v2", "pe", "pricing-scenarios", pe_request_id],
            &[],
        )?;
        self.get_json(url, token).await
    }
}
