use serde::Serialize;
use tracing::{error, info};

use crate::triage::api::{Environment, FetchError, TriageApi};
use crate::triage::parser::{parse_loan, Loan};
use crate::triage::workflow::{RunSlot, RunStatus};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanState {
    pub status: RunStatus,
    pub attempted: bool,
    pub loan: Option<Loan>,
    pub error: Option<FetchError>,
}

/// 单次获取贷款，无后续请求
pub struct LoanWorkflow {
    api: TriageApi,
    slot: RunSlot<LoanState>,
}

impl LoanWorkflow {
    pub fn new(api: TriageApi) -> Self {
        Self {
            api,
            slot: RunSlot::new(),
        }
    }

    pub fn snapshot(&self) -> LoanState {
        self.slot.snapshot()
    }

    pub fn reset(&self) {
        self.slot.reset();
    }

    pub async fn run(&self, environment: Environment, token: &str, loan_id: &str) -> LoanState {
        let mut run = self.slot.begin(|s| {
            s.status = RunStatus::Running;
            s.attempted = true;
        });

        match self.api.fetch_loan(environment, token, loan_id).await {
            Ok(raw) => {
                let loan = parse_loan(&raw);
                info!("获取贷款成功: loan_id={}, loan_number={}", loan_id, loan.loan_number);
                run.update(|s| {
                    s.loan = Some(loan);
                    s.status = RunStatus::Succeeded;
                });
            }
            Err(err) => {
                error!("获取贷款失败: loan_id={}, {}", loan_id, err);
                run.update(|s| {
                    s.error = Some(err);
                    s.status = RunStatus::Failed;
                });
            }
        }
        run.finish()
    }
}
