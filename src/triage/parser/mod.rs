//! 接口数据解析
//!
//! 每个解析函数接收任意 JSON，总是返回完整的结构：
//! 字符串缺省为 ""，数值缺省为 None，数组缺省为空，布尔缺省为 false。

pub mod changesets;
pub mod loans;
pub mod lock_requests;
pub mod pricing_scenarios;
pub mod rates;
pub mod value;

pub use changesets::{parse_changesets, Changeset, ChangesetPage};
pub use loans::{parse_loan, Loan};
pub use lock_requests::{parse_lock_requests, BuySide, LockRequest};
pub use pricing_scenarios::{parse_pricing_scenario, PricingByPeRequestId, PricingScenario};
pub use rates::{parse_pe_rates, RatePage, RateSetItem};
