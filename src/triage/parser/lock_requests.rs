//! 锁价请求列表

use serde::Serialize;
use serde_json::Value;

use crate::triage::parser::value::{field, integer_or_null, number_or_null, text, truthy};

/// 买方定价快照
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuySide {
    pub changeset_id: String,
    pub channel: String,
    pub policy_id: String,
    pub pe_request_id: String,
    pub investor: String,
    pub investor_id: Option<f64>,
    pub rate_sheet_id: String,
    pub product_name: String,
    pub product_code: String,
    pub rate: String,
    pub lock_period: Option<f64>,
    pub expiration_date: String,
    pub lock_confirmed_date: String,
    pub base_price: String,
    pub net_price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRequest {
    pub id: i64,
    /// 用于排序的时间（ISO-8601）
    pub requested_on: String,
    pub requested_by: String,
    pub requested_by_username: String,
    pub is_auto_triggered: bool,
    pub write_back_status: String,
    pub action: String,
    pub decision: String,
    pub approval_mode: String,
    pub buy_side: BuySide,
    pub has_sell_side: bool,
}

impl LockRequest {
    pub fn pe_request_id(&self) -> Option<&str> {
        let id = self.buy_side.pe_request_id.as_str();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }
}

/// 解析锁价请求；输入不是数组时返回空列表
pub fn parse_lock_requests(raw: &Value) -> Vec<LockRequest> {
    match raw.as_array() {
        Some(items) => items.iter().filter_map(parse_lock_request).collect(),
        None => Vec::new(),
    }
}

fn parse_lock_request(item: &Value) -> Option<LockRequest> {
    if !item.is_object() {
        return None;
    }
    let buy_side = field(item, "buySide");
    let has_sell_side = field(item, "sellSide")
        .as_object()
        .map(|o| !o.is_empty())
        .unwrap_or(false);

    Some(LockRequest {
        id: integer_or_null(field(item, "id")).unwrap_or(0),
        requested_on: text(field(item, "requestedOn")),
        requested_by: text(field(item, "requestedBy")),
        requested_by_username: text(field(item, "requestedByUsername")),
        is_auto_triggered: truthy(field(item, "isAutoTriggered")),
        write_back_status: text(field(item, "writeBackStatus")),
        action: text(field(item, "action")),
        decision: text(field(item, "decision")),
        approval_mode: text(field(item, "approvalMode")),
        buy_side: BuySide {
            changeset_id: text(field(buy_side, "changesetId")),
            channel: text(field(buy_side, "channel")),
            policy_id: text(field(buy_side, "policyId")),
            pe_request_id: text(field(buy_side, "peRequestId")),
            investor: text(field(buy_side, "investor")),
            investor_id: number_or_null(field(buy_side, "investorId")),
            rate_sheet_id: text(field(buy_side, "rateSheetId")),
            product_name: text(field(buy_side, "productName")),
            product_code: text(field(buy_side, "productCode")),
            rate: text(field(buy_side, "rate")),
            lock_period: number_or_null(field(buy_side, "lockPeriod")),
            expiration_date: text(field(buy_side, "expirationDate")),
            lock_confirmed_date: text(field(buy_side, "lockConfirmedDate")),
            base_price: text(field(buy_side, "basePrice")),
            net_price: text(field(buy_side, "netPrice")),
        },
        has_sell_side,
    })
}
